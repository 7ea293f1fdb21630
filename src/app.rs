// Application shell: one `Session` per run owns the store, the sprite source
// and the storage path. Each user action is a synchronous handler written
// against the `View` trait, so the same logic drives the terminal front-end
// and the headless view used in tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::{Sprite, SpriteSource};
use crate::entry::EntryForm;
use crate::store::{LoadOutcome, Store};

/// Presentation layer as seen by the shell.
pub trait View {
    /// Blocking error message.
    fn show_error(&mut self, title: &str, text: &str);

    /// Blocking informational message.
    fn show_info(&mut self, title: &str, text: &str);

    /// Current contents of the four input fields.
    fn read_form(&mut self) -> Result<EntryForm>;

    fn clear_form(&mut self);

    /// Replace the list view with `items`.
    fn render_list(&mut self, items: &[String]);

    /// Replace the image panel with `sprite`.
    fn render_image(&mut self, sprite: &Sprite);

    /// Called before a blocking network call.
    fn begin_busy(&mut self, _message: &str) {}

    fn end_busy(&mut self) {}
}

/// Text before the first `" - "` of a list label.
pub fn name_from_label(label: &str) -> &str {
    label.split(" - ").next().unwrap_or(label)
}

pub struct Session<S> {
    store: Store,
    sprites: S,
    storage_path: PathBuf,
}

impl<S: SpriteSource> Session<S> {
    pub fn new(sprites: S, storage_path: impl Into<PathBuf>) -> Self {
        Session {
            store: Store::new(),
            sprites,
            storage_path: storage_path.into(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Re-project the store into the list view.
    pub fn refresh<V: View>(&self, view: &mut V) {
        view.render_list(&self.store.list());
    }

    /// Add action: validate the form, store the entry, clear the inputs.
    pub fn add<V: View>(&mut self, view: &mut V) -> Result<()> {
        let form = view.read_form()?;
        let entry = match form.validate() {
            Ok(entry) => entry,
            Err(e) => {
                view.show_error("Input Error", &format!("Please enter valid details: {e}."));
                return Ok(());
            }
        };

        info!(entry = %entry, "adding entry");
        self.store.add(entry);
        view.clear_form();
        self.refresh(view);
        Ok(())
    }

    /// Select-for-display action for a list label.
    pub fn select<V: View>(&self, view: &mut V, label: &str) {
        let name = name_from_label(label);
        view.begin_busy(&format!("Fetching sprite for {name}..."));
        let result = self.sprites.resolve(name);
        view.end_busy();

        match result {
            Ok(sprite) => view.render_image(&sprite),
            Err(e) => {
                warn!(creature = name, error = %e, "sprite unavailable");
                view.show_error("Sprite Error", &format!("Could not retrieve sprite for {name}"));
            }
        }
    }

    /// Save action to the session's storage path.
    pub fn save<V: View>(&self, view: &mut V) -> Result<()> {
        self.save_to(view, &self.storage_path)
    }

    /// Save to an explicit path. Write failures are returned, not shown.
    pub fn save_to<V: View>(&self, view: &mut V, path: &Path) -> Result<()> {
        self.store
            .save(path)
            .with_context(|| format!("Saving storage to {}", path.display()))?;
        view.show_info(
            "Success",
            &format!("Pokémon storage saved successfully to {}!", path.display()),
        );
        Ok(())
    }

    /// Load action from the session's storage path.
    pub fn load<V: View>(&mut self, view: &mut V) -> Result<()> {
        let path = self.storage_path.clone();
        self.load_from(view, &path)
    }

    /// Merge the entries of `path` into the store and report what happened.
    pub fn load_from<V: View>(&mut self, view: &mut V, path: &Path) -> Result<()> {
        let outcome = self
            .store
            .load(path)
            .with_context(|| format!("Loading storage from {}", path.display()))?;
        self.refresh(view);

        match outcome {
            LoadOutcome::Missing => view.show_info(
                "Nothing to load",
                &format!(
                    "No storage file at {}, starting with an empty storage.",
                    path.display()
                ),
            ),
            LoadOutcome::Loaded { added, skipped } if skipped.is_empty() => view.show_info(
                "Success",
                &format!("Pokémon storage loaded successfully ({added} added)!"),
            ),
            LoadOutcome::Loaded { added, skipped } => {
                let lines: Vec<String> = skipped.iter().map(|s| s.line.to_string()).collect();
                view.show_info(
                    "Loaded with problems",
                    &format!(
                        "Loaded {added} Pokémon; skipped {} malformed line(s): {}.",
                        skipped.len(),
                        lines.join(", ")
                    ),
                )
            }
        }
        Ok(())
    }
}
