// UI layer: an interactive terminal front-end built on `dialoguer`.
// `TerminalView` is the concrete `View` for the shell; `main_menu` maps
// menu choices onto the session's handlers and blocks on each one.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

use crate::api::{Sprite, SpriteSource};
use crate::app::{Session, View};
use crate::config::{Config, DialogStyle};
use crate::entry::EntryForm;
use crate::graphics::{self, Resolved};
use crate::store::DEFAULT_STORAGE_FILE;

/// Terminal implementation of the presentation layer. Keeps the form
/// values between prompts so a rejected entry can be corrected.
pub struct TerminalView {
    form: EntryForm,
    list: Vec<String>,
    graphics: Resolved,
    dialogs: DialogStyle,
    spinner: Option<ProgressBar>,
}

impl TerminalView {
    pub fn new(config: &Config) -> Self {
        TerminalView {
            form: EntryForm::default(),
            list: Vec::new(),
            graphics: graphics::resolve_protocol(config.image, |key| std::env::var(key).ok()),
            dialogs: config.dialogs,
            spinner: None,
        }
    }

    /// One input field, pre-filled with what the user typed last time.
    fn prompt(label: &str, current: &str) -> Result<String> {
        let value = Input::<String>::new()
            .with_prompt(label)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Reading {label}"))?;
        Ok(value)
    }

    /// Let the user pick one of the listed entries. `None` on Esc.
    fn pick_entry(&self) -> Result<Option<String>> {
        let choice = Select::new()
            .with_prompt("Show sprite for")
            .items(&self.list)
            .default(0)
            .interact_opt()?;
        Ok(choice.map(|idx| self.list[idx].clone()))
    }

    fn dialog(&self, level: MessageLevel, title: &str, text: &str) {
        match self.dialogs {
            DialogStyle::Native => {
                MessageDialog::new()
                    .set_level(level)
                    .set_title(title)
                    .set_description(text)
                    .set_buttons(MessageButtons::Ok)
                    .show();
            }
            DialogStyle::Terminal => {
                let title = match level {
                    MessageLevel::Error | MessageLevel::Warning => title.red().bold(),
                    MessageLevel::Info => title.green().bold(),
                };
                println!("{title}: {text}");
            }
        }
    }
}

impl View for TerminalView {
    fn show_error(&mut self, title: &str, text: &str) {
        self.dialog(MessageLevel::Warning, title, text);
    }

    fn show_info(&mut self, title: &str, text: &str) {
        self.dialog(MessageLevel::Info, title, text);
    }

    fn read_form(&mut self) -> Result<EntryForm> {
        self.form.name = Self::prompt("Pokémon name", &self.form.name)?;
        self.form.type1 = Self::prompt("Primary type", &self.form.type1)?;
        self.form.type2 = Self::prompt("Secondary type (optional)", &self.form.type2)?;
        self.form.level = Self::prompt("Level", &self.form.level)?;
        Ok(self.form.clone())
    }

    fn clear_form(&mut self) {
        self.form = EntryForm::default();
    }

    fn render_list(&mut self, items: &[String]) {
        self.list = items.to_vec();
        println!("{}", format!("Pokémon ({})", items.len()).bold());
        if items.is_empty() {
            println!("  (none yet)");
        }
        for item in items {
            println!("  {item}");
        }
    }

    fn render_image(&mut self, sprite: &Sprite) {
        let out = graphics::encode(self.graphics, sprite);
        let mut stdout = io::stdout().lock();
        // a broken stdout leaves the panel empty; the menu reports nothing
        let _ = stdout.write_all(out.as_bytes()).and_then(|_| stdout.flush());
    }

    fn begin_busy(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn end_busy(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

const MENU: [&str; 7] = [
    "Add Pokémon",
    "Show sprite",
    "Save to file",
    "Load from file",
    "Save to file as...",
    "Load from file...",
    "Exit",
];

/// Main interactive menu. Runs until the user picks "Exit" (or presses Esc).
/// Storage write failures end the loop with an error.
pub fn main_menu<S: SpriteSource>(mut session: Session<S>, mut view: TerminalView) -> Result<()> {
    println!("{}", "Pokémon Storage System".bold());
    session.refresh(&mut view);

    loop {
        let Some(selection) = Select::new().items(&MENU).default(0).interact_opt()? else {
            break;
        };
        match selection {
            0 => session.add(&mut view)?,
            1 => {
                if view.list.is_empty() {
                    println!("Add or load some Pokémon first.");
                    continue;
                }
                if let Some(label) = view.pick_entry()? {
                    session.select(&mut view, &label);
                }
            }
            2 => session.save(&mut view)?,
            3 => session.load(&mut view)?,
            4 => {
                if let Some(path) = pick_save_path(session.storage_path().to_path_buf()) {
                    session.save_to(&mut view, &path)?;
                }
            }
            5 => {
                if let Some(path) = FileDialog::new().add_filter("Text", &["txt"]).pick_file() {
                    session.load_from(&mut view, &path)?;
                }
            }
            _ => break,
        }
    }
    Ok(())
}

fn pick_save_path(current: PathBuf) -> Option<PathBuf> {
    let file_name = current
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_STORAGE_FILE)
        .to_string();
    let mut dialog = FileDialog::new()
        .add_filter("Text", &["txt"])
        .set_file_name(&file_name);
    if let Some(dir) = current.parent().filter(|d| !d.as_os_str().is_empty()) {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file()
}
