// Store module: the in-memory collection for one session plus its flat-file
// persistence. Loading merges into whatever is already held.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::entry::Entry;
use crate::error::{RecordError, StoreError};

/// File used by the plain Save / Load actions, relative to the working
/// directory.
pub const DEFAULT_STORAGE_FILE: &str = "pokemon_storage.txt";

/// A line that was skipped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the file.
    pub line: usize,
    pub error: RecordError,
}

/// What a load did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file does not exist; the store was left untouched.
    Missing,
    Loaded {
        added: usize,
        skipped: Vec<SkippedLine>,
    },
}

/// Ordered collection of entries. Insertion order is display order.
#[derive(Debug, Default, Clone)]
pub struct Store {
    entries: Vec<Entry>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. The store does not re-validate it.
    pub fn add(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// List-view labels in insertion order, rebuilt on every call.
    pub fn list(&self) -> Vec<String> {
        self.entries.iter().map(Entry::list_label).collect()
    }

    /// First entry whose name matches case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.matches_name(name))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite `path` with one record line per entry.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        debug!(path = %path.display(), entries = self.entries.len(), "saving storage");
        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        for entry in &self.entries {
            writeln!(writer, "{}", entry.to_record()).map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;

        info!(path = %path.display(), entries = self.entries.len(), "storage saved");
        Ok(())
    }

    /// Append every well-formed line of `path` to the store. Malformed lines
    /// are skipped and reported in the outcome; blank lines are ignored.
    pub fn load(&mut self, path: &Path) -> Result<LoadOutcome, StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no storage file, nothing to load");
                return Ok(LoadOutcome::Missing);
            }
            Err(e) => return Err(io_err(e)),
        };

        let mut added = 0;
        let mut skipped = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(io_err)?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Entry>() {
                Ok(entry) => {
                    self.add(entry);
                    added += 1;
                }
                Err(error) => {
                    warn!(path = %path.display(), line = idx + 1, %error, "skipping malformed line");
                    skipped.push(SkippedLine {
                        line: idx + 1,
                        error,
                    });
                }
            }
        }

        info!(
            path = %path.display(),
            added,
            skipped = skipped.len(),
            "storage loaded"
        );
        Ok(LoadOutcome::Loaded { added, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryForm, FIELD_SEPARATOR};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::fs;

    fn entry(name: &str, level: u32) -> Entry {
        Entry::new(name, "Normal", None, level)
    }

    #[test]
    fn list_keeps_insertion_order_and_duplicates() {
        let mut store = Store::new();
        store.add(entry("Zubat", 3));
        store.add(entry("Abra", 9));
        store.add(entry("Zubat", 4));

        assert_eq!(
            store.list(),
            vec!["Zubat - Level: 3", "Abra - Level: 9", "Zubat - Level: 4"]
        );
        // recomputed, not consumed
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn find_by_name_is_case_insensitive_first_match() {
        let mut store = Store::new();
        store.add(Entry::new("Pikachu", "Electric", None, 12));
        store.add(Entry::new("pikachu", "Electric", None, 40));

        for probe in ["pikachu", "PIKACHU", "PiKaChu"] {
            assert_eq!(store.find_by_name(probe).map(Entry::level), Some(12));
        }
        assert_eq!(store.find_by_name("Raichu"), None);
    }

    #[test]
    fn save_writes_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.txt");

        let mut store = Store::new();
        store.add(Entry::new("Charmander", "Fire", None, 5));
        store.add(Entry::new("Bulbasaur", "Grass", Some("Poison".into()), 7));
        store.save(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Charmander, Fire, N/A, 5\nBulbasaur, Grass, Poison, 7\n"
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.txt");

        let mut store = Store::new();
        store.add(Entry::new("Charmander", "Fire", None, 5));
        store.add(Entry::new("Bulbasaur", "Grass", Some("Poison".into()), 7));
        store.add(Entry::new("Onix", "Rock", Some("Ground".into()), 0));
        store.save(&path).unwrap();

        let mut reloaded = Store::new();
        let outcome = reloaded.load(&path).unwrap();
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                added: 3,
                skipped: vec![]
            }
        );
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn load_merges_into_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.txt");
        fs::write(&path, "Eevee, Normal, N/A, 10\n").unwrap();

        let mut store = Store::new();
        store.add(entry("Ditto", 20));
        store.load(&path).unwrap();

        assert_eq!(store.list(), vec!["Ditto - Level: 20", "Eevee - Level: 10"]);
    }

    #[test]
    fn load_missing_file_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::new();
        store.add(entry("Ditto", 20));

        let outcome = store.load(&dir.path().join("absent.txt")).unwrap();

        assert_eq!(outcome, LoadOutcome::Missing);
        assert_eq!(store.list(), vec!["Ditto - Level: 20"]);
    }

    #[test]
    fn load_skips_malformed_lines_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.txt");
        fs::write(
            &path,
            "Eevee, Normal, N/A, 10\n\
             garbage\n\
             \n\
             Snorlax, Normal, N/A, lots\n\
             Jigglypuff, Normal, Fairy, 8\n",
        )
        .unwrap();

        let mut store = Store::new();
        let outcome = store.load(&path).unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                added: 2,
                skipped: vec![
                    SkippedLine {
                        line: 2,
                        error: RecordError::FieldCount { found: 1 },
                    },
                    SkippedLine {
                        line: 4,
                        error: RecordError::Level {
                            value: "lots".into()
                        },
                    },
                ],
            }
        );
        assert_eq!(
            store.list(),
            vec!["Eevee - Level: 10", "Jigglypuff - Level: 8"]
        );
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("storage.txt");

        let err = Store::new().save(&path).unwrap_err();
        let StoreError::Io { path: failed, .. } = err;
        assert_eq!(failed, path);
    }

    #[test]
    fn names_with_surrounding_whitespace_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.txt");

        let mut store = Store::new();
        store.add(EntryForm::new(" Mew", "Psychic", "", "5").validate().unwrap());
        store.add(EntryForm::new("Ditto ", " Normal", "Ghost ", "1").validate().unwrap());
        store.save(&path).unwrap();

        let mut reloaded = Store::new();
        reloaded.load(&path).unwrap();

        assert_eq!(reloaded.entries(), store.entries());
        assert_eq!(reloaded.list(), vec![" Mew - Level: 5", "Ditto  - Level: 1"]);
    }

    #[test]
    fn load_skips_level_beyond_u32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.txt");
        fs::write(
            &path,
            "Mewtwo, Psychic, N/A, 99999999999\nMew, Psychic, N/A, 5\n",
        )
        .unwrap();

        let mut store = Store::new();
        let outcome = store.load(&path).unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                added: 1,
                skipped: vec![SkippedLine {
                    line: 1,
                    error: RecordError::Level {
                        value: "99999999999".into()
                    },
                }],
            }
        );
        assert_eq!(store.list(), vec!["Mew - Level: 5"]);
    }

    /// One record field: any printable text without the separator or a line
    /// break.
    fn arb_field() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 ,.'/?#-]{1,12}"
            .prop_filter("field contains the separator", |s| !s.contains(FIELD_SEPARATOR))
    }

    fn arb_entry() -> impl Strategy<Value = Entry> {
        (
            arb_field(),
            arb_field(),
            prop::option::of(arb_field()),
            any::<u32>(),
        )
            .prop_map(|(name, type1, type2, level)| Entry::new(name, type1, type2, level))
    }

    proptest! {
        /// `list()` yields one label per add, in insertion order.
        #[test]
        fn prop_list_follows_insertion_order(entries in prop::collection::vec(arb_entry(), 0..32)) {
            let mut store = Store::new();
            for entry in &entries {
                store.add(entry.clone());
            }

            let expected: Vec<String> = entries.iter().map(Entry::list_label).collect();
            prop_assert_eq!(store.list(), expected);
            prop_assert_eq!(store.len(), entries.len());
        }

        /// Saving and loading into an empty store reproduces every entry.
        #[test]
        fn prop_save_then_fresh_load_round_trips(entries in prop::collection::vec(arb_entry(), 0..16)) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("storage.txt");

            let mut store = Store::new();
            for entry in entries {
                store.add(entry);
            }
            store.save(&path).unwrap();

            let mut reloaded = Store::new();
            let outcome = reloaded.load(&path).unwrap();

            prop_assert_eq!(
                outcome,
                LoadOutcome::Loaded { added: store.len(), skipped: vec![] }
            );
            prop_assert_eq!(reloaded.entries(), store.entries());
        }
    }
}
