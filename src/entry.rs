// Entry module: one creature record, its display strings and the
// one-line persisted form. `EntryForm` is the raw text the user typed and
// the only place input gets validated.

use std::fmt;
use std::str::FromStr;

use crate::error::{RecordError, ValidationError};

/// Written in place of a missing secondary type.
pub const NO_SECONDARY_TYPE: &str = "N/A";

/// Separator between the fields of a persisted line.
pub const FIELD_SEPARATOR: &str = ", ";

/// A single creature record. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    type1: String,
    type2: Option<String>,
    level: u32,
}

impl Entry {
    /// Build an entry from already-checked values. A secondary type equal to
    /// the `N/A` sentinel (or empty) is stored as absent.
    pub fn new(
        name: impl Into<String>,
        type1: impl Into<String>,
        type2: Option<String>,
        level: u32,
    ) -> Self {
        let type2 = type2.filter(|t| !t.is_empty() && t != NO_SECONDARY_TYPE);
        Entry {
            name: name.into(),
            type1: type1.into(),
            type2,
            level,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type1(&self) -> &str {
        &self.type1
    }

    pub fn type2(&self) -> Option<&str> {
        self.type2.as_deref()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Secondary type as displayed and persisted.
    fn type2_or_sentinel(&self) -> &str {
        self.type2().unwrap_or(NO_SECONDARY_TYPE)
    }

    /// Line shown in the list view: `"<name> - Level: <level>"`.
    pub fn list_label(&self) -> String {
        format!("{} - Level: {}", self.name, self.level)
    }

    /// Persisted form, without the trailing newline.
    pub fn to_record(&self) -> String {
        [
            self.name.as_str(),
            self.type1.as_str(),
            self.type2_or_sentinel(),
            &self.level.to_string(),
        ]
        .join(FIELD_SEPARATOR)
    }

    /// Case-insensitive name comparison used for lookups.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Type: {}, {}, Level: {})",
            self.name,
            self.type1,
            self.type2_or_sentinel(),
            self.level
        )
    }
}

impl FromStr for Entry {
    type Err = RecordError;

    /// Parse one persisted line. Only the line terminator is stripped, so
    /// whitespace inside the fields survives a save and reload.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let &[name, type1, type2, level] = fields.as_slice() else {
            return Err(RecordError::FieldCount {
                found: fields.len(),
            });
        };
        let level = level.parse::<u32>().map_err(|_| RecordError::Level {
            value: level.to_string(),
        })?;
        Ok(Entry::new(name, type1, Some(type2.to_string()), level))
    }
}

/// The four input fields exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub name: String,
    pub type1: String,
    pub type2: String,
    pub level: String,
}

impl EntryForm {
    pub fn new(
        name: impl Into<String>,
        type1: impl Into<String>,
        type2: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        EntryForm {
            name: name.into(),
            type1: type1.into(),
            type2: type2.into(),
            level: level.into(),
        }
    }

    /// Presence checks on name and primary type, digits-only check on level.
    /// A whitespace-only name or type counts as missing.
    pub fn validate(&self) -> Result<Entry, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.type1.trim().is_empty() {
            return Err(ValidationError::MissingType);
        }
        let digits_only = !self.level.is_empty() && self.level.chars().all(|c| c.is_ascii_digit());
        let level = digits_only
            .then(|| self.level.parse::<u32>().ok())
            .flatten()
            .ok_or_else(|| ValidationError::InvalidLevel(self.level.clone()))?;

        let type2 = (!self.type2.is_empty()).then(|| self.type2.clone());
        Ok(Entry::new(self.name.clone(), self.type1.clone(), type2, level))
    }
}
