// Error types for the library surface. The interactive layer (`app`, `ui`,
// `main`) works with `anyhow::Result` and only inspects these where it has
// to pick a dialog message.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected form input. Checks run in field order and the first failure wins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("a name is required")]
    MissingName,

    #[error("a primary type is required")]
    MissingType,

    /// Level must be made of ASCII digits only and fit a `u32`.
    #[error("level must be a whole number, got {0:?}")]
    InvalidLevel(String),
}

/// A persisted line that could not be turned back into an entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected 4 fields separated by \", \", found {found}")]
    FieldCount { found: usize },

    #[error("level field is not an integer: {value:?}")]
    Level { value: String },
}

/// Storage file failures. A missing file on load is not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access storage file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Every way a sprite lookup can fail. The shell treats all of them as
/// "no sprite for this name".
#[derive(Debug, Error)]
pub enum SpriteError {
    /// The lookup service answered with a non-success status.
    #[error("no creature named {name:?} (HTTP {status})")]
    NotFound { name: String, status: u16 },

    /// The lookup body was not the expected JSON, or carried no sprite URL.
    #[error("unexpected lookup response for {name:?}: {reason}")]
    Malformed { name: String, reason: String },

    /// The sprite URL itself could not be downloaded.
    #[error("sprite download from {url} failed (HTTP {status})")]
    Download { url: String, status: u16 },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured lookup base URL is unusable.
    #[error("invalid lookup URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Invalid environment configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a number of seconds, got {value:?}")]
    Timeout { key: &'static str, value: String },

    #[error("{key} has unknown value {value:?} (expected one of: {expected})")]
    Choice {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}
