// Configuration read once at startup from the environment. Every setting has
// a default, so running with an empty environment behaves like the plain
// desktop utility: PokeAPI, `pokemon_storage.txt`, no request timeout.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::store::DEFAULT_STORAGE_FILE;

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2/pokemon";

const API_URL_VAR: &str = "POKESTASH_API_URL";
const STORAGE_VAR: &str = "POKESTASH_STORAGE";
const TIMEOUT_VAR: &str = "POKESTASH_HTTP_TIMEOUT";
const IMAGE_VAR: &str = "POKESTASH_IMAGE";
const DIALOGS_VAR: &str = "POKESTASH_DIALOGS";

/// How the image panel draws a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageProtocol {
    /// Pick from the terminal's own environment variables.
    Auto,
    Kitty,
    Iterm,
    /// Describe the sprite instead of drawing it.
    Text,
}

/// Where blocking message dialogs are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogStyle {
    Terminal,
    /// Native message boxes through `rfd`.
    Native,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub storage_path: PathBuf,
    /// `None` means requests may block indefinitely.
    pub http_timeout: Option<Duration>,
    pub image: ImageProtocol,
    pub dialogs: DialogStyle,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_FILE),
            http_timeout: None,
            image: ImageProtocol::Auto,
            dialogs: DialogStyle::Terminal,
        }
    }
}

impl Config {
    /// Read the `POKESTASH_*` variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(url) = get(API_URL_VAR) {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = get(STORAGE_VAR) {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(value) = get(TIMEOUT_VAR) {
            let secs = value.trim().parse::<u64>().map_err(|_| ConfigError::Timeout {
                key: TIMEOUT_VAR,
                value: value.clone(),
            })?;
            config.http_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(value) = get(IMAGE_VAR) {
            config.image = match value.trim().to_lowercase().as_str() {
                "auto" => ImageProtocol::Auto,
                "kitty" => ImageProtocol::Kitty,
                "iterm" => ImageProtocol::Iterm,
                "text" => ImageProtocol::Text,
                _ => {
                    return Err(ConfigError::Choice {
                        key: IMAGE_VAR,
                        value,
                        expected: "auto, kitty, iterm, text",
                    })
                }
            };
        }
        if let Some(value) = get(DIALOGS_VAR) {
            config.dialogs = match value.trim().to_lowercase().as_str() {
                "terminal" => DialogStyle::Terminal,
                "native" => DialogStyle::Native,
                _ => {
                    return Err(ConfigError::Choice {
                        key: DIALOGS_VAR,
                        value,
                        expected: "terminal, native",
                    })
                }
            };
        }

        Ok(config)
    }
}
