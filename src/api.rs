// API client module: resolves a creature name to its sprite through the
// PokeAPI lookup endpoint, then downloads the sprite image. Blocking on
// purpose: the shell calls it straight from a menu action and waits.

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::SpriteError;

/// Anything that can turn a name into sprite bytes. The shell only talks to
/// this trait, so tests can swap in canned responses.
pub trait SpriteSource {
    fn resolve(&self, name: &str) -> Result<Sprite, SpriteError>;
}

/// A downloaded sprite image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub name: String,
    pub url: String,
    pub bytes: Vec<u8>,
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

impl Sprite {
    /// Width and height from the PNG header, if the bytes are a PNG.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let bytes = &self.bytes;
        if bytes.len() < 24 || !bytes.starts_with(PNG_SIGNATURE) || &bytes[12..16] != b"IHDR" {
            return None;
        }
        let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
        let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
        Some((width, height))
    }
}

/// Only the part of the lookup response we use.
#[derive(Deserialize, Debug)]
struct LookupResponse {
    sprites: Sprites,
}

#[derive(Deserialize, Debug)]
struct Sprites {
    front_default: Option<String>,
}

/// Blocking client for the lookup service.
#[derive(Clone)]
pub struct SpriteClient {
    client: Client,
    base_url: Url,
}

impl SpriteClient {
    /// Create a client from the loaded configuration. Without a configured
    /// timeout requests wait indefinitely.
    pub fn from_config(config: &Config) -> Result<Self, SpriteError> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Self::with_client(client, &config.api_url)
    }

    /// Use an existing reqwest client against `base_url`, which must be an
    /// absolute http(s) URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, SpriteError> {
        let invalid = |reason: String| SpriteError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let base_url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".into()));
        }
        Ok(SpriteClient { client, base_url })
    }

    /// Lookup endpoint for `name`. The lowercased name is one encoded path
    /// segment, so `/`, `?` or `#` in a name stay part of the name.
    fn lookup_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in with_client
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&name.to_lowercase());
        }
        url
    }

    /// First request: name to sprite URL.
    fn sprite_url(&self, name: &str) -> Result<String, SpriteError> {
        let url = self.lookup_url(name);
        debug!(%url, "looking up creature");
        let res = self.client.get(url).send()?;
        let status = res.status();
        if !status.is_success() {
            warn!(creature = name, status = status.as_u16(), "lookup failed");
            return Err(SpriteError::NotFound {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let body: LookupResponse = res.json().map_err(|e| SpriteError::Malformed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        body.sprites.front_default.ok_or_else(|| SpriteError::Malformed {
            name: name.to_string(),
            reason: "no front_default sprite".into(),
        })
    }
}

impl SpriteSource for SpriteClient {
    fn resolve(&self, name: &str) -> Result<Sprite, SpriteError> {
        let url = self.sprite_url(name)?;
        debug!(%url, "downloading sprite");
        let res = self.client.get(&url).send()?;
        let status = res.status();
        if !status.is_success() {
            return Err(SpriteError::Download {
                url,
                status: status.as_u16(),
            });
        }
        let bytes = res.bytes()?.to_vec();
        debug!(creature = name, size = bytes.len(), "sprite downloaded");
        Ok(Sprite {
            name: name.to_string(),
            url,
            bytes,
        })
    }
}
