// Inline image output for the sprite panel. Terminals that speak the Kitty
// graphics protocol or the iTerm2 inline-image protocol receive the PNG as
// base64 inside an escape sequence; everything else gets a text summary.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::api::Sprite;
use crate::config::ImageProtocol;

/// Kitty requires the base64 payload to be split into chunks of at most
/// this many bytes.
const KITTY_CHUNK: usize = 4096;

/// A protocol that can actually be emitted (`Auto` already resolved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Kitty,
    Iterm,
    Text,
}

/// Resolve `Auto` by looking at the variables terminals set about
/// themselves.
pub fn resolve_protocol<F>(wanted: ImageProtocol, env: F) -> Resolved
where
    F: Fn(&str) -> Option<String>,
{
    match wanted {
        ImageProtocol::Kitty => Resolved::Kitty,
        ImageProtocol::Iterm => Resolved::Iterm,
        ImageProtocol::Text => Resolved::Text,
        ImageProtocol::Auto => {
            let term = env("TERM").unwrap_or_default();
            let program = env("TERM_PROGRAM").unwrap_or_default();
            if env("KITTY_WINDOW_ID").is_some() || term.contains("kitty") || program == "ghostty" {
                Resolved::Kitty
            } else if matches!(program.as_str(), "iTerm.app" | "WezTerm") {
                Resolved::Iterm
            } else {
                Resolved::Text
            }
        }
    }
}

/// Everything that must be written to the terminal to show `sprite`.
pub fn encode(protocol: Resolved, sprite: &Sprite) -> String {
    match protocol {
        Resolved::Kitty => kitty(&sprite.bytes),
        Resolved::Iterm => iterm(&sprite.name, &sprite.bytes),
        Resolved::Text => describe(sprite),
    }
}

fn kitty(png: &[u8]) -> String {
    let payload = STANDARD.encode(png);
    let mut chunks: Vec<&[u8]> = payload.as_bytes().chunks(KITTY_CHUNK).collect();
    if chunks.is_empty() {
        chunks.push(b"");
    }

    let mut out = String::with_capacity(payload.len() + chunks.len() * 24);
    for (i, chunk) in chunks.iter().enumerate() {
        let more = u8::from(i + 1 < chunks.len());
        // base64 output is ASCII, so every chunk boundary is a char boundary
        let chunk = std::str::from_utf8(chunk).unwrap_or_default();
        if i == 0 {
            out.push_str(&format!("\x1b_Gf=100,a=T,m={more};{chunk}\x1b\\"));
        } else {
            out.push_str(&format!("\x1b_Gm={more};{chunk}\x1b\\"));
        }
    }
    out.push('\n');
    out
}

fn iterm(name: &str, bytes: &[u8]) -> String {
    format!(
        "\x1b]1337;File=name={};size={};inline=1:{}\x07\n",
        STANDARD.encode(name),
        bytes.len(),
        STANDARD.encode(bytes)
    )
}

/// Text stand-in for terminals without image support.
pub fn describe(sprite: &Sprite) -> String {
    let shape = match sprite.dimensions() {
        Some((w, h)) => format!("{w}x{h} PNG"),
        None => "image".to_string(),
    };
    format!(
        "[{} sprite: {shape}, {} bytes] {}\n",
        sprite.name,
        sprite.bytes.len(),
        sprite.url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sprite(bytes: Vec<u8>) -> Sprite {
        Sprite {
            name: "pikachu".into(),
            url: "https://example.test/25.png".into(),
            bytes,
        }
    }

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn explicit_protocols_win() {
        let kitty_env = env_of(&[("KITTY_WINDOW_ID", "1")]);
        assert_eq!(resolve_protocol(ImageProtocol::Text, &kitty_env), Resolved::Text);
        assert_eq!(resolve_protocol(ImageProtocol::Iterm, &kitty_env), Resolved::Iterm);
    }

    #[test]
    fn auto_detects_terminal() {
        assert_eq!(
            resolve_protocol(ImageProtocol::Auto, env_of(&[("TERM", "xterm-kitty")])),
            Resolved::Kitty
        );
        assert_eq!(
            resolve_protocol(ImageProtocol::Auto, env_of(&[("TERM_PROGRAM", "iTerm.app")])),
            Resolved::Iterm
        );
        assert_eq!(
            resolve_protocol(ImageProtocol::Auto, env_of(&[("TERM", "xterm-256color")])),
            Resolved::Text
        );
    }

    #[test]
    fn kitty_small_image_is_single_chunk() {
        let out = encode(Resolved::Kitty, &sprite(b"abc".to_vec()));
        assert_eq!(out, "\x1b_Gf=100,a=T,m=0;YWJj\x1b\\\n");
    }

    #[test]
    fn kitty_large_image_is_chunked() {
        // 6000 raw bytes -> 8000 base64 bytes -> two chunks
        let out = encode(Resolved::Kitty, &sprite(vec![0u8; 6000]));
        assert!(out.starts_with("\x1b_Gf=100,a=T,m=1;"));
        assert_eq!(out.matches("\x1b_G").count(), 2);
        assert!(out.contains("\x1b_Gm=0;"));
    }

    #[test]
    fn iterm_inline_sequence() {
        let out = encode(Resolved::Iterm, &sprite(b"abc".to_vec()));
        assert_eq!(
            out,
            "\x1b]1337;File=name=cGlrYWNodQ==;size=3;inline=1:YWJj\x07\n"
        );
    }

    #[test]
    fn text_summary_mentions_size_and_url() {
        let out = encode(Resolved::Text, &sprite(b"not a png".to_vec()));
        assert_eq!(
            out,
            "[pikachu sprite: image, 9 bytes] https://example.test/25.png\n"
        );
    }
}
