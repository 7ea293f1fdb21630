// Entrypoint for the Pokémon storage application.
// - Reads configuration from the environment, sets up file logging, builds
//   the sprite client and session, then hands them to the menu loop.
// - Returns `anyhow::Result` so a failed save ends the process with an error.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pokestash::{ui::{main_menu, TerminalView}, Config, Session, SpriteClient};

fn main() -> anyhow::Result<()> {
    let log_path = init_logging();

    let config = Config::from_env().context("Invalid POKESTASH_* configuration")?;
    tracing::info!(?config, log = ?log_path, "starting");

    let client = SpriteClient::from_config(&config).context("Failed to build HTTP client")?;
    let session = Session::new(client, config.storage_path.clone());
    let view = TerminalView::new(&config);

    // Blocks until the user exits.
    main_menu(session, view)?;
    tracing::info!("exiting");
    Ok(())
}

/// Log to `<cache dir>/pokestash/pokestash.log` so tracing output never
/// lands between menu prompts. Without a writable cache dir we run silent.
fn init_logging() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("pokestash");
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("pokestash.log");
    let file = File::options().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pokestash=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}
