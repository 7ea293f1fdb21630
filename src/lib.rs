// Library root
// -----------
// The binary (`main.rs`) builds a session from these modules and hands it
// to the interactive menu.
//
// Module responsibilities:
// - `entry`: the creature record, its display strings, its persisted line
//   format and input validation.
// - `store`: the ordered in-memory collection and its text-file save/load.
// - `api`: the blocking PokeAPI client that resolves a name to sprite bytes.
// - `app`: the session object and one handler per user action, written
//   against the `View` trait.
// - `ui` / `graphics`: the terminal front-end implementing `View`.
// - `config` / `error`: environment configuration and error types.
pub mod api;
pub mod app;
pub mod config;
pub mod entry;
pub mod error;
pub mod graphics;
pub mod store;
pub mod ui;

pub use api::{Sprite, SpriteClient, SpriteSource};
pub use app::{Session, View};
pub use config::Config;
pub use entry::{Entry, EntryForm};
pub use store::{LoadOutcome, Store};
