//! Configuration module - user settings and persisted engine state
//!
//! # Module Structure
//!
//! - `defaults` - file names and other constants
//! - `types` - `UserConfig` and its normalization
//! - `loader` - `ConfigCodec`, the JSON reader/writer for `config.json` and `index.json`

mod defaults;
mod loader;
mod types;

pub use defaults::{APP_DIR_NAME, CONFIG_FILE_NAME, INDEX_FILE_NAME};
pub use loader::{ConfigCodec, LoadOrigin, Loaded};
pub use types::UserConfig;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
