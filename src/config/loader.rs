//! JSON persistence for the user config and the learned boosts.
//!
//! Loading never fails: a missing, unreadable or malformed file yields the
//! default value. Malformed files are first renamed aside so the user's data
//! is not lost when defaults are written back. Saving always reports failure.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::defaults::{APP_DIR_NAME, CONFIG_FILE_NAME, CORRUPT_BACKUP_MARKER, INDEX_FILE_NAME};
use super::types::UserConfig;
use crate::boosts::{BoostTable, IndexData};
use crate::error::{IndexError, Result};

/// Where a loaded value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Parsed from the file on disk
    File,
    /// No file yet
    Missing,
    /// The file exists but could not be read
    Unreadable,
    /// The file could not be parsed; `backup` is where it was moved, if the rename worked
    Corrupt { backup: Option<PathBuf> },
}

#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub origin: LoadOrigin,
}

/// Reads and writes the two persisted files under one data directory
#[derive(Debug, Clone)]
pub struct ConfigCodec {
    dir: PathBuf,
}

impl ConfigCodec {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ConfigCodec { dir: dir.into() }
    }

    /// `<platform config dir>/catapult`, falling back to the working directory
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE_NAME)
    }

    #[instrument(name = "load_user_config", skip(self))]
    pub fn load_user_config(&self) -> Loaded<UserConfig> {
        load_json(&self.config_path())
    }

    #[instrument(name = "save_user_config", skip(self, config))]
    pub fn save_user_config(&self, config: &UserConfig) -> Result<()> {
        save_json(config, &self.config_path())
    }

    #[instrument(name = "load_index_data", skip(self))]
    pub fn load_index_data(&self) -> Loaded<IndexData> {
        load_json(&self.index_path())
    }

    #[instrument(name = "save_index_data", skip(self, boosts))]
    pub fn save_index_data(&self, boosts: &BoostTable) -> Result<()> {
        save_json(&boosts.as_data(), &self.index_path())
    }
}

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Loaded<T> {
    // Raw bytes: invalid UTF-8 is a malformed file, not an unreadable one
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "File not found, using defaults");
            return Loaded {
                value: T::default(),
                origin: LoadOrigin::Missing,
            };
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "File unreadable, using defaults");
            return Loaded {
                value: T::default(),
                origin: LoadOrigin::Unreadable,
            };
        }
    };

    match serde_json::from_slice::<T>(&content) {
        Ok(value) => {
            debug!(path = %path.display(), bytes = content.len(), "Loaded file");
            Loaded {
                value,
                origin: LoadOrigin::File,
            }
        }
        Err(e) => {
            let backup = set_aside(path);
            warn!(
                path = %path.display(),
                error = %e,
                backup = ?backup,
                "File is malformed, using defaults"
            );
            Loaded {
                value: T::default(),
                origin: LoadOrigin::Corrupt { backup },
            }
        }
    }
}

/// Move a malformed file to `<name>.corrupt-<timestamp>`
fn set_aside(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_string_lossy();
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    let backup = path.with_file_name(format!("{file_name}.{CORRUPT_BACKUP_MARKER}-{stamp}"));
    match fs::rename(path, &backup) {
        Ok(()) => Some(backup),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to set malformed file aside");
            None
        }
    }
}

/// Pretty JSON, written to a temp file and renamed into place
fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(value)?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &json).map_err(|e| IndexError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| IndexError::io(path, e))?;

    debug!(path = %path.display(), bytes = json.len(), "Saved file (atomic)");
    Ok(())
}
