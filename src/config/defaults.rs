//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Directory name used under the platform config/data dirs
pub const APP_DIR_NAME: &str = "catapult";

/// User configuration file (extra crawl roots, extra extensions)
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Learned boosts file
pub const INDEX_FILE_NAME: &str = "index.json";

/// Suffix inserted before the timestamp when an unreadable file is set aside
pub const CORRUPT_BACKUP_MARKER: &str = "corrupt";
