use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

/// Error severity for whoever presents failures to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warning, // recoverable, the engine kept going
    Error,   // operation failed, caller must decide
}

/// Domain-specific errors for the index engine
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize persisted data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Rejected item: {0}")]
    InvalidItem(String),

    #[error("Rejected boost: {0}")]
    InvalidBoost(String),
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io { .. } => ErrorSeverity::Error,
            Self::Serialize(_) => ErrorSeverity::Error,
            Self::InvalidItem(_) => ErrorSeverity::Warning,
            Self::InvalidBoost(_) => ErrorSeverity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => format!("Could not write {}", path.display()),
            Self::Serialize(e) => format!("Could not encode data: {}", e),
            Self::InvalidItem(msg) => format!("Item ignored: {}", msg),
            Self::InvalidBoost(msg) => format!("Preference not saved: {}", msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;

/// Skips an unusable input (a malformed file, an invalid item) with a warning
/// that names the input and the call site, keeping the surrounding batch going.
///
/// ```ignore
/// use catapult::error::ResultExt;
///
/// let tree: Option<BookmarkFile> = serde_json::from_str(&content).skip_on_err(path.display());
/// ```
pub trait ResultExt<T> {
    fn skip_on_err(self, input: impl fmt::Display) -> Option<T>;
}

impl<T, E: fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn skip_on_err(self, input: impl fmt::Display) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    input = %input,
                    error = %error,
                    file = caller.file(),
                    line = caller.line(),
                    "Skipped unusable input"
                );
                None
            }
        }
    }
}
