//! Configuration type definitions

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::extensions::normalize_extension;

/// User configuration persisted in `config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Extra root directories to crawl, in the order the user listed them
    #[serde(default)]
    pub paths: Vec<String>,
    /// Extra launchable extensions on top of the host's registered types
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl UserConfig {
    /// Copy with blank entries dropped, whitespace trimmed and duplicates removed.
    /// Extensions are also lowercased and stripped of their leading dot.
    pub fn normalized(&self) -> UserConfig {
        let mut paths: Vec<String> = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let trimmed = path.trim();
            if !trimmed.is_empty() && !paths.iter().any(|p| p == trimmed) {
                paths.push(trimmed.to_string());
            }
        }

        let mut extensions: Vec<String> = Vec::with_capacity(self.extensions.len());
        for ext in &self.extensions {
            if let Some(normalized) = normalize_extension(ext) {
                if !extensions.contains(&normalized) {
                    extensions.push(normalized);
                }
            }
        }

        UserConfig { paths, extensions }
    }

    /// Configured roots with `~` expanded
    pub fn expanded_paths(&self) -> Vec<PathBuf> {
        self.paths
            .iter()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
            .collect()
    }
}
