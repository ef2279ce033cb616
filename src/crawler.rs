//! Source Crawler
//!
//! Walks a root directory breadth-first with an explicit queue and turns every
//! file with a known extension into an [`IndexableItem::File`]. A directory
//! with a known extension (a macOS `.app` bundle) is an item itself and is not
//! descended into. Directories that can't be listed are recorded as skipped
//! and the walk carries on.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::extensions::ExtensionRegistry;
use crate::indexable::IndexableItem;
use crate::sources::ItemSource;

/// Maximum sample paths kept per crawl for the skip summary log line
const SKIP_SAMPLE_LIMIT: usize = 5;

/// Why a directory was not listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PermissionDenied,
    PathTooLong,
    NotFound,
    NotADirectory,
    Other(io::ErrorKind),
}

impl SkipReason {
    fn from_io(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => return SkipReason::PermissionDenied,
            io::ErrorKind::NotFound => return SkipReason::NotFound,
            _ => {}
        }

        // Raw codes keep older toolchains working; the matching ErrorKinds are recent
        match error.raw_os_error() {
            // ENAMETOOLONG (linux 36, macOS 63), ERROR_FILENAME_EXCED_RANGE (windows)
            Some(36) if cfg!(target_os = "linux") => SkipReason::PathTooLong,
            Some(63) if cfg!(target_os = "macos") => SkipReason::PathTooLong,
            Some(206) if cfg!(windows) => SkipReason::PathTooLong,
            // ENOTDIR, ERROR_DIRECTORY (windows)
            Some(20) if cfg!(unix) => SkipReason::NotADirectory,
            Some(267) if cfg!(windows) => SkipReason::NotADirectory,
            _ => SkipReason::Other(error.kind()),
        }
    }
}

/// Outcome of trying to list one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryVisit {
    Listed { dir: PathBuf },
    Skipped { dir: PathBuf, reason: SkipReason },
}

impl DirectoryVisit {
    pub fn dir(&self) -> &Path {
        match self {
            DirectoryVisit::Listed { dir } | DirectoryVisit::Skipped { dir, .. } => dir,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, DirectoryVisit::Skipped { .. })
    }
}

/// Everything one crawl produced, fully materialized
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub items: Vec<IndexableItem>,
    /// One entry per directory dequeued, in visit order
    pub visits: Vec<DirectoryVisit>,
}

impl CrawlOutcome {
    pub fn skipped(&self) -> impl Iterator<Item = &DirectoryVisit> {
        self.visits.iter().filter(|v| v.is_skipped())
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }
}

/// Breadth-first walk of `root`. Never fails; unreadable directories are skipped.
pub fn crawl(root: &Path, extensions: &ExtensionRegistry) -> CrawlOutcome {
    let mut outcome = CrawlOutcome::default();
    let mut queue = VecDeque::new();
    queue.push_back(root.to_path_buf());

    while let Some(dir) = queue.pop_front() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                let reason = SkipReason::from_io(&e);
                debug!(dir = %dir.display(), ?reason, "Skipping directory");
                outcome.visits.push(DirectoryVisit::Skipped { dir, reason });
                continue;
            }
        };

        // Sorted so repeated crawls of an unchanged tree produce the same order
        let mut children: Vec<_> = entries.filter_map(|entry| entry.ok()).collect();
        children.sort_by_key(|entry| entry.file_name());

        for entry in children {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                // Bundles such as `Safari.app` are launchable as a whole
                if extensions.is_known_path(&path) {
                    outcome.items.push(IndexableItem::file(path));
                } else {
                    queue.push_back(path);
                }
                continue;
            }

            let is_file = if file_type.is_symlink() {
                // Follow links to files; linked directories could loop
                fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false)
            } else {
                file_type.is_file()
            };

            if is_file && extensions.is_known_path(&path) {
                outcome.items.push(IndexableItem::file(path));
            }
        }

        outcome.visits.push(DirectoryVisit::Listed { dir });
    }

    log_skip_summary(root, &outcome);
    outcome
}

fn log_skip_summary(root: &Path, outcome: &CrawlOutcome) {
    let skipped = outcome.skipped_count();
    if skipped == 0 {
        return;
    }

    let samples: Vec<String> = outcome
        .skipped()
        .take(SKIP_SAMPLE_LIMIT)
        .map(|v| v.dir().display().to_string())
        .collect();

    info!(
        root = %root.display(),
        skipped,
        listed = outcome.visits.len() - skipped,
        samples = samples.join(" | "),
        "Crawl skipped unreadable directories"
    );
}

/// A root directory indexed as one catalog source
#[derive(Debug, Clone)]
pub struct DirectorySource {
    name: String,
    root: PathBuf,
    extensions: ExtensionRegistry,
}

impl DirectorySource {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, extensions: ExtensionRegistry) -> Self {
        DirectorySource {
            name: name.into(),
            root: root.into(),
            extensions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ItemSource for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn collect(&self) -> Vec<IndexableItem> {
        crawl(&self.root, &self.extensions).items
    }
}
