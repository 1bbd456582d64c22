//! Directory snapshots for change detection between builds.
//!
//! A snapshot maps every non-hidden file under a directory (relative path,
//! `/`-separated) to its modification time in whole seconds. Comparing the
//! current snapshot with the one persisted by the previous build tells which
//! files were added, modified, left alone or deleted.
//!
//! # Text format
//!
//! ```text
//! main.scss:1718000000
//! theme/_colors.scss:1717990000
//! ```
//!
//! The line is split on its last `:`, so paths may contain colons.

mod registry;

pub use registry::{RESERVED_SNAPSHOTS, SnapshotRegistry};

use jwalk::WalkDir;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::UNIX_EPOCH;
use thiserror::Error;

/// Snapshot-related errors
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot root `{0}` is not an existing directory")]
    NotADirectory(String),

    #[error("malformed snapshot entry on line {line}: `{entry}`")]
    Malformed { line: usize, entry: String },

    #[error("'{0}' is a reserved snapshot entry")]
    Reserved(String),

    #[error("the snapshot '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("the snapshot '{0}' is not registered")]
    Unknown(String),

    #[error("the snapshot '{0}' was accessed before it was scanned")]
    NotScanned(String),

    #[error("IO error on snapshot `{0}`")]
    Io(String, #[source] std::io::Error),
}

/// Change kind of a single file between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diff {
    Added,
    Modified,
    Same,
    Deleted,
}

/// Per-file diff, ordered by relative path.
pub type DiffMap = BTreeMap<String, Diff>;

/// File → mtime map of a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeMap<String, u64>,
}

impl Snapshot {
    pub fn new(files: BTreeMap<String, u64>) -> Self {
        Self { files }
    }

    /// Scan `root` recursively, skipping hidden files and directories.
    pub fn scan(root: &Path) -> Result<Self, SnapshotError> {
        if !root.is_dir() {
            return Err(SnapshotError::NotADirectory(root.display().to_string()));
        }

        let mut files = BTreeMap::new();
        for entry in WalkDir::new(root).skip_hidden(true).sort(true) {
            let entry = entry.map_err(|e| {
                SnapshotError::Io(root.display().to_string(), std::io::Error::other(e.to_string()))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };

            let mtime = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map_or(0, |d| d.as_secs());

            files.insert(to_slash(relative), mtime);
        }

        Ok(Self { files })
    }

    /// Parse the text form produced by [`Snapshot::dump`].
    pub fn load(text: &str) -> Result<Self, SnapshotError> {
        let mut files = BTreeMap::new();

        for (i, entry) in text.lines().enumerate() {
            if entry.is_empty() {
                continue;
            }
            let malformed = || SnapshotError::Malformed {
                line: i + 1,
                entry: entry.to_string(),
            };

            let (path, time) = entry.rsplit_once(':').ok_or_else(malformed)?;
            let time = time.trim().parse::<u64>().map_err(|_| malformed())?;
            files.insert(path.to_string(), time);
        }

        Ok(Self { files })
    }

    /// Serialize to the `path:mtime` line format.
    pub fn dump(&self) -> String {
        let mut text = String::new();
        for (path, time) in &self.files {
            text.push_str(path);
            text.push(':');
            text.push_str(&time.to_string());
            text.push('\n');
        }
        text
    }

    /// Compare `self` (current) against `old` (previous build).
    pub fn diff(&self, old: &Snapshot) -> DiffMap {
        let mut diff = DiffMap::new();

        for (path, time) in &self.files {
            let kind = match old.files.get(path) {
                Some(old_time) if old_time == time => Diff::Same,
                Some(_) => Diff::Modified,
                None => Diff::Added,
            };
            diff.insert(path.clone(), kind);
        }

        for path in old.files.keys() {
            if !self.files.contains_key(path) {
                diff.insert(path.clone(), Diff::Deleted);
            }
        }

        diff
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Relative path with `/` separators on every platform.
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
