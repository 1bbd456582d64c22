//! Named snapshots with on-disk persistence.

use super::{DiffMap, Snapshot, SnapshotError};
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot names owned by the Komoe host itself.
pub const RESERVED_SNAPSHOTS: &[&str] = &["source", "static", "templates"];

/// A registered snapshot: where to scan and where the previous scan is kept.
#[derive(Debug)]
struct Entry {
    name: String,
    scan_path: PathBuf,
    cache_path: PathBuf,
    current: Option<Snapshot>,
    old: Option<Snapshot>,
}

impl Entry {
    fn load(&mut self) -> Result<(), SnapshotError> {
        if !self.cache_path.is_file() {
            return Ok(());
        }
        let text = fs::read_to_string(&self.cache_path)
            .map_err(|e| SnapshotError::Io(self.cache_path.display().to_string(), e))?;
        self.old = Some(Snapshot::load(&text)?);
        Ok(())
    }

    fn scan(&mut self) -> Result<(), SnapshotError> {
        self.current = Some(Snapshot::scan(&self.scan_path)?);
        Ok(())
    }

    fn dump(&self) -> Result<(), SnapshotError> {
        let Some(current) = &self.current else {
            return Ok(());
        };
        let io_err = |e| SnapshotError::Io(self.cache_path.display().to_string(), e);
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.cache_path, current.dump()).map_err(io_err)
    }
}

/// Registry of named snapshots, persisted as `<cache_dir>/<name>.snap`.
#[derive(Debug)]
pub struct SnapshotRegistry {
    base_dir: PathBuf,
    cache_dir: PathBuf,
    entries: Vec<Entry>,
}

impl SnapshotRegistry {
    pub fn new(base_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache_dir: cache_dir.into(),
            entries: Vec::new(),
        }
    }

    /// Cache file of the snapshot called `name`.
    pub fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{name}.snap"))
    }

    /// Track `path` (relative to the project root, or absolute) as `name`.
    pub fn register(&mut self, name: &str, path: &Path) -> Result<(), SnapshotError> {
        if RESERVED_SNAPSHOTS.contains(&name) {
            return Err(SnapshotError::Reserved(name.to_string()));
        }
        if self.is_registered(name) {
            return Err(SnapshotError::AlreadyRegistered(name.to_string()));
        }

        self.entries.push(Entry {
            name: name.to_string(),
            scan_path: self.base_dir.join(path),
            cache_path: self.cache_path(name),
            current: None,
            old: None,
        });
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    fn entry(&self, name: &str) -> Result<&Entry, SnapshotError> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| SnapshotError::Unknown(name.to_string()))
    }

    /// Snapshot taken during this build.
    pub fn current(&self, name: &str) -> Result<&Snapshot, SnapshotError> {
        self.entry(name)?
            .current
            .as_ref()
            .ok_or_else(|| SnapshotError::NotScanned(name.to_string()))
    }

    /// Snapshot from the previous build, empty if there was none.
    pub fn old(&self, name: &str) -> Result<Snapshot, SnapshotError> {
        Ok(self.entry(name)?.old.clone().unwrap_or_default())
    }

    pub fn diff(&self, name: &str) -> Result<DiffMap, SnapshotError> {
        let old = self.old(name)?;
        Ok(self.current(name)?.diff(&old))
    }

    pub fn load_all(&mut self) -> Result<(), SnapshotError> {
        self.entries.iter_mut().try_for_each(Entry::load)
    }

    pub fn scan_all(&mut self) -> Result<(), SnapshotError> {
        self.entries.iter_mut().try_for_each(Entry::scan)
    }

    pub fn dump_all(&self) -> Result<(), SnapshotError> {
        self.entries.iter().try_for_each(Entry::dump)
    }

    /// Forget the previous build: delete every cached snapshot file.
    pub fn clear_cached(&mut self) -> Result<(), SnapshotError> {
        for entry in &mut self.entries {
            entry.old = None;
            match fs::remove_file(&entry.cache_path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(SnapshotError::Io(entry.cache_path.display().to_string(), e));
                }
            }
        }
        Ok(())
    }
}
