//! Coalesce bursts of filesystem events into one rebuild.

use crate::utils::path::normalize_path;
use notify::EventKind;
use notify::event::ModifyKind;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Quiet period after the last event before a rebuild starts.
const DEBOUNCE_MS: u64 = 300;
/// Minimum time between two rebuilds.
const REBUILD_COOLDOWN_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Editor swap/backup files and hidden files never trigger a rebuild.
fn is_noise(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bak" | "swp" | "swo" | "tmp") || name.ends_with('~') || name.starts_with('.')
}

#[derive(Debug, Default)]
pub struct Debouncer {
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
    last_build: Option<Instant>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event: &notify::Event) {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            // mtime/chmod noise
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(_) => ChangeKind::Modified,
            _ => return,
        };

        for path in event.paths.iter().filter(|p| !is_noise(p)) {
            self.record(normalize_path(path), kind);
        }
    }

    fn record(&mut self, path: PathBuf, kind: ChangeKind) {
        // Any event extends the quiet period, even one that changes nothing.
        self.last_event = Some(Instant::now());
        match (self.changes.get(&path).copied(), kind) {
            (None, _) => {
                self.changes.insert(path, kind);
            }
            // deleted then restored
            (Some(ChangeKind::Removed), ChangeKind::Created | ChangeKind::Modified) => {
                self.changes.insert(path, kind);
            }
            (Some(ChangeKind::Modified), ChangeKind::Removed) => {
                self.changes.insert(path, ChangeKind::Removed);
            }
            // appeared and vanished within the window
            (Some(ChangeKind::Created), ChangeKind::Removed) => {
                self.changes.remove(&path);
            }
            _ => {}
        }
    }

    fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        if last_event.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
            return false;
        }
        if let Some(last_build) = self.last_build
            && last_build.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS)
        {
            return false;
        }
        !self.changes.is_empty()
    }

    /// Take the pending changes once the debounce window and cooldown passed.
    pub fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        Some(std::mem::take(&mut self.changes))
    }

    /// Start the rebuild cooldown. Called only when a rebuild actually runs.
    pub fn mark_built(&mut self) {
        self.last_build = Some(Instant::now());
    }

    /// How long the event loop may block before checking again.
    pub fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(3600);
        };

        let debounce = Duration::from_millis(DEBOUNCE_MS).saturating_sub(last_event.elapsed());
        let cooldown = self
            .last_build
            .map(|t| Duration::from_millis(REBUILD_COOLDOWN_MS).saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce.max(cooldown).max(Duration::from_millis(1))
    }
}
