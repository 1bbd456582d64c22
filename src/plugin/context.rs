//! The handle plugins receive in every lifecycle hook.

use super::PluginError;
use super::host::HostState;
use crate::config::ProjectPaths;
use crate::log;
use crate::snapshot::{DiffMap, Snapshot};
use std::path::{Path, PathBuf};

/// Build access scoped to one plugin.
///
/// Log lines are prefixed with the plugin name; warnings are counted so
/// `--strict` builds can fail on them.
pub struct PluginContext<'a> {
    name: &'a str,
    state: &'a mut HostState,
}

impl<'a> PluginContext<'a> {
    pub(super) fn new(name: &'a str, state: &'a mut HostState) -> Self {
        Self { name, state }
    }

    /// Name the plugin was declared under (`[plugin.<name>]`).
    pub fn name(&self) -> &str {
        self.name
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn error(&self, message: impl AsRef<str>) {
        log!("error"; "{}: {}", self.name, message.as_ref());
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.state.warnings += 1;
        log!("warning"; "{}: {}", self.name, message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        log!("info"; "{}: {}", self.name, message.as_ref());
    }

    /// Print a plain line, without prefix.
    pub fn echo(&self, message: impl AsRef<str>) {
        println!("{}", message.as_ref());
    }

    /// Build the error that aborts the build on behalf of this plugin.
    ///
    /// ```ignore
    /// return Err(ctx.fatal(None));
    /// ```
    pub fn fatal(&self, message: Option<&str>) -> PluginError {
        PluginError::Aborted {
            plugin: self.name.to_string(),
            message: message.map(str::to_string),
        }
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Track `path` (relative to the project root, or absolute) as `name`.
    pub fn snapshot_register(&mut self, name: &str, path: &Path) -> Result<(), PluginError> {
        self.state.snapshots.register(name, path)?;
        Ok(())
    }

    pub fn snapshot_current(&self, name: &str) -> Result<&Snapshot, PluginError> {
        Ok(self.state.snapshots.current(name)?)
    }

    pub fn snapshot_old(&self, name: &str) -> Result<Snapshot, PluginError> {
        Ok(self.state.snapshots.old(name)?)
    }

    pub fn snapshot_diff(&self, name: &str) -> Result<DiffMap, PluginError> {
        Ok(self.state.snapshots.diff(name)?)
    }

    // ========================================================================
    // Directories
    // ========================================================================

    pub fn paths(&self) -> &ProjectPaths {
        &self.state.paths
    }

    pub fn base_dir(&self) -> &Path {
        self.state.paths.base_dir()
    }

    pub fn cache_dir(&self) -> &Path {
        self.state.paths.cache_dir()
    }

    pub fn output_dir(&self) -> &Path {
        self.state.paths.output_dir()
    }

    pub fn static_output_dir(&self) -> PathBuf {
        self.state.paths.static_output_dir()
    }
}
