//! Plugin interface to the Komoe build process.
//!
//! A build drives every registered plugin through the same lifecycle:
//!
//! ```text
//! setup → load snapshots → scan → before_build → after_build → dump snapshots → cleanup
//! ```
//!
//! Plugins talk to the build through a [`PluginContext`], which prefixes
//! their log lines with the plugin name and gives access to the project
//! directories and the snapshot registry.

mod catalog;
mod context;
mod host;

pub use catalog::{SASS_PACKAGES, instantiate};
pub use context::PluginContext;
pub use host::{BuildOptions, BuildReport, CacheMode, PluginHost};

use crate::snapshot::SnapshotError;
use thiserror::Error;

/// Errors raised while loading or running plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin {plugin} aborted the build{}", message_suffix(.message))]
    Aborted {
        plugin: String,
        message: Option<String>,
    },

    #[error("{0} warning(s) reported and --strict is set")]
    Strict(usize),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Lifecycle stage a plugin is called in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Setup,
    BeforeBuild,
    AfterBuild,
    Cleanup,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Stage::Setup => "setup",
            Stage::BeforeBuild => "before_build",
            Stage::AfterBuild => "after_build",
            Stage::Cleanup => "cleanup",
        }
    }
}

/// A Komoe plugin.
///
/// Every hook has a no-op default, so plugins only implement the stages
/// they care about. `setup` receives the plugin's `config` table from
/// `komoe.toml`; plugins parse and keep what they need from it.
pub trait Plugin {
    fn setup(&mut self, ctx: &mut PluginContext<'_>, config: &toml::Table) -> Result<(), PluginError> {
        let _ = (ctx, config);
        Ok(())
    }

    fn before_build(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        let _ = ctx;
        Ok(())
    }

    fn after_build(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        let _ = ctx;
        Ok(())
    }

    fn cleanup(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        let _ = ctx;
        Ok(())
    }
}
