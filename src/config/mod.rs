//! Project configuration management for `komoe.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── plugin     # [plugin.<name>]
//! │   └── sass       # [plugin.sass.config]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   ├── handle     # Global config handle
//! │   └── path       # ProjectPaths
//! ├── util.rs        # Config file lookup
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! Only the parts of the Komoe project file that matter to plugins are
//! modelled. Everything else is accepted and ignored.

pub mod section;
pub mod types;
mod util;

pub use util::{CONFIG_FILE, find_config_file, resolve_config_path};

pub use section::{
    BuildSection, CommandSpec, DEFAULT_COMMAND, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER,
    PluginDecl, PluginSource, SassConfig, SassStyle,
};

pub use types::{
    ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, ProjectPaths, cfg, init_config,
    reload_config,
};

use crate::debug;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing komoe.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Host version requirement (e.g. ">=0.4")
    #[serde(default)]
    pub komoe_require: Option<String>,

    /// Project directories
    #[serde(default)]
    pub build: BuildSection,

    /// Plugin declarations, keyed by plugin name
    #[serde(default)]
    pub plugin: BTreeMap<String, PluginDecl>,
}

impl ProjectConfig {
    /// Load configuration from a `komoe.toml` path.
    ///
    /// Keys this crate does not model (page settings, markdown options, ...)
    /// belong to the Komoe host; they are listed in verbose mode only.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        for field in &ignored {
            debug!("config"; "not used by plugins: {}", field);
        }

        let config_path = crate::utils::path::normalize_path(path);
        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Directory layout derived from `[build]`.
    pub fn paths(&self) -> ProjectPaths {
        ProjectPaths::new(&self.root, &self.build)
    }

    /// Plugin declarations in name order.
    pub fn plugins(&self) -> impl Iterator<Item = (&str, &PluginDecl)> {
        self.plugin.iter().map(|(name, decl)| (name.as_str(), decl))
    }

    /// Validate plugin declarations. Sass options are validated separately
    /// (see [`SassConfig::validate`]) since they belong to one plugin.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (name, decl) in self.plugins() {
            decl.validate(name, diag);
        }
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
