//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "source"
//! templates = "templates"
//! static = "static"
//! output = "output"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project directories, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Page sources (markdown).
    pub source: PathBuf,
    /// Page templates.
    pub templates: PathBuf,
    /// Static files copied as-is into `<output>/_static`.
    #[serde(rename = "static")]
    pub static_dir: PathBuf,
    /// Generated site.
    pub output: PathBuf,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            source: "source".into(),
            templates: "templates".into(),
            static_dir: "static".into(),
            output: "output".into(),
        }
    }
}
