//! `[plugin.<name>]` declarations.
//!
//! # Example
//!
//! ```toml
//! [plugin.sass]
//! package = "komoe-sass"
//!
//! [plugin.sass.config]
//! path = "sass"
//!
//! [plugin.local]
//! script = "plugins/local.py"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a plugin's implementation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginSource<'a> {
    /// An installable package, looked up by name.
    Package(&'a str),
    /// A script file inside the project, executed by the Komoe host.
    Script(&'a std::path::Path),
    /// Neither was given.
    Missing,
}

/// A single `[plugin.<name>]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginDecl {
    /// Package implementing the plugin.
    pub package: Option<String>,
    /// Local plugin script (alternative to `package`).
    pub script: Option<PathBuf>,
    /// Plugin-specific options, handed to the plugin untouched.
    pub config: toml::Table,
}

impl PluginDecl {
    /// Resolve the implementation source. `package` wins over `script`.
    pub fn source(&self) -> PluginSource<'_> {
        match (&self.package, &self.script) {
            (Some(package), _) => PluginSource::Package(package),
            (None, Some(script)) => PluginSource::Script(script),
            (None, None) => PluginSource::Missing,
        }
    }

    pub fn validate(&self, name: &str, diag: &mut ConfigDiagnostics) {
        let field = FieldPath::new("plugin").join(name);
        match self.source() {
            PluginSource::Missing => {
                diag.warn(field, format!("plugin “{name}” is declared but has no package/script"));
            }
            PluginSource::Package(package) if package.trim().is_empty() => {
                diag.error(field.join("package"), "package name is empty");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_sass_stanza() {
        let config = test_parse_config(
            r#"
[plugin.sass]
package = "komoe-sass"
config.path = "sass"
"#,
        );
        let decl = &config.plugin["sass"];
        assert_eq!(decl.source(), PluginSource::Package("komoe-sass"));
        assert_eq!(decl.config["path"].as_str(), Some("sass"));
    }

    #[test]
    fn test_script_plugin() {
        let config = test_parse_config(
            r#"
[plugin.local]
script = "plugins/local.py"
"#,
        );
        let decl = &config.plugin["local"];
        assert!(matches!(decl.source(), PluginSource::Script(_)));
        assert!(decl.config.is_empty());
    }

    #[test]
    fn test_missing_source_warns() {
        let decl = PluginDecl::default();
        let mut diag = ConfigDiagnostics::new();
        decl.validate("ghost", &mut diag);
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings()[0].field.as_str(), "plugin.ghost");
    }

    #[test]
    fn test_empty_package_is_error() {
        let decl = PluginDecl {
            package: Some("  ".into()),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        decl.validate("sass", &mut diag);
        assert_eq!(diag.errors()[0].field.as_str(), "plugin.sass.package");
    }
}
