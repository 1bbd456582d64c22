//! Helpers shared by the subcommands.

use crate::config::{
    ConfigDiagnostics, ConfigError, FieldPath, PluginSource, ProjectConfig, SassConfig,
    resolve_config_path,
};
use crate::plugin::SASS_PACKAGES;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load and validate the project file named by `-C`.
pub fn load_project(arg: &Path) -> Result<ProjectConfig> {
    let path = resolve_config_path(arg)?;
    let config = ProjectConfig::load(&path)
        .with_context(|| format!("Failed to load `{}`", path.display()))?;
    validate_project(&config)?;
    Ok(config)
}

/// Validate a loaded project, including every Sass `config` table.
pub fn validate_project(config: &ProjectConfig) -> Result<()> {
    let mut diag = ConfigDiagnostics::new();
    config.validate(&mut diag);
    diag.print_warnings();
    diag.into_result().map_err(ConfigError::Diagnostics)?;
    sass_decls(config)?;
    Ok(())
}

/// A `[plugin.<name>]` declaration handled by the Sass plugin.
#[derive(Debug)]
pub struct SassDecl<'a> {
    pub name: &'a str,
    pub config: SassConfig,
    pub unknown: Vec<String>,
}

impl SassDecl<'_> {
    /// Field path of the declaration's config table.
    pub fn field(&self) -> FieldPath {
        FieldPath::new("plugin").join(self.name).join("config")
    }

    pub fn source_dir(&self, root: &Path) -> Option<PathBuf> {
        self.config.resolved_path(root)
    }
}

/// Every declaration using a Sass package, with its parsed config.
pub fn sass_decls(config: &ProjectConfig) -> Result<Vec<SassDecl<'_>>> {
    let mut decls = Vec::new();
    for (name, decl) in config.plugins() {
        let PluginSource::Package(package) = decl.source() else {
            continue;
        };
        if !SASS_PACKAGES.contains(&package.trim()) {
            continue;
        }

        let (sass, unknown) = SassConfig::from_table(&decl.config)
            .with_context(|| format!("Invalid `plugin.{name}.config`"))?;
        decls.push(SassDecl {
            name,
            config: sass,
            unknown,
        });
    }
    Ok(decls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_project_and_decls() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("komoe.toml"),
            r#"
[plugin.styles]
package = "komoe_sass"
config = { path = "sass", paht = "typo" }

[plugin.katex]
package = "komoe-katex"
"#,
        )
        .unwrap();

        let config = load_project(dir.path()).unwrap();
        let decls = sass_decls(&config).unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "styles");
        assert_eq!(decls[0].unknown, vec!["paht"]);
        assert_eq!(decls[0].field().as_str(), "plugin.styles.config");
        assert_eq!(
            decls[0].source_dir(config.get_root()),
            Some(config.get_root().join("sass"))
        );
    }

    #[test]
    fn test_load_project_rejects_empty_package() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("komoe.toml"), "[plugin.sass]\npackage = \"\"\n").unwrap();
        assert!(load_project(dir.path()).is_err());
    }

    #[test]
    fn test_load_project_rejects_bad_sass_table() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("komoe.toml"),
            "[plugin.sass]\npackage = \"komoe-sass\"\nconfig = { path = \"sass\", partials = \"yes\" }\n",
        )
        .unwrap();
        let err = load_project(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("plugin.sass.config"));
    }

    #[test]
    fn test_missing_project() {
        let dir = TempDir::new().unwrap();
        let err = load_project(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No project found"));
    }
}
