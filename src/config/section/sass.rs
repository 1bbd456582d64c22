//! Sass plugin options (`[plugin.sass.config]`).
//!
//! # Example
//!
//! ```toml
//! [plugin.sass]
//! package = "komoe-sass"
//!
//! [plugin.sass.config]
//! path = "sass"
//! # Optional, defaults to "sass {input} {output}"
//! command = ["npx", "sass", "--no-source-map", "{input}", "{output}"]
//! # Optional, passed as --style to the default command
//! style = "compressed"
//! # Optional, default true: `_name.scss` files are import-only
//! partials = true
//! ```

use crate::config::{ConfigDiagnostics, ConfigError, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder replaced by the source stylesheet path.
pub const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder replaced by the compiled CSS path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";
/// Compiler invocation used when `command` is not set.
pub const DEFAULT_COMMAND: &str = "sass {input} {output}";

/// Compiler command, as a single line or as an argument array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// `"sass {input} {output}"`, split on whitespace.
    Line(String),
    /// `["sass", "{input}", "{output}"]`, used verbatim.
    Args(Vec<String>),
}

impl CommandSpec {
    /// Argument vector before placeholder substitution.
    pub fn to_args(&self) -> Vec<String> {
        match self {
            CommandSpec::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            CommandSpec::Args(args) => args.clone(),
        }
    }
}

/// Output style of the Dart Sass CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SassStyle {
    Expanded,
    Compressed,
}

impl SassStyle {
    pub const fn as_flag(self) -> &'static str {
        match self {
            SassStyle::Expanded => "--style=expanded",
            SassStyle::Compressed => "--style=compressed",
        }
    }
}

/// Options of the Sass plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SassConfig {
    /// Directory holding `.scss`/`.sass` sources, relative to the project root.
    pub path: Option<PathBuf>,
    /// Compiler command template.
    pub command: Option<CommandSpec>,
    /// Output style flag for the default command.
    pub style: Option<SassStyle>,
    /// Treat `_*.scss` files as import-only partials.
    pub partials: bool,
}

impl Default for SassConfig {
    fn default() -> Self {
        Self {
            path: None,
            command: None,
            style: None,
            partials: true,
        }
    }
}

impl SassConfig {
    /// Parse the plugin's `config` table.
    ///
    /// Returns the config and the unknown keys found in the table.
    pub fn from_table(table: &toml::Table) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let value = toml::Value::Table(table.clone());
        let config = serde_ignored::deserialize(value, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(|e: toml::de::Error| ConfigError::Invalid {
            field: "config".into(),
            message: e.message().to_string(),
        })?;
        Ok((config, ignored))
    }

    /// Source directory with `~` expanded, joined onto `root`.
    pub fn resolved_path(&self, root: &Path) -> Option<PathBuf> {
        self.path.as_ref().map(|path| {
            let raw = path.to_string_lossy();
            let expanded = shellexpand::tilde(&raw).into_owned();
            root.join(expanded)
        })
    }

    /// Full argument template, with the style flag applied.
    pub fn command_args(&self) -> Vec<String> {
        match &self.command {
            Some(spec) => spec.to_args(),
            None => {
                let mut args = CommandSpec::Line(DEFAULT_COMMAND.into()).to_args();
                if let Some(style) = self.style {
                    args.push(style.as_flag().to_string());
                }
                args
            }
        }
    }

    /// Validate against the project rooted at `root`.
    ///
    /// `table` is the field path of the config table (e.g. `plugin.sass.config`).
    pub fn validate(&self, root: &Path, table: &FieldPath, diag: &mut ConfigDiagnostics) {
        match self.resolved_path(root) {
            None => diag.error_with_hint(
                table.join("path"),
                "No Sass path set.",
                "point `path` at the directory holding your .scss files",
            ),
            Some(dir) if !dir.is_dir() => diag.error(
                table.join("path"),
                format!("The directory ‘{}’ doesn't exist.", dir.display()),
            ),
            Some(_) => {}
        }

        let args = self.command_args();
        let Some(program) = args.first() else {
            diag.error(table.join("command"), "command is empty");
            return;
        };

        if !args.iter().any(|a| a.contains(INPUT_PLACEHOLDER)) {
            diag.error(
                table.join("command"),
                format!("command has no {INPUT_PLACEHOLDER} placeholder"),
            );
        }
        if !args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER)) {
            diag.warn(
                table.join("command"),
                format!("command has no {OUTPUT_PLACEHOLDER} placeholder"),
            );
        }
        if self.command.is_some() && self.style.is_some() {
            diag.warn(
                table.join("style"),
                "ignored because a custom command is set",
            );
        }

        if which::which(program).is_err() {
            diag.error_with_hint(
                table.join("command"),
                format!("`{program}` not found"),
                "install Dart Sass (https://sass-lang.com/install) or update the command",
            );
        }
    }
}
