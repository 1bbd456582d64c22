//! Configuration error types.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, reading or checking `komoe.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("No project found in `{0}`")]
    NotFound(PathBuf),

    #[error("invalid `{field}`: {message}")]
    Invalid { field: String, message: String },

    /// Rendered in full by its own `Display`; carries no source.
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One finding about a config field.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    /// ```text
    /// plugin.sass.config.command: `sass` not found
    ///   hint: install Dart Sass
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.as_str().cyan(), self.message)?;
        match &self.hint {
            Some(hint) => write!(f, "\n  {} {hint}", "hint:".yellow()),
            None => Ok(()),
        }
    }
}

/// Findings of a validation pass, reported together.
///
/// Errors fail the command; warnings are printed and the command goes on.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
    warnings: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(list: &mut Vec<ConfigDiagnostic>, field: FieldPath, message: String, hint: Option<String>) {
        list.push(ConfigDiagnostic {
            field,
            message,
            hint,
        });
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        Self::push(&mut self.errors, field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        Self::push(&mut self.errors, field, message.into(), Some(hint.into()));
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        Self::push(&mut self.warnings, field, message.into(), None);
    }

    pub fn print_warnings(&self) {
        for warning in &self.warnings {
            crate::log!("warning"; "{}: {}", warning.field.as_str(), warning.message);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ConfigDiagnostic] {
        &self.warnings
    }

    /// `Err(self)` when any error was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.has_errors() { Err(self) } else { Ok(()) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        let noun = if count == 1 { "error" } else { "errors" };
        write!(f, "{}", format!("invalid configuration ({count} {noun})").red().bold())?;
        for error in &self.errors {
            write!(f, "\n\n{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("komoe.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("komoe.toml"));

        let invalid = ConfigError::Invalid {
            field: "plugin.sass.config".into(),
            message: "expected a table".into(),
        };
        assert_eq!(
            invalid.to_string(),
            "invalid `plugin.sass.config`: expected a table"
        );
    }

    #[test]
    fn test_diagnostics_collect() {
        let mut diag = ConfigDiagnostics::new();
        assert!(diag.is_empty());

        diag.warn(FieldPath::new("plugin.foo"), "no package");
        assert!(!diag.has_errors());
        assert_eq!(diag.warnings().len(), 1);

        diag.error(FieldPath::new("plugin.sass.config.path"), "missing");
        diag.error_with_hint(
            FieldPath::new("plugin.sass.config.command"),
            "`sass` not found",
            "install sass",
        );
        assert_eq!(diag.len(), 2);
        assert_eq!(diag.errors()[1].hint.as_deref(), Some("install sass"));

        let err = ConfigError::Diagnostics(diag.into_result().unwrap_err());
        let display = err.to_string();
        assert!(display.contains("2 errors"));
        assert!(display.contains("plugin.sass.config.path"));
        assert!(display.contains("install sass"));
    }
}
