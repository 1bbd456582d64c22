//! Config field paths used in diagnostics.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, e.g. `plugin.sass.config.path`.
///
/// Plugin tables are keyed by a user-chosen name, so paths are built at
/// runtime with [`FieldPath::join`].
///
/// ```ignore
/// let table = FieldPath::new("plugin").join("sass").join("config");
/// diag.error(table.join("path"), "required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Append a child key.
    pub fn join(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{key}", self.0))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        let path = FieldPath::new("plugin").join("sass").join("config");
        assert_eq!(path.as_str(), "plugin.sass.config");
        assert_eq!(FieldPath::new("").join("build").as_str(), "build");
    }
}
