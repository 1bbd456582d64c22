//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Display `path` relative to `root` when it lies inside it.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_missing_absolute() {
        let path = Path::new("/definitely/not/here.scss");
        assert_eq!(normalize_path(path), path);
    }

    #[test]
    fn test_normalize_relative_is_absolute() {
        assert!(normalize_path(Path::new("not-here.scss")).is_absolute());
    }

    #[test]
    fn test_display_relative() {
        let root = Path::new("/site");
        assert_eq!(display_relative(Path::new("/site/sass/a.scss"), root), "sass/a.scss");
        assert_eq!(display_relative(Path::new("/elsewhere/a.scss"), root), "/elsewhere/a.scss");
    }
}
