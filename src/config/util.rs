//! Configuration file lookup.

use super::ConfigError;
use std::path::{Path, PathBuf};

/// File name of a Komoe project file.
pub const CONFIG_FILE: &str = "komoe.toml";

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/sass/theme/  ← cwd
/// /home/user/site/komoe.toml   ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

/// Resolve the `-C` argument to a project file.
///
/// The argument may name the project file itself or a project directory
/// (containing `komoe.toml`). A bare file name that does not exist in the
/// current directory is searched upward.
pub fn resolve_config_path(arg: &Path) -> Result<PathBuf, ConfigError> {
    if arg.is_file() {
        return Ok(arg.to_path_buf());
    }

    if arg.is_dir() {
        let candidate = arg.join(CONFIG_FILE);
        return if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(ConfigError::NotFound(arg.to_path_buf()))
        };
    }

    find_config_file(arg).ok_or_else(|| ConfigError::NotFound(arg.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_upward() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        let nested = dir.path().join("sass/theme");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_file_from(&nested, Path::new(CONFIG_FILE)).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE));
    }

    #[test]
    fn test_find_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(find_config_file_from(dir.path(), &path), None);
        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file_from(Path::new("/"), &path), Some(path));
    }

    #[test]
    fn test_resolve_project_dir() {
        let dir = TempDir::new().unwrap();
        let err = resolve_config_path(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));

        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        assert_eq!(
            resolve_config_path(dir.path()).unwrap(),
            dir.path().join(CONFIG_FILE)
        );
        assert_eq!(
            resolve_config_path(&dir.path().join(CONFIG_FILE)).unwrap(),
            dir.path().join(CONFIG_FILE)
        );
    }
}
