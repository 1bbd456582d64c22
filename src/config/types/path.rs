//! Project directory layout.

use std::path::{Path, PathBuf};

/// Name of the directory inside the output where static files land.
pub const STATIC_OUTPUT_DIR: &str = "_static";

/// Default cache directory, relative to the project root.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Absolute directories of a Komoe project.
///
/// All paths derive from the project root (the directory holding
/// `komoe.toml`) and the `[build]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    base_dir: PathBuf,
    cache_dir: PathBuf,
    output_dir: PathBuf,
}

impl ProjectPaths {
    pub fn new(base_dir: &Path, build: &crate::config::BuildSection) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            cache_dir: base_dir.join(DEFAULT_CACHE_DIR),
            output_dir: base_dir.join(&build.output),
        }
    }

    /// Override the cache directory (relative paths resolve against the root).
    pub fn with_cache_dir(mut self, dir: &Path) -> Self {
        self.cache_dir = self.base_dir.join(dir);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<output>/_static`, where compiled stylesheets are written.
    pub fn static_output_dir(&self) -> PathBuf {
        self.output_dir.join(STATIC_OUTPUT_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildSection;

    #[test]
    fn test_default_layout() {
        let paths = ProjectPaths::new(Path::new("/site"), &BuildSection::default());
        assert_eq!(paths.cache_dir(), Path::new("/site/.cache"));
        assert_eq!(paths.output_dir(), Path::new("/site/output"));
        assert_eq!(paths.static_output_dir(), PathBuf::from("/site/output/_static"));
    }

    #[test]
    fn test_cache_dir_override() {
        let paths = ProjectPaths::new(Path::new("/site"), &BuildSection::default())
            .with_cache_dir(Path::new("tmp/cache"));
        assert_eq!(paths.cache_dir(), Path::new("/site/tmp/cache"));

        let paths = ProjectPaths::new(Path::new("/site"), &BuildSection::default())
            .with_cache_dir(Path::new("/var/cache/site"));
        assert_eq!(paths.cache_dir(), Path::new("/var/cache/site"));
    }
}
