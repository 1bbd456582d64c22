//! `clean`: remove compiled CSS and cached snapshots.

use super::common::sass_decls;
use crate::config::ProjectConfig;
use crate::log;
use anyhow::Result;
use std::path::Path;

/// Clean the outputs of every Sass declaration. Returns the deleted CSS count.
pub fn clean_project(config: &ProjectConfig, cache_dir: Option<&Path>) -> Result<usize> {
    let paths = match cache_dir {
        Some(dir) => config.paths().with_cache_dir(dir),
        None => config.paths(),
    };

    let mut removed = 0;
    for decl in sass_decls(config)? {
        let Some(dir) = decl.source_dir(config.get_root()) else {
            continue;
        };
        removed += crate::sass::clean(&paths, &dir, decl.config.partials)?;
    }

    log!("clean"; "removed {} stylesheet(s)", removed);
    Ok(removed)
}
