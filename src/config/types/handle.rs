//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement.
//! Watch mode reloads `komoe.toml` through this handle when it changes.

use crate::config::ProjectConfig;
use anyhow::Result;
use arc_swap::ArcSwap;
use rustc_hash::FxHasher;
use std::hash::Hasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<ProjectConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(ProjectConfig::default()));

/// Hash of the config file content currently loaded.
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

fn content_hash(content: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(content.as_bytes());
    hasher.finish()
}

#[inline]
pub fn cfg() -> Arc<ProjectConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: ProjectConfig) -> Arc<ProjectConfig> {
    if let Ok(content) = std::fs::read_to_string(&config.config_path) {
        CONFIG_HASH.store(content_hash(&content), Ordering::Relaxed);
    }

    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

/// Reload config from disk if content changed.
///
/// The new config is stored only once `check` accepts it; otherwise the
/// previous one stays active and the error is returned.
///
/// Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged.
pub fn reload_config(check: impl FnOnce(&ProjectConfig) -> Result<()>) -> Result<bool> {
    let current = cfg();
    let content = std::fs::read_to_string(&current.config_path)?;

    let new_hash = content_hash(&content);
    if new_hash == CONFIG_HASH.load(Ordering::Relaxed) {
        return Ok(false);
    }

    let new_config = ProjectConfig::load(&current.config_path)?;
    check(&new_config)?;
    CONFIG.store(Arc::new(new_config));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);

    Ok(true)
}
