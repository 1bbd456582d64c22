//! `watch`: rebuild when stylesheets or the project file change.
//!
//! ```text
//! notify watcher → crossbeam channel → Debouncer → build_project
//!                                   ↑
//!                       Ctrl+C → shutdown channel
//! ```
//!
//! The watcher starts before the initial build so no change is lost while
//! it runs.

mod debounce;

pub use debounce::{ChangeKind, Debouncer};

use super::args::BuildArgs;
use super::build::build_project;
use super::common::{sass_decls, validate_project};
use crate::config::{ProjectConfig, cfg, reload_config};
use crate::utils::path::{display_relative, normalize_path};
use crate::{debug, log};
use anyhow::{Context, Result};
use crossbeam::channel::{self, Receiver, Sender};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);
static SHUTDOWN_TX: OnceLock<Sender<()>> = OnceLock::new();

/// Install the Ctrl+C handler ending the watch loop.
fn setup_shutdown_handler() -> Result<Receiver<()>> {
    let (tx, rx) = channel::bounded(1);
    let _ = SHUTDOWN_TX.set(tx);

    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);
        if let Some(tx) = SHUTDOWN_TX.get() {
            let _ = tx.try_send(());
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))?;

    Ok(rx)
}

pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// What the watcher currently observes.
#[derive(Debug)]
struct Watched {
    config_path: PathBuf,
    root: PathBuf,
    sass_dirs: Vec<PathBuf>,
    /// Build products inside the watched trees (snapshots, compiled CSS).
    ignored: Vec<PathBuf>,
}

impl Watched {
    fn of(config: &ProjectConfig) -> Result<Self> {
        let root = config.get_root().to_path_buf();
        let sass_dirs = sass_decls(config)?
            .iter()
            .filter_map(|decl| decl.source_dir(&root))
            .filter(|dir| dir.is_dir())
            .map(|dir| normalize_path(&dir))
            .collect();
        let paths = config.paths();
        let ignored = vec![
            normalize_path(paths.cache_dir()),
            normalize_path(paths.output_dir()),
        ];
        Ok(Self {
            config_path: config.config_path.clone(),
            root,
            sass_dirs,
            ignored,
        })
    }

    fn attach(&self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        // Editors replace files on save, so watch the directory holding komoe.toml.
        watcher.watch(&self.root, RecursiveMode::NonRecursive)?;
        for dir in &self.sass_dirs {
            watcher.watch(dir, RecursiveMode::Recursive)?;
            log!("watch"; "watching {}", display_relative(dir, &self.root));
        }
        Ok(())
    }

    fn detach(&self, watcher: &mut RecommendedWatcher) {
        let _ = watcher.unwatch(&self.root);
        for dir in &self.sass_dirs {
            let _ = watcher.unwatch(dir);
        }
    }

    fn is_config(&self, path: &Path) -> bool {
        path == self.config_path
    }

    fn is_relevant(&self, path: &Path) -> bool {
        if self.is_config(path) {
            return true;
        }
        !self.ignored.iter().any(|dir| path.starts_with(dir))
            && self.sass_dirs.iter().any(|dir| path.starts_with(dir))
    }
}

/// Reload `komoe.toml` and the watch set derived from it.
///
/// Returns `None` when the file content did not change. A file that fails
/// to load or validate leaves the active config alone.
fn reload() -> Result<Option<Watched>> {
    let mut next = None;
    reload_config(|config| {
        next = Some(accept(config)?);
        Ok(())
    })?;
    Ok(next)
}

/// Watch set of a reloaded config, if the config is usable.
fn accept(config: &ProjectConfig) -> Result<Watched> {
    validate_project(config)?;
    Watched::of(config)
}

/// Build once, then keep rebuilding until Ctrl+C.
pub fn watch_project(args: &BuildArgs) -> Result<()> {
    let shutdown_rx = setup_shutdown_handler()?;

    let (event_tx, event_rx) = channel::unbounded();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })
    .context("Failed to start the file watcher")?;

    let mut watched = Watched::of(&cfg())?;
    watched.attach(&mut watcher)?;

    rebuild(&cfg(), args);
    // --clean only applies to the first build
    let args = BuildArgs {
        clean: false,
        ..args.clone()
    };

    log!("watch"; "waiting for changes, press Ctrl+C to stop");
    let mut debouncer = Debouncer::new();
    while !is_shutdown() {
        channel::select! {
            recv(shutdown_rx) -> _ => break,
            recv(event_rx) -> msg => match msg {
                Ok(Ok(event)) => debouncer.add_event(&event),
                Ok(Err(e)) => log!("watch"; "notify error: {}", e),
                Err(_) => break,
            },
            default(debouncer.sleep_duration()) => {
                let Some(changes) = debouncer.take_if_ready() else {
                    continue;
                };
                let mut changed: Vec<_> = changes
                    .into_iter()
                    .filter(|(path, _)| watched.is_relevant(path))
                    .collect();
                if changed.is_empty() {
                    continue;
                }
                changed.sort_by(|a, b| a.0.cmp(&b.0));

                for (path, kind) in &changed {
                    debug!("watch"; "{}: {}", kind.label(), display_relative(path, &watched.root));
                }

                if changed.iter().any(|(path, _)| watched.is_config(path)) {
                    match reload() {
                        Ok(Some(next)) => {
                            log!("watch"; "project file changed, reloading");
                            watched.detach(&mut watcher);
                            watched = next;
                            if let Err(e) = watched.attach(&mut watcher) {
                                log!("error"; "failed to watch: {}", e);
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            log!("error"; "keeping previous configuration: {:#}", e);
                            continue;
                        }
                    }
                }

                log!("watch"; "{} change(s) detected, rebuilding", changed.len());
                debouncer.mark_built();
                rebuild(&cfg(), &args);
            }
        }
    }

    log!("watch"; "stopped");
    Ok(())
}

/// Run a build, reporting failures without leaving the watch loop.
fn rebuild(config: &ProjectConfig, args: &BuildArgs) {
    if let Err(e) = build_project(config, args) {
        log!("error"; "{:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_watched_paths() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sass")).unwrap();
        let path = dir.path().join("komoe.toml");
        fs::write(
            &path,
            "[plugin.sass]\npackage = \"komoe-sass\"\nconfig.path = \"sass\"\n\n[plugin.gone]\npackage = \"komoe-sass\"\nconfig.path = \"missing\"\n",
        )
        .unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        let watched = Watched::of(&config).unwrap();
        let root = config.get_root();

        assert_eq!(watched.sass_dirs, vec![root.join("sass")]);
        assert!(watched.is_config(&root.join("komoe.toml")));
        assert!(watched.is_relevant(&root.join("sass/theme/main.scss")));
        assert!(!watched.is_relevant(&root.join("output/_static/main.css")));
    }

    #[test]
    fn test_build_products_in_project_root_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("komoe.toml");
        fs::write(
            &path,
            "[plugin.sass]\npackage = \"komoe-sass\"\nconfig.path = \".\"\n",
        )
        .unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        let watched = Watched::of(&config).unwrap();
        let root = config.get_root();

        assert_eq!(watched.sass_dirs, vec![root.to_path_buf()]);
        assert!(watched.is_relevant(&root.join("main.scss")));
        assert!(watched.is_relevant(&root.join("komoe.toml")));
        assert!(!watched.is_relevant(&root.join(".cache/sass.snap")));
        assert!(!watched.is_relevant(&root.join("output/_static/main.css")));
    }

    #[test]
    fn test_reload_rejects_invalid_sass_table() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sass")).unwrap();
        let path = dir.path().join("komoe.toml");

        fs::write(
            &path,
            "[plugin.sass]\npackage = \"komoe-sass\"\nconfig = { path = \"sass\" }\n",
        )
        .unwrap();
        let watched = accept(&ProjectConfig::load(&path).unwrap()).unwrap();
        assert_eq!(watched.sass_dirs.len(), 1);

        fs::write(
            &path,
            "[plugin.sass]\npackage = \"komoe-sass\"\nconfig = { path = \"sass\", partials = \"yes\" }\n",
        )
        .unwrap();
        let err = accept(&ProjectConfig::load(&path).unwrap()).unwrap_err();
        assert!(format!("{err:#}").contains("plugin.sass.config"));
    }
}
