//! Plugin registration and lifecycle driving.

use super::{Plugin, PluginContext, PluginError, Stage, catalog};
use crate::config::{PluginSource, ProjectConfig, ProjectPaths};
use crate::snapshot::SnapshotRegistry;
use crate::debug;
use std::path::PathBuf;

/// What to do with snapshots cached by previous builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Diff against the cached snapshots and store this build's (default).
    #[default]
    Use,
    /// Delete cached snapshots; this build starts from scratch and stores nothing.
    Disabled,
    /// Neither read nor write the cache.
    Ignore,
}

/// Options of a single build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub cache: CacheMode,
    /// Fail the build when any plugin reported a warning.
    pub strict: bool,
    /// Cache directory override, relative to the project root.
    pub cache_dir: Option<PathBuf>,
}

/// Summary of a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub plugins: usize,
    pub warnings: usize,
}

/// State shared with plugins through [`PluginContext`].
#[derive(Debug)]
pub(super) struct HostState {
    pub(super) paths: ProjectPaths,
    pub(super) snapshots: SnapshotRegistry,
    pub(super) warnings: usize,
}

struct Registered {
    name: String,
    plugin: Box<dyn Plugin>,
    config: toml::Table,
}

/// Owns the plugins of a project and runs them through a build.
pub struct PluginHost {
    state: HostState,
    plugins: Vec<Registered>,
    options: BuildOptions,
}

impl PluginHost {
    pub fn new(paths: ProjectPaths, options: BuildOptions) -> Self {
        let paths = match &options.cache_dir {
            Some(dir) => paths.with_cache_dir(dir),
            None => paths,
        };
        let snapshots = SnapshotRegistry::new(paths.base_dir(), paths.cache_dir());

        Self {
            state: HostState {
                paths,
                snapshots,
                warnings: 0,
            },
            plugins: Vec::new(),
            options,
        }
    }

    /// Register every declared plugin this crate implements.
    ///
    /// Plugins provided by other packages or by project scripts are run by
    /// the Komoe host itself and are skipped here.
    pub fn from_config(config: &ProjectConfig, options: BuildOptions) -> Self {
        let mut host = Self::new(config.paths(), options);

        for (name, decl) in config.plugins() {
            match decl.source() {
                PluginSource::Package(package) => match catalog::instantiate(package) {
                    Some(plugin) => host.register(name, plugin, decl.config.clone()),
                    None => {
                        debug!("plugin"; "“{}” ({}) is not provided here, skipping", name, package);
                    }
                },
                PluginSource::Script(script) => {
                    debug!("plugin"; "“{}” is a script plugin ({}), skipping", name, script.display());
                }
                // reported by `ProjectConfig::validate`
                PluginSource::Missing => {
                    debug!("plugin"; "“{}” has no package/script, skipping", name);
                }
            }
        }

        host
    }

    /// Add a plugin under `name` with its `config` table.
    pub fn register(&mut self, name: &str, plugin: Box<dyn Plugin>, config: toml::Table) {
        self.plugins.push(Registered {
            name: name.to_string(),
            plugin,
            config,
        });
    }

    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run a complete build. `cleanup` runs even when an earlier stage failed.
    pub fn run(&mut self) -> Result<BuildReport, PluginError> {
        self.notify(Stage::Setup)?;

        let built = self.build_stages();
        let cleaned = self.notify(Stage::Cleanup);
        built?;
        cleaned?;

        let report = BuildReport {
            plugins: self.plugins.len(),
            warnings: self.state.warnings,
        };
        if self.options.strict && report.warnings > 0 {
            return Err(PluginError::Strict(report.warnings));
        }
        Ok(report)
    }

    fn build_stages(&mut self) -> Result<(), PluginError> {
        let snapshots = &mut self.state.snapshots;
        match self.options.cache {
            CacheMode::Use => snapshots.load_all()?,
            CacheMode::Disabled => snapshots.clear_cached()?,
            CacheMode::Ignore => {}
        }
        snapshots.scan_all()?;

        self.notify(Stage::BeforeBuild)?;
        self.notify(Stage::AfterBuild)?;

        if self.options.cache == CacheMode::Use {
            self.state.snapshots.dump_all()?;
        }
        Ok(())
    }

    fn notify(&mut self, stage: Stage) -> Result<(), PluginError> {
        for registered in &mut self.plugins {
            debug!("plugin"; "{} {}", stage.label(), registered.name);

            let mut ctx = PluginContext::new(&registered.name, &mut self.state);
            let plugin = &mut registered.plugin;
            match stage {
                Stage::Setup => plugin.setup(&mut ctx, &registered.config)?,
                Stage::BeforeBuild => plugin.before_build(&mut ctx)?,
                Stage::AfterBuild => plugin.after_build(&mut ctx)?,
                Stage::Cleanup => plugin.cleanup(&mut ctx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildSection;
    use crate::snapshot::Diff;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Records the stages it sees and the diff of its snapshot.
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
        fail_in: Option<Stage>,
        warn: bool,
    }

    impl Recorder {
        fn record(&self, ctx: &PluginContext<'_>, stage: Stage) -> Result<(), PluginError> {
            self.log.borrow_mut().push(stage.label().to_string());
            if self.fail_in == Some(stage) {
                return Err(ctx.fatal(Some("boom")));
            }
            Ok(())
        }
    }

    impl Plugin for Recorder {
        fn setup(&mut self, ctx: &mut PluginContext<'_>, config: &toml::Table) -> Result<(), PluginError> {
            let dir = config["dir"].as_str().unwrap_or("tracked");
            ctx.snapshot_register("tracked", Path::new(dir))?;
            self.record(ctx, Stage::Setup)
        }

        fn before_build(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
            let current = ctx.snapshot_current("tracked")?.len();
            let old = ctx.snapshot_old("tracked")?.len();
            ctx.info(format!("{current} tracked, {old} cached"));
            self.log.borrow_mut().push(format!("{current}/{old}"));
            self.record(ctx, Stage::BeforeBuild)
        }

        fn after_build(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
            for (file, diff) in ctx.snapshot_diff("tracked")? {
                self.log.borrow_mut().push(format!("{file}:{diff:?}"));
            }
            if self.warn {
                ctx.warn("something odd");
            }
            self.record(ctx, Stage::AfterBuild)
        }

        fn cleanup(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
            self.record(ctx, Stage::Cleanup)
        }
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("tracked")).unwrap();
        fs::write(dir.path().join("tracked/a.txt"), "a").unwrap();
        dir
    }

    fn host_with(
        dir: &TempDir,
        options: BuildOptions,
        fail_in: Option<Stage>,
        warn: bool,
    ) -> (PluginHost, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let paths = ProjectPaths::new(dir.path(), &BuildSection::default());
        let mut host = PluginHost::new(paths, options);
        let mut config = toml::Table::new();
        config.insert("dir".into(), "tracked".into());
        host.register(
            "recorder",
            Box::new(Recorder {
                log: Rc::clone(&log),
                fail_in,
                warn,
            }),
            config,
        );
        (host, log)
    }

    #[test]
    fn test_lifecycle_order() {
        let dir = project();
        let (mut host, log) = host_with(&dir, BuildOptions::default(), None, false);

        let report = host.run().unwrap();
        assert_eq!(report.plugins, 1);
        assert_eq!(
            *log.borrow(),
            vec!["setup", "1/0", "before_build", "a.txt:Added", "after_build", "cleanup"]
        );
        assert!(dir.path().join(".cache/tracked.snap").is_file());
    }

    #[test]
    fn test_second_build_sees_cache() {
        let dir = project();
        host_with(&dir, BuildOptions::default(), None, false).0.run().unwrap();

        let (mut host, log) = host_with(&dir, BuildOptions::default(), None, false);
        host.run().unwrap();
        assert!(log.borrow().contains(&"1/1".to_string()));
        assert!(log.borrow().contains(&format!("a.txt:{:?}", Diff::Same)));
    }

    #[test]
    fn test_ignore_cache_does_not_write() {
        let dir = project();
        let options = BuildOptions {
            cache: CacheMode::Ignore,
            ..Default::default()
        };
        host_with(&dir, options, None, false).0.run().unwrap();
        assert!(!dir.path().join(".cache/tracked.snap").exists());
    }

    #[test]
    fn test_disabled_cache_starts_over() {
        let dir = project();
        host_with(&dir, BuildOptions::default(), None, false).0.run().unwrap();

        let options = BuildOptions {
            cache: CacheMode::Disabled,
            ..Default::default()
        };
        let (mut host, log) = host_with(&dir, options, None, false);
        host.run().unwrap();
        assert!(log.borrow().contains(&"a.txt:Added".to_string()));
        assert!(!dir.path().join(".cache/tracked.snap").exists());
    }

    #[test]
    fn test_custom_cache_dir() {
        let dir = project();
        let options = BuildOptions {
            cache_dir: Some("tmp/snaps".into()),
            ..Default::default()
        };
        host_with(&dir, options, None, false).0.run().unwrap();
        assert!(dir.path().join("tmp/snaps/tracked.snap").is_file());
    }

    #[test]
    fn test_abort_still_cleans_up() {
        let dir = project();
        let (mut host, log) =
            host_with(&dir, BuildOptions::default(), Some(Stage::AfterBuild), false);

        let err = host.run().unwrap_err();
        assert_eq!(err.to_string(), "plugin recorder aborted the build: boom");
        assert_eq!(log.borrow().last().map(String::as_str), Some("cleanup"));
        assert!(!dir.path().join(".cache/tracked.snap").exists());
    }

    #[test]
    fn test_strict_fails_on_warning() {
        let dir = project();
        let options = BuildOptions {
            strict: true,
            ..Default::default()
        };
        let (mut host, _) = host_with(&dir, options, None, true);
        assert!(matches!(host.run(), Err(PluginError::Strict(1))));

        let (mut host, _) = host_with(&dir, BuildOptions::default(), None, true);
        assert_eq!(host.run().unwrap().warnings, 1);
    }

    #[test]
    fn test_from_config_picks_known_packages() {
        let dir = project();
        let config = crate::config::test_parse_config(
            r#"
[plugin.sass]
package = "komoe-sass"
config.path = "sass"

[plugin.other]
package = "komoe-katex"

[plugin.local]
script = "plugins/local.py"
"#,
        );
        let mut config = config;
        config.root = dir.path().to_path_buf();

        let host = PluginHost::from_config(&config, BuildOptions::default());
        assert_eq!(host.plugin_names().collect::<Vec<_>>(), vec!["sass"]);
    }
}
