//! The Sass plugin.
//!
//! Tracks the configured Sass directory with a snapshot and, after every
//! build, compiles the stylesheets that changed into `<output>/_static`:
//!
//! ```text
//! Building CSS:
//!  + main.scss ✓
//!  = print.scss ✓
//!  - old.scss ✓
//! ```

mod compile;
mod plan;

pub use compile::{Compiler, SASS_FILTER, css_output, render_command};
pub use plan::{Action, STYLESHEET_EXTENSIONS, Step, has_work, is_partial, is_stylesheet, plan};

use crate::config::{ProjectPaths, SassConfig};
use crate::logger::FileStatus;
use crate::plugin::{Plugin, PluginContext, PluginError};
use crate::snapshot::Snapshot;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Name of the snapshot tracking the Sass directory.
pub const SNAPSHOT: &str = "sass";

/// State resolved during setup.
#[derive(Debug)]
struct Resolved {
    compiler: Compiler,
    partials: bool,
}

#[derive(Debug, Default)]
pub struct SassPlugin {
    resolved: Option<Resolved>,
}

impl Plugin for SassPlugin {
    fn setup(&mut self, ctx: &mut PluginContext<'_>, table: &toml::Table) -> Result<(), PluginError> {
        let (config, unknown) = match SassConfig::from_table(table) {
            Ok(parsed) => parsed,
            Err(e) => {
                ctx.error(format!("invalid configuration: {e}"));
                return Err(ctx.fatal(None));
            }
        };
        for key in unknown {
            ctx.warn(format!("unknown option `{key}`"));
        }

        let Some(dir) = config.resolved_path(ctx.base_dir()) else {
            ctx.error("No Sass path set.");
            return Err(ctx.fatal(None));
        };
        if !dir.is_dir() {
            ctx.error(format!("The directory ‘{}’ doesn't exist.", dir.display()));
            return Err(ctx.fatal(None));
        }

        ctx.snapshot_register(SNAPSHOT, &dir)?;

        let compiler = Compiler::new(
            config.command_args(),
            dir,
            ctx.static_output_dir(),
            ctx.base_dir().to_path_buf(),
        );
        self.resolved = Some(Resolved {
            compiler,
            partials: config.partials,
        });
        Ok(())
    }

    fn after_build(&mut self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        let Some(resolved) = &self.resolved else {
            return Ok(());
        };

        let steps = plan(&ctx.snapshot_diff(SNAPSHOT)?, resolved.partials);
        if !has_work(&steps) {
            return Ok(());
        }

        ctx.echo("Building CSS:");
        for step in &steps {
            let status = FileStatus::begin(&step.file, step.diff);
            match step.action {
                Action::Keep => status.done(),
                Action::Compile => match resolved.compiler.compile(&step.file) {
                    Ok(_) => status.done(),
                    Err(e) => {
                        status.failed();
                        ctx.error(format!("{e:#}"));
                        ctx.error(format!("Failed to build {}", step.file));
                        return Err(ctx.fatal(None));
                    }
                },
                Action::Remove => match resolved.compiler.remove(&step.file) {
                    Ok(()) => status.done(),
                    Err(e) => {
                        status.failed();
                        ctx.warn(format!("Can't delete {}: {e}", step.file));
                    }
                },
            }
        }
        Ok(())
    }
}

/// Remove the CSS compiled from `sass_dir` and the cached `sass` snapshot.
///
/// Returns the number of deleted CSS files.
pub fn clean(paths: &ProjectPaths, sass_dir: &Path, partials: bool) -> Result<usize> {
    let output_dir = paths.static_output_dir();
    let mut removed = 0;

    if sass_dir.is_dir() {
        let sources = Snapshot::scan(sass_dir)
            .with_context(|| format!("Failed to scan `{}`", sass_dir.display()))?;
        for file in sources.files() {
            if !is_stylesheet(file) || (partials && is_partial(file)) {
                continue;
            }
            let css = css_output(&output_dir, file);
            if css.is_file() {
                fs::remove_file(&css)
                    .with_context(|| format!("Failed to delete `{}`", css.display()))?;
                removed += 1;
            }
        }
    }

    let snap = paths.cache_dir().join(format!("{SNAPSHOT}.snap"));
    if snap.is_file() {
        fs::remove_file(&snap).with_context(|| format!("Failed to delete `{}`", snap.display()))?;
    }

    Ok(removed)
}
