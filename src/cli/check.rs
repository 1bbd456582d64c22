//! `check`: validate the Sass configuration without building.

use super::common::sass_decls;
use crate::config::{ConfigDiagnostics, ConfigError, ProjectConfig};
use crate::log;
use crate::sass::{css_output, is_partial, is_stylesheet};
use crate::snapshot::Snapshot;
use crate::utils::path::display_relative;
use anyhow::Result;

/// Validate every Sass declaration and print what a clean build would do.
pub fn check_project(config: &ProjectConfig) -> Result<()> {
    let root = config.get_root();
    let decls = sass_decls(config)?;
    if decls.is_empty() {
        log!("check"; "no Sass plugin declared in `{}`", config.config_path.display());
        return Ok(());
    }

    let mut diag = ConfigDiagnostics::new();
    for decl in &decls {
        let field = decl.field();
        for key in &decl.unknown {
            diag.warn(field.join(key), "unknown option");
        }
        decl.config.validate(root, &field, &mut diag);
    }
    diag.print_warnings();
    diag.into_result().map_err(ConfigError::Diagnostics)?;

    let output_dir = config.paths().static_output_dir();
    for decl in &decls {
        let Some(dir) = decl.source_dir(root) else {
            continue;
        };
        log!("check"; "{}: {} → {}", decl.name, display_relative(&dir, root), display_relative(&output_dir, root));
        log!("check"; "command: {}", decl.config.command_args().join(" "));

        let sources = Snapshot::scan(&dir)?;
        for file in sources.files().filter(|f| is_stylesheet(f)) {
            if decl.config.partials && is_partial(file) {
                log!("check"; "  {} (partial)", file);
            } else {
                let css = css_output(&output_dir, file);
                log!("check"; "  {} → {}", file, display_relative(&css, root));
            }
        }
    }
    Ok(())
}
