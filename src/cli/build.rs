//! `build`: run the plugin lifecycle once.

use super::args::BuildArgs;
use super::clean::clean_project;
use crate::config::ProjectConfig;
use crate::log;
use crate::plugin::{BuildReport, PluginHost};
use anyhow::Result;
use std::time::Instant;

pub fn build_project(config: &ProjectConfig, args: &BuildArgs) -> Result<BuildReport> {
    let start = Instant::now();

    if args.clean {
        clean_project(config, args.cache_dir.as_deref())?;
    }

    let mut host = PluginHost::from_config(config, args.options());
    if host.is_empty() {
        log!("warning"; "no Sass plugin declared in `{}`", config.config_path.display());
    }

    let report = host.run()?;
    log!(
        "build";
        "done in {:.2?} ({} plugin(s), {} warning(s))",
        start.elapsed(),
        report.plugins,
        report.warnings
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn project(command: &str) -> (TempDir, ProjectConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sass")).unwrap();
        fs::write(root.join("sass/main.scss"), "body {}").unwrap();
        fs::write(
            root.join("komoe.toml"),
            format!(
                "[plugin.sass]\npackage = \"komoe-sass\"\n\n[plugin.sass.config]\npath = \"sass\"\ncommand = \"{command}\"\n"
            ),
        )
        .unwrap();
        let config = ProjectConfig::load(&root.join("komoe.toml")).unwrap();
        (dir, config)
    }

    fn css(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join("output/_static/main.css")
    }

    #[test]
    fn test_build_project() {
        let (dir, config) = project("cp {input} {output}");
        let report = build_project(&config, &BuildArgs::default()).unwrap();
        assert_eq!(report.plugins, 1);
        assert!(css(&dir).is_file());
    }

    #[test]
    fn test_clean_build_recompiles() {
        let (dir, config) = project("cp {input} {output}");
        build_project(&config, &BuildArgs::default()).unwrap();
        fs::write(css(&dir), "stale").unwrap();

        // Without --clean the unchanged source is skipped.
        build_project(&config, &BuildArgs::default()).unwrap();
        assert_eq!(fs::read_to_string(css(&dir)).unwrap(), "stale");

        let args = BuildArgs {
            clean: true,
            ..Default::default()
        };
        build_project(&config, &args).unwrap();
        assert_eq!(fs::read_to_string(css(&dir)).unwrap(), "body {}");
    }

    #[test]
    fn test_strict_build() {
        let (dir, config) = project("cp {input} {output}");
        build_project(&config, &BuildArgs::default()).unwrap();
        fs::remove_file(css(&dir)).unwrap();
        fs::remove_file(dir.path().join("sass/main.scss")).unwrap();

        let args = BuildArgs {
            strict: true,
            ..Default::default()
        };
        let err = build_project(&config, &args).unwrap_err();
        assert!(err.to_string().contains("--strict"));
        assert!(!Path::new(&css(&dir)).exists());
    }
}
