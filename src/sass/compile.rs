//! Compiler invocation and output file handling.

use crate::config::{INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};
use crate::utils::exec::{Cmd, FilterRule};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Dart Sass noise that should not reach the build log.
pub const SASS_FILTER: FilterRule = FilterRule::new(&[
    "DEPRECATION WARNING",
    "Deprecation Warning",
    "More info and automated migrator",
    "More info:",
]);

/// Substitute the placeholders of a command template.
pub fn render_command(template: &[String], input: &Path, output: &Path) -> Vec<String> {
    let input = input.display().to_string();
    let output = output.display().to_string();
    template
        .iter()
        .map(|arg| {
            arg.replace(INPUT_PLACEHOLDER, &input)
                .replace(OUTPUT_PLACEHOLDER, &output)
        })
        .collect()
}

/// CSS file produced from `file` (relative to the Sass directory).
pub fn css_output(output_dir: &Path, file: &str) -> PathBuf {
    output_dir.join(file).with_extension("css")
}

/// Compiles stylesheets of one Sass directory into one output directory.
#[derive(Debug, Clone)]
pub struct Compiler {
    template: Vec<String>,
    source_dir: PathBuf,
    output_dir: PathBuf,
    cwd: PathBuf,
}

impl Compiler {
    pub fn new(template: Vec<String>, source_dir: PathBuf, output_dir: PathBuf, cwd: PathBuf) -> Self {
        Self {
            template,
            source_dir,
            output_dir,
            cwd,
        }
    }

    pub fn output_for(&self, file: &str) -> PathBuf {
        css_output(&self.output_dir, file)
    }

    /// Compile `file`, creating the output's parent directories.
    pub fn compile(&self, file: &str) -> Result<PathBuf> {
        let input = self.source_dir.join(file);
        let output = self.output_for(file);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create `{}`", parent.display()))?;
        }

        let args = render_command(&self.template, &input, &output);
        Cmd::from_slice(args.as_slice())
            .cwd(&self.cwd)
            .filter(&SASS_FILTER)
            .run()?;
        Ok(output)
    }

    /// Delete the CSS compiled from `file`.
    pub fn remove(&self, file: &str) -> std::io::Result<()> {
        fs::remove_file(self.output_for(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn template(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_render_command() {
        let args = render_command(
            &template("sass --load-path=x {input} {output}"),
            Path::new("/site/sass/main.scss"),
            Path::new("/site/output/_static/main.css"),
        );
        assert_eq!(
            args,
            vec![
                "sass",
                "--load-path=x",
                "/site/sass/main.scss",
                "/site/output/_static/main.css"
            ]
        );
    }

    #[test]
    fn test_render_keeps_spaces_in_paths() {
        let args = render_command(
            &template("sass {input} {output}"),
            Path::new("/my site/a.scss"),
            Path::new("/my site/a.css"),
        );
        assert_eq!(args.len(), 3);
        assert_eq!(args[1], "/my site/a.scss");
    }

    #[test]
    fn test_css_output() {
        let out = Path::new("/out/_static");
        assert_eq!(css_output(out, "main.scss"), out.join("main.css"));
        assert_eq!(css_output(out, "theme/print.sass"), out.join("theme/print.css"));
    }

    #[test]
    fn test_compile_and_remove() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("sass/theme");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("main.scss"), "a { color: red }").unwrap();

        let compiler = Compiler::new(
            template("cp {input} {output}"),
            dir.path().join("sass"),
            dir.path().join("output/_static"),
            dir.path().to_path_buf(),
        );

        let output = compiler.compile("theme/main.scss").unwrap();
        assert_eq!(output, dir.path().join("output/_static/theme/main.css"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "a { color: red }");

        compiler.remove("theme/main.scss").unwrap();
        assert!(!output.exists());
        assert!(compiler.remove("theme/main.scss").is_err());
    }

    #[test]
    fn test_compile_failure() {
        let dir = TempDir::new().unwrap();
        let compiler = Compiler::new(
            template("cp {input} {output}"),
            dir.path().join("sass"),
            dir.path().join("out"),
            dir.path().to_path_buf(),
        );
        let err = compiler.compile("missing.scss").unwrap_err();
        assert!(err.to_string().contains("Command `cp` failed"));
    }
}
