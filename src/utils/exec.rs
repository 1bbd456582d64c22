//! Running the external compiler.
//!
//! ```ignore
//! Cmd::from_slice(&["sass", "sass/main.scss", "output/_static/main.css"])
//!     .cwd(root)
//!     .filter(&SASS_FILTER)
//!     .run()?;
//! ```
//!
//! Output is captured. On success, stderr lines that survive the filter are
//! logged under the program name; on failure they become the error detail.

use crate::log;
use regex::Regex;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Empty command")]
    Empty,

    #[error("Failed to execute `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{program}` failed with {status}{}", detail_suffix(.detail))]
    Failed {
        program: String,
        status: ExitStatus,
        detail: String,
    },
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!("\n{detail}")
    }
}

/// Prefixes of output lines that are noise rather than diagnostics.
pub struct FilterRule {
    pub skip_prefixes: &'static [&'static str],
}

/// Keep every line.
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    /// Whether a (plain, trimmed) line is worth showing.
    fn keeps(&self, line: &str) -> bool {
        !line.is_empty() && !self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Kept lines of `text`, with ANSI colors removed.
    fn kept_lines(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(|line| strip_ansi(line).trim().to_string())
            .filter(|line| self.keeps(line))
            .collect()
    }

    /// Log the kept lines of `text` under `name`.
    pub fn relay(&self, name: &str, text: &str) {
        let lines = self.kept_lines(text);
        if !lines.is_empty() {
            log!(name; "{}", lines.join("\n"));
        }
    }
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    static ANSI: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").ok());
    match ANSI.as_ref() {
        Some(re) => re.replace_all(s, ""),
        None => Cow::Borrowed(s),
    }
}

/// A rendered compiler command line.
pub struct Cmd {
    argv: Vec<OsString>,
    cwd: Option<PathBuf>,
    filter: &'static FilterRule,
}

impl Cmd {
    /// Build from a full argument vector, program first.
    pub fn from_slice<S: AsRef<OsStr>>(argv: &[S]) -> Self {
        Self {
            argv: argv.iter().map(|a| a.as_ref().to_owned()).collect(),
            cwd: None,
            filter: &EMPTY_FILTER,
        }
    }

    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn filter(mut self, filter: &'static FilterRule) -> Self {
        self.filter = filter;
        self
    }

    fn program(&self) -> String {
        self.argv
            .first()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Run to completion. A non-zero exit status is an error.
    pub fn run(self) -> Result<Output, ExecError> {
        let Some((program, args)) = self.argv.split_first().filter(|(p, _)| !p.is_empty()) else {
            return Err(ExecError::Empty);
        };

        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| ExecError::Spawn {
            program: self.program(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if output.status.success() {
            self.filter.relay(&self.program(), &stderr);
            return Ok(output);
        }

        let mut detail = self.filter.kept_lines(&stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if !stdout.is_empty() {
            detail.push(format!("Stdout:\n{stdout}"));
        }
        Err(ExecError::Failed {
            program: self.program(),
            status: output.status,
            detail: detail.join("\n"),
        })
    }
}
