//! Logging utilities with colored output and per-file status lines.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed with `--verbose`
//! - `FileStatus` for the `" + main.scss ✓"` lines printed while building
//!
//! # Example
//!
//! ```ignore
//! log!("sass"; "compiling {} files", count);
//!
//! let status = FileStatus::begin("main.scss", Diff::Added);
//! status.done();
//! ```

use crate::snapshot::Diff;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use owo_colors::OwoColorize;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// A `FileStatus` line is on screen without its newline yet.
static LINE_OPEN: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    if LINE_OPEN.swap(false, Ordering::SeqCst) {
        writeln!(stdout).ok();
    }
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "watch" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        "warning" => prefix.yellow().bold().to_string(),
        "info" | "check" => prefix.bright_blue().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// File Status (one line per processed file)
// ============================================================================

/// Tag printed in front of a file name for a given change kind.
pub const fn diff_tag(diff: Diff) -> &'static str {
    match diff {
        Diff::Added => " + ",
        Diff::Modified => " ~ ",
        Diff::Same => " = ",
        Diff::Deleted => " - ",
    }
}

/// Render the pending status line shown while the file is processed.
pub fn format_file_status(file: &str, diff: Diff) -> String {
    format!("{}{file} … ", diff_tag(diff).bold())
}

/// Render the final status line with its outcome mark.
pub fn format_file_result(file: &str, diff: Diff, mark: &str) -> String {
    format!("{}{file} {mark}", diff_tag(diff).bold())
}

/// A status line for one file that is finished with `done()` or `failed()`.
///
/// On a terminal the pending line is shown right away and rewritten in place
/// once the outcome is known. Elsewhere only the final line is written.
#[must_use]
pub struct FileStatus {
    file: String,
    diff: Diff,
    finished: bool,
}

impl FileStatus {
    /// Show the pending line (terminals only).
    pub fn begin(file: &str, diff: Diff) -> Self {
        let mut stdout = stdout().lock();
        if stdout.is_tty() {
            write!(stdout, "{}", format_file_status(file, diff)).ok();
            stdout.flush().ok();
            LINE_OPEN.store(true, Ordering::SeqCst);
        }
        Self {
            file: file.to_string(),
            diff,
            finished: false,
        }
    }

    /// Mark the file as processed (✓).
    pub fn done(mut self) {
        self.finish(&"✓".green().to_string());
    }

    /// Mark the file as failed (✗).
    pub fn failed(mut self) {
        self.finish(&"✗".red().to_string());
    }

    fn finish(&mut self, mark: &str) {
        let mut stdout = stdout().lock();
        // Still on the pending line unless a log message broke it
        if LINE_OPEN.swap(false, Ordering::SeqCst) {
            execute!(
                stdout,
                cursor::MoveToColumn(0),
                Clear(ClearType::CurrentLine)
            )
            .ok();
        }
        writeln!(stdout, "{}", format_file_result(&self.file, self.diff, mark)).ok();
        stdout.flush().ok();
        self.finished = true;
    }
}

impl Drop for FileStatus {
    fn drop(&mut self) {
        if !self.finished && LINE_OPEN.swap(false, Ordering::SeqCst) {
            let mut stdout = stdout().lock();
            writeln!(stdout).ok();
            stdout.flush().ok();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
