//! Turn a snapshot diff into per-file compile/remove steps.

use crate::snapshot::{Diff, DiffMap};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// Extensions compiled by Sass.
pub const STYLESHEET_EXTENSIONS: &[&str] = &["scss", "sass"];

/// What to do with one stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run the compiler.
    Compile,
    /// Delete the compiled CSS.
    Remove,
    /// Nothing to do (unchanged, or a partial).
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub file: String,
    pub diff: Diff,
    pub action: Action,
}

pub fn is_stylesheet(file: &str) -> bool {
    Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.contains(&ext))
}

/// `_colors.scss` style import-only file.
pub fn is_partial(file: &str) -> bool {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('_'))
}

/// `main.scss` and `main.sass` share the output `main.css`.
fn output_key(file: &str) -> PathBuf {
    Path::new(file).with_extension("")
}

/// Plan the work for `diff`, in path order.
///
/// With `partials` set, partials are never compiled themselves, and any
/// change to one schedules every remaining entry stylesheet.
///
/// A deleted stylesheet whose CSS is also produced by a surviving one is not
/// removed; the survivor is compiled instead.
pub fn plan(diff: &DiffMap, partials: bool) -> Vec<Step> {
    let compiled = |file: &str| is_stylesheet(file) && !(partials && is_partial(file));

    let partial_changed = partials
        && diff
            .iter()
            .any(|(file, diff)| is_stylesheet(file) && is_partial(file) && *diff != Diff::Same);

    let mut live = FxHashSet::default();
    let mut orphaned = FxHashSet::default();
    for (file, diff) in diff.iter().filter(|(file, _)| compiled(file.as_str())) {
        if *diff == Diff::Deleted {
            orphaned.insert(output_key(file));
        } else {
            live.insert(output_key(file));
        }
    }

    diff.iter()
        .filter(|(file, _)| is_stylesheet(file))
        .map(|(file, &diff)| {
            let action = if !compiled(file.as_str()) {
                Action::Keep
            } else {
                match diff {
                    Diff::Added | Diff::Modified => Action::Compile,
                    Diff::Deleted if live.contains(&output_key(file)) => Action::Keep,
                    Diff::Deleted => Action::Remove,
                    Diff::Same if partial_changed || orphaned.contains(&output_key(file)) => {
                        Action::Compile
                    }
                    Diff::Same => Action::Keep,
                }
            };
            Step {
                file: file.clone(),
                diff,
                action,
            }
        })
        .collect()
}

/// Whether the plan has anything to report.
pub fn has_work(steps: &[Step]) -> bool {
    steps
        .iter()
        .any(|step| step.diff != Diff::Same || step.action != Action::Keep)
}
