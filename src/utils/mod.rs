//! Shared helpers.
//!
//! - [`exec`]: external command execution (the Sass compiler)
//! - [`path`]: filesystem path normalization

pub mod exec;
pub mod path;
