//! Sass/SCSS plugin for the Komoe static site generator.
//!
//! Declared in a project's `komoe.toml`:
//!
//! ```toml
//! [plugin.sass]
//! package = "komoe-sass"
//! config.path = "sass"
//! ```
//!
//! Stylesheets under `config.path` are compiled with the external `sass`
//! binary into `<output>/_static`, recompiling only what changed since the
//! previous build.

pub mod cli;
pub mod config;
pub mod logger;
pub mod plugin;
pub mod sass;
pub mod snapshot;
pub mod utils;
