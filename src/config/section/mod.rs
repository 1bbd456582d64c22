//! Configuration sections of `komoe.toml`.

mod build;
mod plugin;
mod sass;

pub use build::BuildSection;
pub use plugin::{PluginDecl, PluginSource};
pub use sass::{
    CommandSpec, DEFAULT_COMMAND, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER, SassConfig, SassStyle,
};
