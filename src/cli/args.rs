//! Command-line interface definitions.

use crate::plugin::{BuildOptions, CacheMode};
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Sass plugin for the Komoe static site generator
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Project file or directory (default: komoe.toml, searched upward)
    #[arg(short = 'C', long, default_value = "komoe.toml", value_hint = clap::ValueHint::AnyPath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile changed stylesheets
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build, then rebuild whenever a stylesheet or komoe.toml changes
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Validate the plugin configuration and show what would be compiled
    #[command(visible_alias = "c")]
    Check {
        /// Enable verbose output for debugging
        #[arg(short = 'V', long)]
        verbose: bool,
    },

    /// Delete compiled CSS and the cached snapshot
    Clean {
        /// Cache directory (relative to project root)
        #[arg(long, value_hint = clap::ValueHint::DirPath)]
        cache_dir: Option<PathBuf>,
    },
}

/// Shared build arguments for Build and Watch commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Delete compiled CSS and the cache before building
    #[arg(short, long)]
    pub clean: bool,

    /// Fail when any warning is reported
    #[arg(short, long)]
    pub strict: bool,

    /// Delete the cache and do not write a new one
    #[arg(long, conflicts_with = "ignore_cache")]
    pub no_cache: bool,

    /// Neither read nor write the cache
    #[arg(long)]
    pub ignore_cache: bool,

    /// Cache directory (relative to project root, default: .cache)
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub fn cache_mode(&self) -> CacheMode {
        if self.no_cache {
            CacheMode::Disabled
        } else if self.ignore_cache {
            CacheMode::Ignore
        } else {
            CacheMode::Use
        }
    }

    pub fn options(&self) -> BuildOptions {
        BuildOptions {
            cache: self.cache_mode(),
            strict: self.strict,
            cache_dir: self.cache_dir.clone(),
        }
    }
}

impl Cli {
    pub fn verbose(&self) -> bool {
        match &self.command {
            Commands::Build { build_args } | Commands::Watch { build_args } => build_args.verbose,
            Commands::Check { verbose } => *verbose,
            Commands::Clean { .. } => false,
        }
    }
}
