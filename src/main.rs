//! komoe-sass - compile the stylesheets of a Komoe project.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use komoe_sass::cli::{Cli, Commands, build, check, clean, common, watch};
use komoe_sass::config::init_config;
use komoe_sass::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose());

    let config = init_config(common::load_project(&cli.config)?);

    match &cli.command {
        Commands::Build { build_args } => build::build_project(&config, build_args).map(|_| ()),
        Commands::Watch { build_args } => watch::watch_project(build_args),
        Commands::Check { .. } => check::check_project(&config),
        Commands::Clean { cache_dir } => {
            clean::clean_project(&config, cache_dir.as_deref()).map(|_| ())
        }
    }
}
