//! assetpack - incremental asset bundle packager
//!
//! Packages changed asset directories into bundles, compresses bundles whose
//! content changed, publishes them into a version-stamped distribution tree,
//! and writes a YAML manifest with a version marker.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod builder;
mod cli;
mod commands;
mod common;
mod compress;
mod config;
mod detect;
mod error;
mod hash;
mod layout;
mod manifest;
mod packager;
mod path_utils;
mod pipeline;
mod platform;
#[cfg(test)]
mod test_fixtures;
mod transaction;
mod ui;

use cli::{Cli, Commands, LogFormat};

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,assetpack=info",
        1 => "info,assetpack=debug",
        _ => "debug,assetpack=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let quiet = cli.quiet;
    let result = match cli.command {
        Commands::Build(args) => commands::build::run(cli.config, args, quiet),
        Commands::Manifest(args) => commands::manifest::run(cli.config, args),
        Commands::Status(args) => commands::status::run(cli.config, args),
        Commands::List(args) => commands::list::run(cli.config, args),
        Commands::Compress(args) => commands::compress::run(cli.config, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
