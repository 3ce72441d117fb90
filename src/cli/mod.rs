//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - build: Build command arguments
//! - manifest: Manifest command arguments
//! - status: Status command arguments
//! - list: List command arguments
//! - compress: Compress command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod build;
pub mod completions;
pub mod compress;
pub mod list;
pub mod manifest;
pub mod status;

pub use build::BuildArgs;
pub use completions::CompletionsArgs;
pub use compress::CompressArgs;
pub use list::ListArgs;
pub use manifest::ManifestArgs;
pub use status::StatusArgs;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// assetpack - incremental asset bundle packager
///
/// Package asset directories into bundles, compress what changed, and publish a versioned manifest.
#[derive(Parser, Debug)]
#[command(
    name = "assetpack",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Incremental asset bundle packager",
    long_about = "assetpack packages every changed asset directory into a bundle, compresses \
                  bundles whose content changed, copies them into a version-stamped distribution \
                  tree, and writes a YAML manifest with a version marker.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  assetpack build                          \x1b[90m# Build changed bundles for Android\x1b[0m\n   \
                  assetpack build --platform ios --force   \x1b[90m# Rebuild everything for iOS\x1b[0m\n   \
                  assetpack build --group UI               \x1b[90m# Build only the UI group\x1b[0m\n   \
                  assetpack status                         \x1b[90m# Show which bundles are dirty\x1b[0m\n   \
                  assetpack list                           \x1b[90m# List bundle records\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Path to assetpack.yaml (defaults to ./assetpack.yaml)
    #[arg(long, short = 'c', global = true, env = "ASSETPACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Package, compress and publish changed bundles
    Build(BuildArgs),

    /// Regenerate the manifest from published artifacts
    Manifest(ManifestArgs),

    /// Show which bundles would be rebuilt
    Status(StatusArgs),

    /// List bundle records
    List(ListArgs),

    /// Compress every file of a directory into the version root
    Compress(CompressArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
