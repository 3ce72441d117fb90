use clap::Parser;

use crate::platform::Platform;

/// Arguments for the build command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Build changed bundles for Android:\n    assetpack build\n\n\
                  Rebuild every bundle for iOS:\n    assetpack build --platform ios --force\n\n\
                  Build two groups only:\n    assetpack build --group UI --group Audio\n\n\
                  Package and compress without touching the manifest:\n    assetpack build --no-manifest")]
pub struct BuildArgs {
    /// Target platform
    #[arg(long, short = 'p', value_enum, default_value_t = Platform::Android)]
    pub platform: Platform,

    /// Repackage every non-empty bundle, changed or not
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Only build this group (repeatable)
    #[arg(long = "group", short = 'g', value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Skip manifest generation
    #[arg(long)]
    pub no_manifest: bool,
}
