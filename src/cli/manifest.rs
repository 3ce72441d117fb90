use clap::Parser;

use crate::platform::Platform;

/// Arguments for the manifest command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Regenerate the Android manifest:\n    assetpack manifest\n\n\
                  Regenerate the iOS manifest:\n    assetpack manifest --platform ios")]
pub struct ManifestArgs {
    /// Target platform
    #[arg(long, short = 'p', value_enum, default_value_t = Platform::Android)]
    pub platform: Platform,
}
