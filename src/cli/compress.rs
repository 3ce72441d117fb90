use clap::Parser;
use std::path::PathBuf;

use crate::platform::Platform;

/// Arguments for the compress command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Compress a platform output directory:\n    assetpack compress AssetBundle/Android\n\n\
                  Compress for iOS:\n    assetpack compress AssetBundle/iOS --platform ios")]
pub struct CompressArgs {
    /// Directory whose files are compressed
    pub dir: PathBuf,

    /// Target platform (selects the version root)
    #[arg(long, short = 'p', value_enum, default_value_t = Platform::Android)]
    pub platform: Platform,
}
