use clap::Parser;

use crate::platform::Platform;

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show dirty bundles:\n    assetpack status\n\n\
                  Show what a forced build would repackage:\n    assetpack status --force")]
pub struct StatusArgs {
    /// Target platform
    #[arg(long, short = 'p', value_enum, default_value_t = Platform::Android)]
    pub platform: Platform,

    /// Evaluate as if the build were forced
    #[arg(long, short = 'f')]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn test_cli_parsing_status() {
        let cli = Cli::try_parse_from(["assetpack", "status", "-p", "osx", "-f"]).unwrap();
        match cli.command {
            Commands::Status(args) => {
                assert_eq!(args.platform, Platform::Osx);
                assert!(args.force);
            }
            _ => panic!("Expected Status command"),
        }
    }
}
