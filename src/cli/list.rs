use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List all bundle records:\n    assetpack list\n\n\
                  Machine-readable output:\n    assetpack list --json")]
pub struct ListArgs {
    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}
