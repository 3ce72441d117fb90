use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    assetpack completions --shell bash > ~/.bash_completion.d/assetpack\n\n\
                  Generate zsh completions:\n    assetpack completions --shell zsh > ~/.zfunc/_assetpack\n\n\
                  Generate fish completions:\n    assetpack completions --shell fish > ~/.config/fish/completions/assetpack.fish\n\n\
                  Generate PowerShell completions:\n    assetpack completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(long, value_enum)]
    pub shell: Shell,
}
