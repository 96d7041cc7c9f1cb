//! Shell completion generation
//!
//! Generates shell completion scripts for bash, zsh, fish, elvish and PowerShell.
//! Subcommands, page aliases (`inv`, `del`, `proj`) and `--format` values are
//! all completed.
//!
//! # Usage
//!
//! ```bash
//! # Bash - add to ~/.bashrc
//! source <(mbi completions bash)
//!
//! # Zsh - add to ~/.zshrc
//! source <(mbi completions zsh)
//!
//! # Fish - add to ~/.config/fish/completions/mbi.fish
//! mbi completions fish > ~/.config/fish/completions/mbi.fish
//!
//! # PowerShell - add to $PROFILE
//! mbi completions powershell >> $PROFILE
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io::{self, Write};

use crate::cli::Cli;

const BIN_NAME: &str = "mbi";

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

/// Write the completion script for `shell` to `out`
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_bash_script_lists_pages() {
        let out = script(Shell::Bash);
        assert!(out.contains("_mbi()"));
        for sub in ["inventory", "delivery", "projects", "status", "sheets", "dashboard"] {
            assert!(out.contains(sub), "missing {}", sub);
        }
    }

    #[test]
    fn test_fish_script_completes_formats() {
        let out = script(Shell::Fish);
        assert!(out.contains("complete -c mbi"));
        assert!(out.contains("json"));
        assert!(out.contains("md"));
    }
}
