//! `scm completions <shell>`: prints a tab-completion script for `scm`.
//!
//! The script covers every subcommand, alias and flag, including the
//! provider flags shared by `pull-request`, `release` and `repository`.
//! Redirect it to wherever your shell loads completions from:
//!
//! ```bash
//! scm completions bash > ~/.local/share/bash-completion/completions/scm
//! scm completions zsh > ~/.zfunc/_scm
//! scm completions fish > ~/.config/fish/completions/scm.fish
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::cli::Cli;

/// Name the completions are registered under.
const BIN_NAME: &str = "scm";

/// Arguments for `scm completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to write the script for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_script(args.shell, &mut io::stdout())
}

fn write_script(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_script_names_subcommands_and_aliases() {
        let mut out = Vec::new();
        write_script(Shell::Bash, &mut out).unwrap();
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("_scm()"));
        assert!(script.contains("pull-request"));
        assert!(script.contains("--created-days-ago"));
    }

    #[test]
    fn test_powershell_script_registers_binary() {
        let mut out = Vec::new();
        write_script(Shell::PowerShell, &mut out).unwrap();
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("'scm'"));
    }
}
