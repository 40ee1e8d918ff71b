//! `localsafe completions`: print a shell completion script.
//!
//!   localsafe completions bash > ~/.local/share/bash-completion/completions/localsafe

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::errors::Result;

const BIN_NAME: &str = "localsafe";

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let stdout = io::stdout();
    write_script(shell, &mut stdout.lock())
}

fn write_script(shell: Shell, out: &mut dyn Write) -> Result<()> {
    clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, out);
    out.flush()?;
    Ok(())
}
