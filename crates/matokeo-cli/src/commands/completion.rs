use anyhow::Result;
use clap::Command;
use clap_complete::Shell;
use std::io::{self, Write};

/// Render the completion script for `shell` into `out`
///
/// The script is registered under the command's own name, so it follows any
/// rename of the binary.
pub fn render(shell: Shell, cmd: &mut Command, out: &mut impl Write) -> Result<()> {
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, bin_name, out);
    out.flush()?;
    Ok(())
}

pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    render(shell, cmd, &mut io::stdout().lock())
}
