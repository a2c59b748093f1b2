//! Shell completion scripts

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::args::Cli;
use crate::APP_NAME;

/// Write the completion script for `shell` into `out`.
pub fn write(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, APP_NAME, out);
}

/// Print the completion script for `shell` to stdout.
pub fn print(shell: Shell) {
    write(shell, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_lists_subcommands() {
        let mut out = Vec::new();
        write(Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();

        for subcommand in ["analyze", "leads", "payments", "dashboard", "export", "doctor"] {
            assert!(script.contains(subcommand), "missing {subcommand}");
        }
    }

    #[test]
    fn zsh_script_names_the_binary() {
        let mut out = Vec::new();
        write(Shell::Zsh, &mut out);
        assert!(String::from_utf8(out).unwrap().contains("#compdef bluesdr"));
    }
}
