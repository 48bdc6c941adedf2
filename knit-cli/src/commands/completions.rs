//! Shell completions command - Generate shell completion scripts

use std::io;

use clap::Command;
use clap_complete::{generate, shells};
use colored::Colorize;
use serde::Serialize;

use crate::output::{Output, OutputConfig, TableDisplay};

const BIN_NAME: &str = "knit";

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shell::Bash => write!(f, "bash"),
            Shell::Zsh => write!(f, "zsh"),
            Shell::Fish => write!(f, "fish"),
            Shell::PowerShell => write!(f, "powershell"),
            Shell::Elvish => write!(f, "elvish"),
        }
    }
}

/// Instructions for installing completions
#[derive(Debug, Serialize)]
pub struct CompletionInstructions {
    pub shell: String,
    pub instructions: Vec<String>,
}

impl TableDisplay for CompletionInstructions {
    fn to_table(&self, _config: &OutputConfig) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} completions for {}\n\n",
            BIN_NAME.cyan().bold(),
            self.shell.yellow()
        ));
        output.push_str(&format!("{}\n", "Installation:".cyan().bold()));
        for instruction in &self.instructions {
            output.push_str(&format!("  {}\n", instruction));
        }
        output
    }
}

fn get_instructions(shell: Shell) -> Vec<String> {
    let lines: &[&str] = match shell {
        Shell::Bash => &[
            "# Add to ~/.bashrc:",
            "eval \"$(knit completions bash)\"",
            "",
            "# Or save to a file:",
            "knit completions bash > ~/.local/share/bash-completion/completions/knit",
        ],
        Shell::Zsh => &[
            "# Add to ~/.zshrc:",
            "eval \"$(knit completions zsh)\"",
            "",
            "# Or save to a file in fpath:",
            "knit completions zsh > ~/.zfunc/_knit",
        ],
        Shell::Fish => &[
            "# Save to fish completions directory:",
            "knit completions fish > ~/.config/fish/completions/knit.fish",
        ],
        Shell::PowerShell => &[
            "# Add to $PROFILE:",
            "Invoke-Expression (& knit completions powershell | Out-String)",
        ],
        Shell::Elvish => &[
            "# Add to ~/.elvish/rc.elv:",
            "eval (knit completions elvish | slurp)",
        ],
    };
    lines.iter().map(|l| l.to_string()).collect()
}

/// Generate completions and write to stdout using provided Command
pub fn generate_completions_with_cmd(shell: Shell, cmd: &mut Command) {
    match shell {
        Shell::Bash => generate(shells::Bash, cmd, BIN_NAME, &mut io::stdout()),
        Shell::Zsh => generate(shells::Zsh, cmd, BIN_NAME, &mut io::stdout()),
        Shell::Fish => generate(shells::Fish, cmd, BIN_NAME, &mut io::stdout()),
        Shell::PowerShell => generate(shells::PowerShell, cmd, BIN_NAME, &mut io::stdout()),
        Shell::Elvish => generate(shells::Elvish, cmd, BIN_NAME, &mut io::stdout()),
    }
}

/// Print installation instructions for a shell
pub fn run_instructions(shell: Shell, output_config: &OutputConfig) -> anyhow::Result<()> {
    let instructions = CompletionInstructions {
        shell: shell.to_string(),
        instructions: get_instructions(shell),
    };
    Output::with_config(instructions, output_config).render()
}
