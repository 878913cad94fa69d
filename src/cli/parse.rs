//! CLI parse: clap types for the console. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Snom redirection server console
#[derive(Parser, Debug)]
#[command(name = "redirect-console", version)]
#[command(about = "Manage phone redirections on the provisioning redirection service")]
pub struct Cli {
    /// Configuration file path (layered over the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Settings file path (defaults to ~/.redirect-console)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Redirection service endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Run a single console command and exit (e.g. `check 000413XXXXXX`)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// True when a one-shot command was given.
    pub fn is_one_shot(&self) -> bool {
        !self.command.is_empty()
    }
}
