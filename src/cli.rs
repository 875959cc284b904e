//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// MTA Resolve - Resolve and rewrite MTA deployment descriptors
#[derive(Parser, Debug)]
#[command(name = "mta-resolve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a deployment descriptor against a deploy target
    Resolve(commands::resolve::ResolveArgs),

    /// Validate a deployment descriptor without resolving it
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();

        match self.color.to_lowercase().as_str() {
            "always" => console::set_colors_enabled(true),
            "never" => console::set_colors_enabled(false),
            _ => {}
        }

        match self.command {
            Commands::Resolve(args) => commands::resolve::execute(args),
            Commands::Validate(args) => commands::validate::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
