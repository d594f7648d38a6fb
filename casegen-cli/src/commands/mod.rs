//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod format;
mod generate;
mod input;
mod job;

pub use format::FormatArgs;
pub use generate::GenerateArgs;
pub use job::JobCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use std::path::Path;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Generate test cases and wait for the result
    Generate(GenerateArgs),
    /// Parse a text file of test cases and render it in another format
    Format(FormatArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Generate(args) => generate::handle_generate_command(args, config).await,
        Commands::Format(args) => format::handle_format_command(args),
    }
}

/// Print rendered output, or save it when `output_file` is given
fn emit_output(body: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            std::fs::write(path, body)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            println!(
                "{}",
                format!("✓ Test cases saved to {}", path.display())
                    .green()
                    .bold()
            );
        }
        None => {
            println!("{}", "─".repeat(80).dimmed());
            println!("{}", body);
            println!("{}", "─".repeat(80).dimmed());
        }
    }
    Ok(())
}
