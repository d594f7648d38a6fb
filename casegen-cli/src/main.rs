//! Casegen CLI
//!
//! Command-line interface for the Casegen orchestrator: submit generation
//! jobs, follow them and export their test cases.

mod commands;
mod config;
mod id_resolver;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "casegen")]
#[command(about = "Casegen test case generator CLI", long_about = None)]
struct Cli {
    /// Orchestrator URL
    #[arg(
        long,
        env = "CASEGEN_ORCHESTRATOR_URL",
        default_value = "http://localhost:8080"
    )]
    orchestrator_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        orchestrator_url: cli.orchestrator_url,
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::JobCommands;
    use casegen_core::dto::export::ExportFormat;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_job_wait() {
        let cli = Cli::try_parse_from([
            "casegen",
            "--orchestrator-url",
            "http://orchestrator:9000",
            "job",
            "wait",
            "1700000000000-a1b2c3d4",
            "--format",
            "jira",
        ])
        .unwrap();

        assert_eq!(cli.orchestrator_url, "http://orchestrator:9000");
        match cli.command {
            Commands::Job {
                command: JobCommands::Wait { id, format, interval, .. },
            } => {
                assert_eq!(id, "1700000000000-a1b2c3d4");
                assert_eq!(format, ExportFormat::JiraMarkup);
                assert_eq!(interval, 2);
            }
            _ => panic!("expected job wait"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Cli::try_parse_from(["casegen", "job", "export", "abc", "--format", "pdf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_requires_input() {
        let result = Cli::try_parse_from(["casegen", "generate"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "casegen",
            "generate",
            "--user-story",
            "As a user I log in",
            "--acceptance-criteria",
            "- valid login works",
            "--output-file",
            "cases.md",
        ]);
        assert!(result.is_ok());
    }
}
