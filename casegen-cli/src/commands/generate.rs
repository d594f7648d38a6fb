//! Generate command
//!
//! One-shot flow: submit a job, wait for it and print or save the result.
//! With `--offline` the deterministic fallback generator runs locally and no
//! orchestrator is contacted.

use anyhow::Result;
use casegen_core::dto::export::ExportFormat;
use casegen_core::dto::job::CreateJob;
use clap::Args;
use colored::*;
use std::path::PathBuf;

use super::emit_output;
use super::input::JobInput;
use super::job::{finished_output, print_job_details, wait_for};
use crate::config::Config;

/// Arguments for `casegen generate`
#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: JobInput,

    /// Output format (text, markdown, html, jira-markup)
    #[arg(short, long, default_value = "markdown")]
    pub format: ExportFormat,

    /// Save to this file instead of printing
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Seconds between polls
    #[arg(long, default_value_t = 2)]
    pub interval: u64,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 120)]
    pub max_wait: u64,

    /// Build fallback test cases locally without contacting the orchestrator
    #[arg(long)]
    pub offline: bool,
}

/// Handle `casegen generate`
pub async fn handle_generate_command(args: GenerateArgs, config: &Config) -> Result<()> {
    let request = args.input.into_request()?;

    let body = if args.offline {
        println!("{}", "Generating fallback test cases offline...".dimmed());
        offline_output(&request, args.format)
    } else {
        let client = config.client();
        let created = client.create_job(&request).await?;
        println!(
            "{} {}",
            "✓ Job created:".green().bold(),
            created.job_id.cyan()
        );

        let view = wait_for(&client, &created.job_id, args.interval, args.max_wait).await?;
        print_job_details(&view);
        println!();
        finished_output(&client, &view, args.format).await?
    };

    emit_output(&body, args.output_file.as_deref())
}

/// Fallback test cases for `request`, rendered in `format`
fn offline_output(request: &CreateJob, format: ExportFormat) -> String {
    let text = casegen_text::generate_fallback(request);
    let cases = casegen_text::parse(&text);
    casegen_text::format_cases(&cases, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_output_renders_every_case() {
        let request = CreateJob::new(
            "User login with email and password",
            "- User can log in with valid credentials\n- Invalid password shows an error",
        );

        let markdown = offline_output(&request, ExportFormat::Markdown);
        assert!(markdown.contains("## Test Case 1:"));
        assert!(markdown.contains("## Test Case 3:"));

        let html = offline_output(&request, ExportFormat::Html);
        assert_eq!(html.matches("<div class=\"test-case\">").count(), 3);
    }
}
