//! Job command handlers
//!
//! Handles all job-related CLI commands including creation, status
//! polling and export.

use anyhow::{Result, bail};
use casegen_client::OrchestratorClient;
use casegen_core::domain::job::JobStatus;
use casegen_core::dto::export::ExportFormat;
use casegen_core::dto::job::JobView;
use clap::Subcommand;
use colored::*;
use std::path::PathBuf;
use std::time::Duration;

use super::emit_output;
use super::input::JobInput;
use crate::config::Config;
use crate::id_resolver::resolve_job_id;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Submit a new generation job
    Create {
        #[command(flatten)]
        input: JobInput,
    },
    /// List all jobs
    List,
    /// Get job status
    Status {
        /// Job ID or unambiguous prefix
        id: String,

        /// Print the raw JSON view
        #[arg(long)]
        json: bool,
    },
    /// Wait for a job to finish and print its test cases
    Wait {
        /// Job ID or unambiguous prefix
        id: String,

        /// Seconds between polls
        #[arg(long, default_value_t = 2)]
        interval: u64,

        /// Give up after this many seconds
        #[arg(long, default_value_t = 120)]
        max_wait: u64,

        /// Output format (text, markdown, html, jira-markup)
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,
    },
    /// Export a finished job's test cases
    Export {
        /// Job ID or unambiguous prefix
        id: String,

        /// Output format (text, markdown, html, jira-markup)
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,

        /// Save to this file instead of printing
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        JobCommands::Create { input } => create_job(&client, input).await,
        JobCommands::List => list_jobs(&client).await,
        JobCommands::Status { id, json } => get_status(&client, &id, json).await,
        JobCommands::Wait {
            id,
            interval,
            max_wait,
            format,
        } => {
            let id = resolve_job_id(&client, &id).await?;
            let view = wait_for(&client, &id, interval, max_wait).await?;
            print_job_details(&view);
            println!();
            let body = finished_output(&client, &view, format).await?;
            emit_output(&body, None)
        }
        JobCommands::Export {
            id,
            format,
            output_file,
        } => {
            let id = resolve_job_id(&client, &id).await?;
            let body = client.export_job(&id, format).await?;
            emit_output(&body, output_file.as_deref())
        }
    }
}

/// Submit a job and print its ID
async fn create_job(client: &OrchestratorClient, input: JobInput) -> Result<()> {
    let request = input.into_request()?;
    let summary = request.summary_or_derived();

    let created = client.create_job(&request).await?;

    println!("{}", "✓ Job created successfully!".green().bold());
    println!("  Job ID:  {}", created.job_id.cyan());
    println!("  Summary: {}", summary.dimmed());
    println!(
        "  Follow with: {}",
        format!("casegen job wait {}", created.job_id).dimmed()
    );

    Ok(())
}

/// List all jobs
async fn list_jobs(client: &OrchestratorClient) -> Result<()> {
    let jobs = client.list_jobs().await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            print_job_summary(&job);
        }
    }

    Ok(())
}

/// Get and display a single job
async fn get_status(client: &OrchestratorClient, id: &str, json: bool) -> Result<()> {
    let id = resolve_job_id(client, id).await?;
    let view = client.get_job(&id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_job_details(&view);
    }

    Ok(())
}

/// Poll until the job is terminal, reporting progress
pub(super) async fn wait_for(
    client: &OrchestratorClient,
    id: &str,
    interval: u64,
    max_wait: u64,
) -> Result<JobView> {
    println!("{}", format!("Waiting for job {}...", id).dimmed());

    let view = client
        .wait_for_job(
            id,
            Duration::from_secs(interval.max(1)),
            Duration::from_secs(max_wait),
        )
        .await?;

    Ok(view)
}

/// Rendered test cases of a finished job, or an error for a failed one
pub(super) async fn finished_output(
    client: &OrchestratorClient,
    view: &JobView,
    format: ExportFormat,
) -> Result<String> {
    if view.status == JobStatus::Failed {
        bail!(
            "Job {} failed: {}",
            view.job_id,
            view.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(client.export_job(&view.job_id, format).await?)
}

/// Print a one-entry job summary
fn print_job_summary(job: &JobView) {
    println!("  {} Job {}", "▸".cyan(), job.job_id.dimmed());
    println!("    Status:   {}", colorize_status(&job.status));
    println!(
        "    Started:  {}",
        job.start_time
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    if let Some(result) = &job.result {
        println!("    Cases:    {}", result.test_cases.len());
    }
    println!();
}

/// Print detailed job information
pub(super) fn print_job_details(job: &JobView) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.job_id.cyan());
    println!("  Status:      {}", colorize_status(&job.status));
    println!(
        "  Started:     {}",
        job.start_time.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(completed) = job.completion_time {
        println!("  Completed:   {}", completed.format("%Y-%m-%d %H:%M:%S"));

        let duration = completed.signed_duration_since(job.start_time);
        println!("  Duration:    {}s", duration.num_seconds());
    }

    if job.timed_out == Some(true) {
        println!(
            "  {}",
            "⚠ Generation timed out, fallback test cases were used".yellow()
        );
    }

    if let Some(result) = &job.result {
        println!("\n{}", "Test Cases:".bold());
        if result.test_cases.is_empty() {
            println!("  {}", "No structured test cases, raw text only".dimmed());
        }
        for (i, case) in result.test_cases.iter().enumerate() {
            println!(
                "  {}. {} {}",
                i + 1,
                case.title,
                format!(
                    "({} steps, {} expected)",
                    case.steps.len(),
                    case.expected_results.len()
                )
                .dimmed()
            );
        }
    }

    if let Some(error) = &job.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Processing => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}
