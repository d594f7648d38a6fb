//! Job DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::job::{GenerationResult, Job, JobStatus};

/// Maximum length of a summary derived from the description
pub const SUMMARY_MAX_CHARS: usize = 50;

/// Request to create a new generation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJob {
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "acceptanceCriteria")]
    pub acceptance_criteria: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub options: JobOptions,
}

impl CreateJob {
    pub fn new(description: impl Into<String>, acceptance_criteria: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            acceptance_criteria: acceptance_criteria.into(),
            summary: None,
            options: JobOptions::default(),
        }
    }

    /// Returns the explicit summary, or one derived from the first line of
    /// the description (truncated to [`SUMMARY_MAX_CHARS`] with `...`).
    pub fn summary_or_derived(&self) -> String {
        let explicit = self.summary.as_deref().map(str::trim).unwrap_or("");
        if !explicit.is_empty() {
            return explicit.to_string();
        }

        let first_line = self.description.lines().next().unwrap_or("").trim();
        if first_line.chars().count() > SUMMARY_MAX_CHARS {
            let truncated: String = first_line.chars().take(SUMMARY_MAX_CHARS).collect();
            format!("{}...", truncated)
        } else {
            first_line.to_string()
        }
    }
}

/// Optional flags forwarded to the generation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOptions {
    #[serde(default = "default_use_knowledge", alias = "useKnowledge")]
    pub use_knowledge: bool,
    #[serde(default, alias = "projectName", skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

fn default_use_knowledge() -> bool {
    true
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            use_knowledge: true,
            project_name: None,
            model: None,
        }
    }
}

/// Response to a job creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: String,
}

/// Poll view of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobView {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Only reported once the job is terminal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timed_out: Option<bool>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
}

impl From<&Job> for JobView {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            status: job.status,
            result: job.result.clone(),
            error: job.error.clone(),
            timed_out: job.status.is_terminal().then_some(job.timed_out),
            start_time: job.start_time,
            completion_time: job.completion_time,
        }
    }
}
