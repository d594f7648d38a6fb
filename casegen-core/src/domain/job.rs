//! Job domain types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::test_case::TestCase;
use crate::dto::job::CreateJob;

/// Generation job record
///
/// Owned by the job store; the orchestrator is the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub payload: CreateJob,
    pub start_time: DateTime<Utc>,
    pub timeout_at: DateTime<Utc>,
    pub completion_time: Option<DateTime<Utc>>,
    /// Set when the result came from the fallback generator
    #[serde(default)]
    pub timed_out: bool,
    /// Present only once the job is `Completed`
    pub result: Option<GenerationResult>,
    /// Present only once the job is `Failed`
    pub error: Option<String>,
}

impl Job {
    /// Creates a pending job whose deadline is `start_time + budget`
    pub fn new(id: String, payload: CreateJob, start_time: DateTime<Utc>, budget: Duration) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            payload,
            start_time,
            timeout_at: start_time + budget,
            completion_time: None,
            timed_out: false,
            result: None,
            error: None,
        }
    }

    /// Whether a non-terminal job has outlived its deadline
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && now > self.timeout_at
    }

    /// Returns a copy of this job in `Processing` state
    pub fn processing(&self) -> Self {
        Self {
            status: JobStatus::Processing,
            ..self.clone()
        }
    }

    /// Returns a copy of this job completed with `result`
    pub fn completed(&self, result: GenerationResult, timed_out: bool, at: DateTime<Utc>) -> Self {
        Self {
            status: JobStatus::Completed,
            completion_time: Some(at),
            timed_out,
            result: Some(result),
            error: None,
            ..self.clone()
        }
    }

    /// Returns a copy of this job failed with `message`
    pub fn failed(&self, message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            status: JobStatus::Failed,
            completion_time: Some(at),
            timed_out: false,
            result: None,
            error: Some(message.into()),
            ..self.clone()
        }
    }
}

/// Job lifecycle status
///
/// `Pending -> Processing -> Completed | Failed`. Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Output of a completed job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Parsed test cases (may be empty when nothing parseable came back)
    pub test_cases: Vec<TestCase>,
    /// Text the test cases were parsed from
    pub raw_text: String,
}
