//! Issue tracker DTOs
//!
//! The issue source flattens rich documents (paragraphs, headings, nested
//! lists) into newline-joined text with `- ` prefixes for list items before
//! handing them over.

use serde::{Deserialize, Serialize};

use crate::dto::job::{CreateJob, JobOptions};

/// Flattened fields of a tracker issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "acceptanceCriteria")]
    pub acceptance_criteria: String,
}

impl IssueFields {
    pub fn into_create_job(self, options: JobOptions) -> CreateJob {
        let summary = Some(self.summary.trim().to_string()).filter(|s| !s.is_empty());
        CreateJob {
            description: self.description,
            acceptance_criteria: self.acceptance_criteria,
            summary,
            options,
        }
    }
}

impl From<IssueFields> for CreateJob {
    fn from(fields: IssueFields) -> Self {
        fields.into_create_job(JobOptions::default())
    }
}
