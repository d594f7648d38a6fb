//! Job input arguments shared by `job create` and `generate`

use anyhow::{Context, Result, bail};
use casegen_core::dto::issue::IssueFields;
use casegen_core::dto::job::{CreateJob, JobOptions};
use clap::Args;
use std::path::PathBuf;

/// Feature text to generate test cases for
#[derive(Args, Debug, Clone)]
pub struct JobInput {
    /// Feature description (user story)
    #[arg(short, long, visible_alias = "user-story", required_unless_present = "issue")]
    pub description: Option<String>,

    /// Acceptance criteria, one per line
    #[arg(short, long, required_unless_present = "issue")]
    pub acceptance_criteria: Option<String>,

    /// Short summary (derived from the description when omitted)
    #[arg(short, long)]
    pub summary: Option<String>,

    /// JSON file with flattened issue fields (summary, description, acceptance_criteria)
    #[arg(long, conflicts_with_all = ["description", "acceptance_criteria"])]
    pub issue: Option<PathBuf>,

    /// Project whose knowledge base the backend should consult
    #[arg(short, long)]
    pub project: Option<String>,

    /// Backend model override
    #[arg(long)]
    pub model: Option<String>,

    /// Do not consult the knowledge base
    #[arg(long)]
    pub no_knowledge: bool,
}

impl JobInput {
    /// Build the creation request, reading the issue file if one was given
    pub fn into_request(self) -> Result<CreateJob> {
        let options = JobOptions {
            use_knowledge: !self.no_knowledge,
            project_name: self.project,
            model: self.model,
        };

        let mut request = match &self.issue {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read issue file: {}", path.display()))?;
                let fields: IssueFields = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid issue file: {}", path.display()))?;
                fields.into_create_job(options)
            }
            None => CreateJob {
                description: self.description.unwrap_or_default(),
                acceptance_criteria: self.acceptance_criteria.unwrap_or_default(),
                summary: None,
                options,
            },
        };

        if let Some(summary) = self.summary {
            request.summary = Some(summary);
        }

        if request.description.trim().is_empty() {
            bail!("Description must not be empty");
        }

        Ok(request)
    }
}
