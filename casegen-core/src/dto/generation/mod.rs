//! Generation backend wire types

use serde::{Deserialize, Serialize};

use crate::domain::test_case::TestCase;
use crate::dto::job::CreateJob;

/// Request body sent to the generation backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub description: String,
    pub acceptance_criteria: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub use_knowledge: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl From<&CreateJob> for GenerationRequest {
    fn from(job: &CreateJob) -> Self {
        Self {
            description: job.description.clone(),
            acceptance_criteria: job.acceptance_criteria.clone(),
            summary: job.summary_or_derived(),
            project_name: job.options.project_name.clone(),
            use_knowledge: job.options.use_knowledge,
            model: job.options.model.clone(),
        }
    }
}

/// Response body returned by the generation backend
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, alias = "testCases")]
    pub test_cases: Option<GeneratedContent>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Normalized generation output
///
/// Most backends answer with free-form text; some already return structured
/// test cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedContent {
    Text(String),
    Cases(Vec<TestCase>),
}
