//! Generation Service
//!
//! Seam between the job service and whatever produces test case text.

use async_trait::async_trait;
use casegen_client::{GenerationClient, GenerationError};
use casegen_core::dto::generation::GeneratedContent;
use casegen_core::dto::job::CreateJob;

/// Produces generated test case content for a job payload
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, payload: &CreateJob) -> Result<GeneratedContent, GenerationError>;
}

#[async_trait]
impl GenerationService for GenerationClient {
    async fn generate(&self, payload: &CreateJob) -> Result<GeneratedContent, GenerationError> {
        GenerationClient::generate(self, payload).await
    }
}
