//! Job-related API endpoints

use std::time::Duration;

use tracing::debug;

use crate::OrchestratorClient;
use crate::error::{ClientError, Result};
use casegen_core::dto::export::{ExportFormat, ExportRequest};
use casegen_core::dto::job::{CreateJob, CreateJobResponse, JobView};

impl OrchestratorClient {
    /// Check that the orchestrator is up
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Submit a new generation job
    ///
    /// Returns as soon as the job is stored; generation runs in the background.
    ///
    /// # Example
    /// ```no_run
    /// # use casegen_client::OrchestratorClient;
    /// # use casegen_core::dto::job::CreateJob;
    /// # async fn example() -> casegen_client::Result<()> {
    /// let client = OrchestratorClient::new("http://localhost:8080");
    /// let created = client
    ///     .create_job(&CreateJob::new("Checkout", "- card payment works"))
    ///     .await?;
    /// let view = client.get_job(&created.job_id).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_job(&self, req: &CreateJob) -> Result<CreateJobResponse> {
        let url = format!("{}/job/create", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get the current view of a job
    pub async fn get_job(&self, job_id: &str) -> Result<JobView> {
        let url = format!("{}/job/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List all stored jobs, newest first
    pub async fn list_jobs(&self) -> Result<Vec<JobView>> {
        let url = format!("{}/job/list", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Poll a job until it reaches a terminal state
    ///
    /// # Arguments
    /// * `job_id` - The job to wait for
    /// * `interval` - Delay between polls
    /// * `max_wait` - Give up after this long
    pub async fn wait_for_job(
        &self,
        job_id: &str,
        interval: Duration,
        max_wait: Duration,
    ) -> Result<JobView> {
        let started = tokio::time::Instant::now();
        loop {
            let view = self.get_job(job_id).await?;
            if view.status.is_terminal() {
                return Ok(view);
            }
            if started.elapsed() >= max_wait {
                return Err(ClientError::WaitTimeout(max_wait, job_id.to_string()));
            }
            debug!("Job {} is {}, polling again", job_id, view.status);
            tokio::time::sleep(interval).await;
        }
    }

    // =============================================================================
    // Export
    // =============================================================================

    /// Render a finished job's test cases
    pub async fn export_job(&self, job_id: &str, format: ExportFormat) -> Result<String> {
        let url = format!("{}/job/{}/export", self.base_url, job_id);
        let response = self
            .client
            .get(&url)
            .query(&[("format", format.as_str())])
            .send()
            .await?;

        self.handle_text_response(response).await
    }

    /// Render arbitrary test cases or raw text
    pub async fn export(&self, req: &ExportRequest) -> Result<String> {
        let url = format!("{}/export", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_text_response(response).await
    }
}
