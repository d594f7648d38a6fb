//! Casegen HTTP Clients
//!
//! Two clients live here:
//! - [`OrchestratorClient`]: type-safe access to the orchestrator API, used
//!   by the CLI
//! - [`GenerationClient`]: calls the test case generation backend with a
//!   bounded timeout, used by the orchestrator
//!
//! # Example
//!
//! ```no_run
//! use casegen_client::OrchestratorClient;
//! use casegen_core::dto::job::CreateJob;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), casegen_client::ClientError> {
//!     let client = OrchestratorClient::new("http://localhost:8080");
//!
//!     let created = client
//!         .create_job(&CreateJob::new("User login", "- valid login works"))
//!         .await?;
//!
//!     println!("Created job: {}", created.job_id);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod generation;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, GenerationError, Result};
pub use generation::GenerationClient;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the casegen orchestrator API
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    /// Base URL of the orchestrator (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl OrchestratorClient {
    /// Create a new orchestrator client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the orchestrator API (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use casegen_client::OrchestratorClient;
    ///
    /// let client = OrchestratorClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new orchestrator client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is plain text (exports)
    async fn handle_text_response(&self, response: reqwest::Response) -> Result<String> {
        let response = Self::check_status(response).await?;

        response
            .text()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to read response body: {}", e)))
    }

    /// Handle an API response whose body is irrelevant
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::from_body(status.as_u16(), &error_text));
        }

        Ok(response)
    }
}
