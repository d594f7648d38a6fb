//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod export;
pub mod health;
pub mod job;

use axum::{
    Router,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use casegen_core::dto::export::ExportFormat;
use tower_http::trace::TraceLayer;

use crate::service::JobService;

/// Create the main API router with all endpoints
pub fn create_router(service: JobService) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Job endpoints
        .route("/job/create", post(job::create_job))
        .route("/job/list", get(job::list_jobs))
        .route("/job/{id}", get(job::get_job))
        .route("/job/{id}/export", get(job::export_job))
        // Stateless formatting
        .route("/export", post(export::export))
        // Add state and middleware
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

/// Wraps rendered output with a content type matching `format`
pub(crate) fn formatted_response(format: ExportFormat, body: String) -> Response {
    let content_type = match format {
        ExportFormat::Html => "text/html; charset=utf-8",
        ExportFormat::Markdown => "text/markdown; charset=utf-8",
        ExportFormat::Text | ExportFormat::JiraMarkup => "text/plain; charset=utf-8",
    };
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{GenerationService, JobSettings};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use casegen_client::GenerationError;
    use casegen_core::dto::generation::GeneratedContent;
    use casegen_core::dto::job::{CreateJob, JobView};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FailingGenerator;

    #[async_trait]
    impl GenerationService for FailingGenerator {
        async fn generate(&self, _payload: &CreateJob) -> Result<GeneratedContent, GenerationError> {
            Err(GenerationError::ParseError("no backend in tests".to_string()))
        }
    }

    fn app() -> Router {
        let service = JobService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FailingGenerator),
            JobSettings::default(),
        );
        create_router(service)
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_create_poll_and_export() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/job/create",
                r#"{"description":"User login","acceptanceCriteria":"- valid login works"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let job_id = created["job_id"].as_str().unwrap().to_string();

        let mut view: Option<JobView> = None;
        for _ in 0..100 {
            let response = app
                .clone()
                .oneshot(get(&format!("/job/{}", job_id)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let polled: JobView = serde_json::from_str(&body_string(response).await).unwrap();
            if polled.status.is_terminal() {
                view = Some(polled);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let view = view.expect("job finished");
        assert_eq!(view.timed_out, Some(true));

        let response = app
            .clone()
            .oneshot(get(&format!("/job/{}/export?format=html", job_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert!(body_string(response).await.contains("<div class=\"test-case\">"));

        let response = app.oneshot(get("/job/list")).await.unwrap();
        let jobs: Vec<JobView> = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_error_responses() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json("/job/create", r#"{"description":"","acceptance_criteria":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("description is required"));

        let response = app.clone().oneshot(post_json("/job/create", "not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.clone().oneshot(get("/job/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "Job nope not found");

        let response = app
            .oneshot(get("/job/nope/export?format=unknown"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_endpoint() {
        let response = app()
            .oneshot(post_json(
                "/export",
                r#"{"test_cases":[{"title":"A <b>","steps":["s"],"expected_result":"r"}],"format":"html"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("A &lt;b&gt;"));
        assert!(body.contains("<li>r</li>"));

        let response = app()
            .oneshot(post_json("/export", r#"{"testCases":"raw text","format":"jira"}"#))
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "raw text");
    }
}
