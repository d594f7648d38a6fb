//! Job API Handlers
//!
//! HTTP endpoints for job creation, polling and export.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Response,
};
use casegen_core::dto::export::ExportQuery;
use casegen_core::dto::job::{CreateJob, CreateJobResponse, JobView};

use crate::api::error::{ApiError, ApiResult};
use crate::api::formatted_response;
use crate::service::JobService;

/// POST /job/create
/// Store a new job and start generating in the background
pub async fn create_job(
    State(service): State<JobService>,
    payload: Result<Json<CreateJob>, JsonRejection>,
) -> ApiResult<Json<CreateJobResponse>> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let job_id = service.create_job(req).await?;
    tracing::info!("Accepted job {}", job_id);

    Ok(Json(CreateJobResponse { job_id }))
}

/// GET /job/{id}
/// Poll a job; overdue jobs are completed with fallback output
pub async fn get_job(
    State(service): State<JobService>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobView>> {
    tracing::debug!("Getting job: {}", id);

    let view = service.get_status(&id).await?;
    Ok(Json(view))
}

/// GET /job/list
/// List all jobs, newest first
pub async fn list_jobs(State(service): State<JobService>) -> ApiResult<Json<Vec<JobView>>> {
    tracing::debug!("Listing all jobs");

    let jobs = service.list_jobs().await?;
    Ok(Json(jobs))
}

/// GET /job/{id}/export?format=<mode>
/// Render a finished job
pub async fn export_job(
    State(service): State<JobService>,
    Path(id): Path<String>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    tracing::debug!("Exporting job {} as {}", id, query.format);

    let body = service.export_job(&id, query.format).await?;
    Ok(formatted_response(query.format, body))
}
