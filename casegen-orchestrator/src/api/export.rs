//! Export API Handler

use axum::{Json, extract::rejection::JsonRejection, response::Response};
use casegen_core::dto::export::ExportRequest;

use crate::api::error::{ApiError, ApiResult};
use crate::api::formatted_response;
use crate::service::export_service;

/// POST /export
/// Render test cases or raw text supplied by the caller
pub async fn export(payload: Result<Json<ExportRequest>, JsonRejection>) -> ApiResult<Response> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let body = export_service::export_formatted(&req.test_cases, req.format);
    Ok(formatted_response(req.format, body))
}
