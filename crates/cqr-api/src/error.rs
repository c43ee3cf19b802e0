//! HTTP error mapping
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cqr_core::CqrError;
use cqr_out::ExportError;
use cqr_workflow::{AnalysisError, WorkflowError};
use serde_json::json;

/// Handler error: a workflow failure rendered as JSON.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub WorkflowError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WorkflowError::Invalid(_) | WorkflowError::Import(_) => StatusCode::BAD_REQUEST,
            WorkflowError::ReadOnly(_) => StatusCode::FORBIDDEN,
            WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
            WorkflowError::Export(ExportError::NoReports) => StatusCode::UNPROCESSABLE_ENTITY,
            WorkflowError::Analysis(AnalysisError::MissingApiKey) => StatusCode::SERVICE_UNAVAILABLE,
            WorkflowError::Analysis(_) => StatusCode::BAD_GATEWAY,
            WorkflowError::Export(_) | WorkflowError::Seal(_) | WorkflowError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = CqrError::from(self.0);
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::warn!(error = %err, "request rejected");
        }
        let body = json!({
            "error": err.to_string(),
            "code": err.category(),
        });
        (status, Json(body)).into_response()
    }
}
