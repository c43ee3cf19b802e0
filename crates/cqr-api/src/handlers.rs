//! API Handlers
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use cqr_core::{Report, ReportRow, ReportStats, CQR_VERSION};
use cqr_out::{EXPORT_FILE_NAME, TEMPLATE_FILE_NAME};
use cqr_seal::Verification;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let config = state.workflow.config();
    Json(json!({
        "status": "ok",
        "version": CQR_VERSION,
        "readOnly": config.read_only,
        "hashAlgorithm": config.hash_algorithm.to_string(),
    }))
}

pub async fn list_reports(State(state): State<AppState>) -> ApiResult<Json<Vec<ReportRow>>> {
    Ok(Json(state.workflow.rows().await?))
}

pub async fn new_draft(State(state): State<AppState>) -> ApiResult<Json<Report>> {
    let today = Utc::now().date_naive();
    Ok(Json(state.workflow.new_draft(today).await?))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(unique_ref): Path<String>,
) -> ApiResult<Json<Report>> {
    Ok(Json(state.workflow.get(&unique_ref).await?))
}

pub async fn submit_report(
    State(state): State<AppState>,
    Json(report): Json<Report>,
) -> ApiResult<(StatusCode, Json<Report>)> {
    let sealed = state.workflow.submit(report).await?;
    state.metrics.reports_sealed.inc();
    Ok((StatusCode::CREATED, Json(sealed)))
}

pub async fn verify_report(
    State(state): State<AppState>,
    Path(unique_ref): Path<String>,
) -> ApiResult<Json<Verification>> {
    Ok(Json(state.workflow.verify(&unique_ref).await?))
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub errors: Vec<String>,
}

/// Body is the raw workbook; rows that fail are reported, not fatal.
pub async fn import_workbook(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ImportSummary>> {
    state.metrics.imports.inc();
    let outcome = state.workflow.import(body.to_vec()).await?;
    state
        .metrics
        .imported_reports
        .inc_by(outcome.imported_reports.len() as u64);
    state.metrics.import_row_errors.inc_by(outcome.errors.len() as u64);
    Ok(Json(ImportSummary {
        imported: outcome.imported_reports.len(),
        errors: outcome.errors,
    }))
}

fn xlsx_attachment(bytes: Vec<u8>, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

pub async fn export_reports(State(state): State<AppState>) -> ApiResult<Response> {
    let bytes = state.workflow.export_all().await?;
    state.metrics.exports.inc();
    Ok(xlsx_attachment(bytes, EXPORT_FILE_NAME))
}

pub async fn import_template(State(state): State<AppState>) -> ApiResult<Response> {
    let bytes = state.workflow.export_template()?;
    Ok(xlsx_attachment(bytes, TEMPLATE_FILE_NAME))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<ReportStats>> {
    Ok(Json(state.workflow.stats().await?))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
