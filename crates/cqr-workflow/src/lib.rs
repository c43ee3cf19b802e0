//! CQR Workflow: orchestration of the report lifecycle
//!
//! # Flow
//!
//! ```text
//! Draft → AnalysisProvider → ReportAnalysis → Seal → Store
//!   ↑                                                  ↓
//! Import (workbook) ──────── save_multiple ───────→ Export / Rows / Stats
//! ```

pub mod gemini;
pub mod prompt;
pub mod provider;
pub mod workflow;

pub use gemini::GeminiProvider;
pub use prompt::PromptRenderer;
pub use provider::{parse_analysis, AnalysisProvider, DisabledProvider};
pub use workflow::{ReportWorkflow, WorkflowConfig};

use cqr_core::CqrError;
use cqr_in::ImportError;
use cqr_out::ExportError;
use cqr_seal::SealError;
use cqr_store::StoreError;
use thiserror::Error;

/// Errors from the analysis collaborator
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no API key configured for the AI service")]
    MissingApiKey,
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("AI service error ({status}): {body}")]
    ApiError { status: u16, body: String },
    #[error("Received an empty response from the AI. Please check the input and try again.")]
    EmptyResponse,
    #[error("AI response does not match the report analysis shape: {0}")]
    InvalidResponse(String),
    #[error("prompt rendering failed: {0}")]
    Prompt(String),
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0} is not allowed in read-only mode")]
    ReadOnly(String),
    #[error("report {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Seal(#[from] SealError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<AnalysisError> for CqrError {
    fn from(err: AnalysisError) -> Self {
        CqrError::AnalysisError(err.to_string())
    }
}

impl From<WorkflowError> for CqrError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::ReadOnly(action) => CqrError::ReadOnly(action),
            WorkflowError::NotFound(key) => CqrError::NotFound(key),
            WorkflowError::Invalid(msg) => CqrError::InvalidInput(msg),
            WorkflowError::Analysis(e) => e.into(),
            WorkflowError::Seal(e) => e.into(),
            WorkflowError::Store(e) => e.into(),
            WorkflowError::Import(e) => e.into(),
            WorkflowError::Export(e) => e.into(),
        }
    }
}
