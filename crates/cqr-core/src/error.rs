//! Unified Error Model
//!
//! Each crate keeps its own error enum; this is the category-prefixed form
//! they collapse into at the outer surface.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CqrError {
    #[error("IMPORT/{0}")]
    ImportError(String),

    #[error("EXPORT/{0}")]
    ExportError(String),

    #[error("STORE/{0}")]
    StoreError(String),

    #[error("SEAL/{0}")]
    SealError(String),

    #[error("ANALYSIS/{0}")]
    AnalysisError(String),

    #[error("READONLY/{0}")]
    ReadOnly(String),

    #[error("NOTFOUND/{0}")]
    NotFound(String),

    #[error("CONFIG/{0}")]
    ConfigError(String),

    #[error("INPUT/{0}")]
    InvalidInput(String),
}

impl CqrError {
    /// Category prefix without the message, e.g. `"STORE"`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::ImportError(_) => "IMPORT",
            Self::ExportError(_) => "EXPORT",
            Self::StoreError(_) => "STORE",
            Self::SealError(_) => "SEAL",
            Self::AnalysisError(_) => "ANALYSIS",
            Self::ReadOnly(_) => "READONLY",
            Self::NotFound(_) => "NOTFOUND",
            Self::ConfigError(_) => "CONFIG",
            Self::InvalidInput(_) => "INPUT",
        }
    }
}
