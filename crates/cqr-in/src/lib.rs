//! CQR-IN: spreadsheet → report import
//!
//! Tokenizes the first worksheet of an uploaded workbook, resolves renamed
//! columns through alias tables and coerces each row into a [`Report`].
//! Bad rows become error strings in the outcome; only an unreadable file
//! fails the whole call.
//!
//! # Example
//!
//! ```ignore
//! use cqr_in::{import_workbook, ImportOptions};
//!
//! let bytes = tokio::fs::read("reports.xlsx").await?;
//! let outcome = import_workbook(bytes, ImportOptions::default()).await?;
//! for error in &outcome.errors {
//!     eprintln!("{error}");
//! }
//! ```

pub mod aliases;
pub mod normalizer;
pub mod rows;
pub mod sheet;

use cqr_core::{CqrError, Report};
use cqr_seal::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use rows::{report_from_row, RowError};
pub use sheet::{read_rows, SheetRow};

/// Result of one import call. Both lists follow file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub imported_reports: Vec<Report>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Digest used when a stamped row arrives without a hash
    pub hash_algorithm: HashAlgorithm,
}

/// Whole-file failures
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read the file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("File is empty or could not be read.")]
    Empty,
    #[error("The file is corrupted or not in the expected Excel format ({0}).")]
    Format(String),
    #[error("The workbook contains no worksheet.")]
    NoWorksheet,
    #[error("import task failed: {0}")]
    Worker(String),
}

impl From<ImportError> for CqrError {
    fn from(err: ImportError) -> Self {
        CqrError::ImportError(err.to_string())
    }
}

/// Parse workbook bytes synchronously.
pub fn parse_workbook(bytes: &[u8], options: ImportOptions) -> Result<ImportOutcome, ImportError> {
    if bytes.is_empty() {
        return Err(ImportError::Empty);
    }

    let mut outcome = ImportOutcome::default();
    for row in read_rows(bytes)? {
        if row.is_blank() {
            continue;
        }
        match report_from_row(&row, options.hash_algorithm) {
            Ok(report) => outcome.imported_reports.push(report),
            Err(err) => {
                tracing::warn!(row = row.number, "{}", err);
                outcome.errors.push(err.to_string());
            }
        }
    }

    tracing::info!(
        count = outcome.imported_reports.len(),
        errors = outcome.errors.len(),
        "workbook parsed"
    );
    Ok(outcome)
}

/// Parse workbook bytes off the async executor.
pub async fn import_workbook(bytes: Vec<u8>, options: ImportOptions) -> Result<ImportOutcome, ImportError> {
    tokio::task::spawn_blocking(move || parse_workbook(&bytes, options))
        .await
        .map_err(|e| ImportError::Worker(e.to_string()))?
}

/// Read a workbook from disk and import it.
pub async fn import_file(path: impl AsRef<Path>, options: ImportOptions) -> Result<ImportOutcome, ImportError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "workbook read");
    import_workbook(bytes, options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bytes_rejected() {
        assert!(matches!(
            parse_workbook(&[], ImportOptions::default()),
            Err(ImportError::Empty)
        ));
    }

    #[test]
    fn test_garbage_is_format_error() {
        let err = parse_workbook(b"not a workbook at all", ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::Format(_)));
        assert!(CqrError::from(err).to_string().starts_with("IMPORT/The file is corrupted"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = import_file("/nonexistent/reports.xlsx", ImportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
    }
}
