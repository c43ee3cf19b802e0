//! CQR-OUT: report list → spreadsheet
//!
//! Two products:
//! - a full export, one row per report on a `Reports` sheet
//! - a blank import template with a filled example row and an instructions sheet
//!
//! # Example
//!
//! ```ignore
//! use cqr_out::{export_reports, EXPORT_FILE_NAME};
//!
//! let bytes = export_reports(&reports)?;
//! std::fs::write(EXPORT_FILE_NAME, bytes)?;
//! ```

pub mod columns;
pub mod workbook;

use cqr_core::CqrError;
use thiserror::Error;

pub use columns::{headers, CellOut};
pub use workbook::{auto_widths, export_reports, export_template};

/// Default download name of a full export
pub const EXPORT_FILE_NAME: &str = "CubeQualityAnalysisReports.xlsx";
/// Default download name of the import template
pub const TEMPLATE_FILE_NAME: &str = "ImportTemplate.xlsx";

pub const REPORTS_SHEET: &str = "Reports";
pub const TEMPLATE_DATA_SHEET: &str = "Data Entry";
pub const TEMPLATE_INSTRUCTIONS_SHEET: &str = "Instructions";

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No reports to export.")]
    NoReports,
    #[error("Workbook write failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

impl From<ExportError> for CqrError {
    fn from(err: ExportError) -> Self {
        CqrError::ExportError(err.to_string())
    }
}
