//! CQR Core: report data model and the arithmetic shared by every surface
//!
//! Everything here is pure. The importer, the exporter, the list view and the
//! workflow all compute strengths through [`strength`] so they can never
//! disagree on rounding or edge cases.

pub mod data_model;
pub mod error;
pub mod listing;
pub mod refs;
pub mod stats;
pub mod strength;

pub use data_model::{
    CubeSize, MediaBlob, MixType, Period, Report, ReportAnalysis, SiteOrPlant, TestBatch,
    TestResults, TestStatus,
};
pub use error::CqrError;
pub use listing::{sort_newest_first, ReportRow};
pub use refs::next_unique_ref;
pub use stats::ReportStats;
pub use strength::{average_positive, compressive_strength, parse_number, parse_number_or_zero};

/// Reported by the API health endpoint
pub const CQR_VERSION: &str = env!("CARGO_PKG_VERSION");
