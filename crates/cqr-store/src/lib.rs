//! CQR Store: local report persistence keyed by `uniqueRefNo`
//!
//! Two backends share the [`ReportStore`] contract: an in-memory list and a
//! single JSON document on disk. Both keep "most recently added first"
//! insertion order; display ordering by timestamp is the caller's job.
//!
//! Read-modify-write cycles are serialized only within one store instance.
//! Two processes sharing a file are not coordinated.

pub mod codec;
pub mod file;
pub mod memory;
pub mod merge;

use async_trait::async_trait;
use cqr_core::{CqrError, Report};
use std::path::PathBuf;
use thiserror::Error;

pub use codec::{BlobCodec, DataUrlCodec};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use merge::{merge, upsert};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not read reports from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Stored reports in {path} are unreadable: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("Could not write reports to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("attachment could not be decoded: {0}")]
    Blob(String),
}

impl From<StoreError> for CqrError {
    fn from(err: StoreError) -> Self {
        CqrError::StoreError(err.to_string())
    }
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Every stored report, in insertion order (newest first).
    async fn get_all(&self) -> Result<Vec<Report>, StoreError>;

    async fn get(&self, unique_ref_no: &str) -> Result<Option<Report>, StoreError>;

    /// Upsert by key: replace in place, or insert as the newest entry.
    async fn save(&self, report: Report) -> Result<(), StoreError>;

    /// Merge a batch by key, last write wins. Returns how many reports were
    /// written; an empty batch touches nothing.
    async fn save_multiple(&self, reports: Vec<Report>) -> Result<usize, StoreError>;

    /// Remove by key; `false` when the key was unknown.
    async fn delete(&self, unique_ref_no: &str) -> Result<bool, StoreError>;
}
