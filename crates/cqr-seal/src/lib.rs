//! CQR Seal: content fingerprints for reports
//!
//! A sealed report carries a `timestamp` and a `hash` over its canonical form.
//! The hash is a public, unsalted fingerprint. It detects accidental edits,
//! it does not authenticate anyone.
pub mod canonical;
pub mod digest;
pub mod seal;

pub use canonical::{canonical_report_string, canonical_string, is_excluded_field};
pub use digest::{digest_hex_async, HashAlgorithm};
pub use seal::{fingerprint, seal, verify, Verification};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SealError {
    #[error("digest computation failed: {0}")]
    Digest(String),
    #[error("report {0} has no analysis to seal")]
    MissingAnalysis(String),
    #[error("unknown hash algorithm '{0}' (expected sha256 or blake3)")]
    UnknownAlgorithm(String),
}

impl From<SealError> for cqr_core::CqrError {
    fn from(err: SealError) -> Self {
        cqr_core::CqrError::SealError(err.to_string())
    }
}
