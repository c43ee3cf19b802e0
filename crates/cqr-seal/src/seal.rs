//! Sealing and verification
use chrono::{DateTime, Utc};
use cqr_core::Report;
use serde::{Deserialize, Serialize};

use crate::canonical::canonical_report_string;
use crate::digest::{digest_hex_async, HashAlgorithm};
use crate::SealError;

/// Fingerprint of a report's current business content.
pub fn fingerprint(report: &Report, algorithm: HashAlgorithm) -> String {
    algorithm.digest_hex(&canonical_report_string(report))
}

/// Attach a fresh `timestamp` and the matching `hash`.
///
/// The report must carry an analysis. On error the report is consumed and
/// nothing half-sealed escapes.
pub async fn seal(
    mut report: Report,
    now: DateTime<Utc>,
    algorithm: HashAlgorithm,
) -> Result<Report, SealError> {
    if report.analysis.is_none() {
        return Err(SealError::MissingAnalysis(report.unique_ref_no));
    }

    report.timestamp = Some(now);
    report.hash = None;
    let canonical = canonical_report_string(&report);
    let hash = digest_hex_async(algorithm, canonical).await?;
    report.hash = Some(hash);

    tracing::debug!(unique_ref = %report.unique_ref_no, %algorithm, "report sealed");
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verification {
    Valid { hash: String, algorithm: HashAlgorithm },
    Mismatch { stored: String, computed: String },
    Unsealed,
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Recompute the fingerprint and compare it with the stored one.
///
/// `algorithm` is tried first, then every other supported digest, so reports
/// sealed before a digest switch still verify. A mismatch reports the value
/// computed with `algorithm`.
pub fn verify(report: &Report, algorithm: HashAlgorithm) -> Verification {
    let Some(stored) = report.hash.as_deref() else {
        return Verification::Unsealed;
    };
    let stored = stored.trim();
    let canonical = canonical_report_string(report);
    let preferred = algorithm.digest_hex(&canonical);

    let fallbacks = HashAlgorithm::ALL.into_iter().filter(|a| *a != algorithm);
    for (candidate, computed) in std::iter::once((algorithm, preferred.clone()))
        .chain(fallbacks.map(|a| (a, a.digest_hex(&canonical))))
    {
        if stored.eq_ignore_ascii_case(&computed) {
            return Verification::Valid {
                hash: computed,
                algorithm: candidate,
            };
        }
    }

    Verification::Mismatch {
        stored: stored.to_string(),
        computed: preferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use cqr_core::ReportAnalysis;

    fn analysed() -> Report {
        let mut r = Report::new("2024-08-01-1");
        r.client_name = "Future Homes LLC".into();
        r.grade = "M30".into();
        r.seven_days.loads = ["450".into(), "465".into(), "455".into()];
        r.analysis = Some(ReportAnalysis {
            summary: "Meets grade".into(),
            quality_score: 88,
            ..ReportAnalysis::default()
        });
        r
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_seal_sets_pair() {
        let sealed = seal(analysed(), at(9), HashAlgorithm::Sha256).await.unwrap();
        assert_eq!(sealed.timestamp, Some(at(9)));
        assert_eq!(sealed.hash.as_ref().map(|h| h.len()), Some(64));
        assert!(sealed.is_sealed());
    }

    #[tokio::test]
    async fn test_seal_requires_analysis() {
        let mut r = analysed();
        r.analysis = None;
        let err = seal(r, at(9), HashAlgorithm::Sha256).await.unwrap_err();
        assert!(matches!(err, SealError::MissingAnalysis(_)));
    }

    #[tokio::test]
    async fn test_resubmission_same_content_same_hash() {
        let first = seal(analysed(), at(9), HashAlgorithm::Sha256).await.unwrap();
        let second = seal(first.clone(), at(17), HashAlgorithm::Sha256).await.unwrap();
        assert_ne!(first.timestamp, second.timestamp);
        assert_eq!(first.hash, second.hash);
    }

    #[tokio::test]
    async fn test_business_field_changes_hash() {
        let first = seal(analysed(), at(9), HashAlgorithm::Sha256).await.unwrap();
        let mut edited = first.clone();
        edited.seven_days.loads[2] = "456".into();
        let second = seal(edited, at(10), HashAlgorithm::Sha256).await.unwrap();
        assert_ne!(first.hash, second.hash);
    }

    #[tokio::test]
    async fn test_verify() {
        let sealed = seal(analysed(), at(9), HashAlgorithm::Blake3).await.unwrap();
        assert!(verify(&sealed, HashAlgorithm::Blake3).is_valid());

        let mut tampered = sealed.clone();
        tampered.grade = "M40".into();
        assert!(matches!(
            verify(&tampered, HashAlgorithm::Blake3),
            Verification::Mismatch { .. }
        ));

        assert_eq!(verify(&analysed(), HashAlgorithm::Blake3), Verification::Unsealed);
    }

    #[tokio::test]
    async fn test_verify_after_digest_switch() {
        let sealed = seal(analysed(), at(9), HashAlgorithm::Sha256).await.unwrap();
        let hash = sealed.hash.clone().unwrap();

        assert_eq!(
            verify(&sealed, HashAlgorithm::Blake3),
            Verification::Valid {
                hash,
                algorithm: HashAlgorithm::Sha256,
            }
        );

        let mut tampered = sealed.clone();
        tampered.grade = "M40".into();
        match verify(&tampered, HashAlgorithm::Blake3) {
            Verification::Mismatch { computed, .. } => {
                assert_eq!(computed, fingerprint(&tampered, HashAlgorithm::Blake3));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }
}
