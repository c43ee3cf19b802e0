//! Integration tests for the report workflow with a stub collaborator.

use async_trait::async_trait;
use chrono::NaiveDate;
use cqr_core::{CqrError, Report, TestStatus};
use cqr_out::ExportError;
use cqr_seal::{HashAlgorithm, Verification};
use cqr_store::{MemoryStore, ReportStore};
use cqr_workflow::{AnalysisError, AnalysisProvider, ReportWorkflow, WorkflowConfig, WorkflowError};
use rust_xlsxwriter::Workbook;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ANALYSIS: &str = r#"{
    "summary": "7-day strength is adequate for M30.",
    "qualityScore": 84,
    "sevenDaysResults": {"strengths": [20.0, 20.67, 20.22], "averageStrength": 20.3, "status": "Pass"},
    "twentyEightDaysResults": {"strengths": [0, 0, 0], "averageStrength": 0, "status": "N/A"},
    "issues": [],
    "recommendations": ["Continue curing"]
}"#;

enum Reply {
    Text(&'static str),
    Unavailable,
}

struct StubProvider {
    reply: Reply,
    calls: AtomicUsize,
}

impl StubProvider {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl AnalysisProvider for StubProvider {
    async fn generate_report(&self, _report: &Report) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Unavailable => Err(AnalysisError::ApiError {
                status: 503,
                body: "overloaded".into(),
            }),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn workflow(reply: Reply, read_only: bool) -> (ReportWorkflow, Arc<MemoryStore>, Arc<StubProvider>) {
    let store = Arc::new(MemoryStore::new());
    let provider = StubProvider::new(reply);
    let config = WorkflowConfig {
        read_only,
        ..WorkflowConfig::default()
    };
    let wf = ReportWorkflow::new(store.clone(), provider.clone(), config);
    (wf, store, provider)
}

fn form(unique_ref: &str) -> Report {
    let mut r = Report::new(unique_ref);
    r.client_name = "Future Homes LLC".into();
    r.grade = "M30".into();
    r.set_casting_date(NaiveDate::from_ymd_opt(2024, 7, 28).unwrap());
    r.seven_days.loads = ["450".into(), "465".into(), "455".into()];
    r
}

fn workbook(rows: &[(&str, &str)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Ticket No.").unwrap();
    sheet.write_string(0, 1, "Client Name").unwrap();
    for (i, (key, client)) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        if !key.is_empty() {
            sheet.write_string(r, 0, *key).unwrap();
        }
        sheet.write_string(r, 1, *client).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_submit_seals_and_saves() {
    let (wf, store, provider) = workflow(Reply::Text(ANALYSIS), false);

    let sealed = wf.submit(form("2024-08-01-1")).await.unwrap();
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert!(sealed.is_sealed());
    let analysis = sealed.analysis.as_ref().unwrap();
    assert_eq!(analysis.quality_score, 84);
    assert_eq!(analysis.seven_days_results.status, TestStatus::Pass);

    let stored = store.get("2024-08-01-1").await.unwrap().unwrap();
    assert_eq!(stored, sealed);
    assert!(wf.verify("2024-08-01-1").await.unwrap().is_valid());
}

#[tokio::test]
async fn test_collaborator_failure_saves_nothing() {
    let (wf, store, _) = workflow(Reply::Unavailable, false);

    let err = wf.submit(form("2024-08-01-1")).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Analysis(AnalysisError::ApiError { status: 503, .. })));
    assert!(CqrError::from(err).to_string().starts_with("ANALYSIS/"));
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_analysis_saves_nothing() {
    let (wf, store, _) = workflow(Reply::Text("{\"summary\": 42}"), false);

    let err = wf.submit(form("2024-08-01-1")).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Analysis(AnalysisError::InvalidResponse(_))));
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resubmission_replaces_entry() {
    let (wf, store, _) = workflow(Reply::Text(ANALYSIS), false);

    let first = wf.submit(form("2024-08-01-1")).await.unwrap();
    let mut edited = first.clone();
    edited.observations = "Re-tested cube 2".into();
    let second = wf.submit(edited).await.unwrap();

    assert_ne!(first.hash, second.hash);
    assert_eq!(store.get_all().await.unwrap().len(), 1);
    assert!(wf.verify("2024-08-01-1").await.unwrap().is_valid());
}

#[tokio::test]
async fn test_tampered_report_fails_verification() {
    let (wf, store, _) = workflow(Reply::Text(ANALYSIS), false);
    let mut sealed = wf.submit(form("2024-08-01-1")).await.unwrap();

    sealed.grade = "M40".into();
    store.save(sealed).await.unwrap();
    assert!(matches!(
        wf.verify("2024-08-01-1").await.unwrap(),
        Verification::Mismatch { .. }
    ));
}

#[tokio::test]
async fn test_digest_switch_keeps_old_seals_valid() {
    let (wf, store, _) = workflow(Reply::Text(ANALYSIS), false);
    wf.submit(form("2024-08-01-1")).await.unwrap();

    let switched = ReportWorkflow::new(
        store.clone(),
        StubProvider::new(Reply::Text(ANALYSIS)),
        WorkflowConfig {
            read_only: false,
            hash_algorithm: HashAlgorithm::Blake3,
        },
    );
    assert!(matches!(
        switched.verify("2024-08-01-1").await.unwrap(),
        Verification::Valid {
            algorithm: HashAlgorithm::Sha256,
            ..
        }
    ));
}

#[tokio::test]
async fn test_blank_reference_rejected() {
    let (wf, _, provider) = workflow(Reply::Text(ANALYSIS), false);
    let err = wf.submit(form("   ")).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Invalid(_)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Read-only Mode
// =============================================================================

#[tokio::test]
async fn test_read_only_refuses_writes() {
    let (wf, store, provider) = workflow(Reply::Text(ANALYSIS), true);

    let err = wf.submit(form("2024-08-01-1")).await.unwrap_err();
    assert!(matches!(err, WorkflowError::ReadOnly(_)));
    let err = wf.import(workbook(&[("T-1", "Acme")])).await.unwrap_err();
    assert_eq!(CqrError::from(err).category(), "READONLY");

    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert!(store.get_all().await.unwrap().is_empty());
    assert!(wf.rows().await.unwrap().is_empty());
}

// =============================================================================
// Drafts, Import, Export
// =============================================================================

#[tokio::test]
async fn test_draft_reference_counts_todays_reports() {
    let (wf, store, _) = workflow(Reply::Text(ANALYSIS), false);
    let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();

    assert_eq!(wf.new_draft(today).await.unwrap().unique_ref_no, "2024-08-01-1");
    store.save(Report::new("2024-08-01-1")).await.unwrap();
    store.save(Report::new("2024-07-31-1")).await.unwrap();
    assert_eq!(wf.new_draft(today).await.unwrap().unique_ref_no, "2024-08-01-2");
}

#[tokio::test]
async fn test_import_merges_into_store() {
    let (wf, store, _) = workflow(Reply::Text(ANALYSIS), false);
    let bytes = workbook(&[("T-1", "Acme"), ("", "Nobody"), ("T-2", "Globex")]);

    let outcome = wf.import(bytes.clone()).await.unwrap();
    assert_eq!(outcome.imported_reports.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].starts_with("Skipping row 3:"));

    wf.import(bytes).await.unwrap();
    assert_eq!(store.get_all().await.unwrap().len(), 2);
    assert_eq!(wf.get("T-2").await.unwrap().client_name, "Globex");
}

#[tokio::test]
async fn test_rows_newest_first() {
    let (wf, store, _) = workflow(Reply::Text(ANALYSIS), false);
    wf.submit(form("2024-08-01-1")).await.unwrap();
    store.save(Report::new("UNSEALED")).await.unwrap();
    wf.submit(form("2024-08-01-2")).await.unwrap();

    let keys: Vec<String> = wf.rows().await.unwrap().into_iter().map(|r| r.unique_ref_no).collect();
    assert_eq!(keys, ["2024-08-01-2", "2024-08-01-1", "UNSEALED"]);
}

#[tokio::test]
async fn test_export_requires_reports() {
    let (wf, _, _) = workflow(Reply::Text(ANALYSIS), false);
    assert!(matches!(
        wf.export_all().await,
        Err(WorkflowError::Export(ExportError::NoReports))
    ));

    wf.submit(form("2024-08-01-1")).await.unwrap();
    let bytes = wf.export_all().await.unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert!(wf.export_template().unwrap().starts_with(b"PK"));
}

#[tokio::test]
async fn test_stats() {
    let (wf, _, _) = workflow(Reply::Text(ANALYSIS), false);
    wf.submit(form("2024-08-01-1")).await.unwrap();
    let stats = wf.stats().await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.analyzed, 1);
    assert_eq!(stats.average_score, 84.0);
}

#[tokio::test]
async fn test_unknown_report() {
    let (wf, _, _) = workflow(Reply::Text(ANALYSIS), false);
    let err = wf.verify("nope").await.unwrap_err();
    assert_eq!(CqrError::from(err).category(), "NOTFOUND");
}
