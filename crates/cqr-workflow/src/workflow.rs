//! Report workflow controller
//!
//! ```text
//! form → collaborator → ReportAnalysis → timestamp → canonical → hash → store
//! ```
//!
//! A report reaches the store only after every earlier step succeeded.
use chrono::{NaiveDate, Utc};
use cqr_core::{next_unique_ref, sort_newest_first, Report, ReportRow, ReportStats};
use cqr_in::{import_workbook, ImportOptions, ImportOutcome};
use cqr_seal::{seal, verify, HashAlgorithm, Verification};
use cqr_store::ReportStore;
use std::sync::Arc;

use crate::provider::{parse_analysis, AnalysisProvider};
use crate::WorkflowError;

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowConfig {
    /// Guest mode: everything that writes is refused.
    pub read_only: bool,
    pub hash_algorithm: HashAlgorithm,
}

pub struct ReportWorkflow {
    store: Arc<dyn ReportStore>,
    provider: Arc<dyn AnalysisProvider>,
    config: WorkflowConfig,
}

impl ReportWorkflow {
    pub fn new(
        store: Arc<dyn ReportStore>,
        provider: Arc<dyn AnalysisProvider>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            store,
            provider,
            config,
        }
    }

    pub fn config(&self) -> WorkflowConfig {
        self.config
    }

    fn ensure_writable(&self, action: &str) -> Result<(), WorkflowError> {
        if self.config.read_only {
            return Err(WorkflowError::ReadOnly(action.to_string()));
        }
        Ok(())
    }

    /// Blank form with a fresh `YYYY-MM-DD-<n>` reference and default selections.
    pub async fn new_draft(&self, today: NaiveDate) -> Result<Report, WorkflowError> {
        let existing = self.store.get_all().await?;
        let unique_ref = next_unique_ref(existing.iter().map(|r| r.unique_ref_no.as_str()), today);
        Ok(Report::new(unique_ref))
    }

    /// Analyse, seal and store a submitted form.
    pub async fn submit(&self, mut report: Report) -> Result<Report, WorkflowError> {
        self.ensure_writable("submit")?;
        report.unique_ref_no = report.unique_ref_no.trim().to_string();
        if report.unique_ref_no.is_empty() {
            return Err(WorkflowError::Invalid("uniqueRefNo is required".to_string()));
        }
        report.clear_seal();

        let text = self.provider.generate_report(&report).await?;
        report.analysis = Some(parse_analysis(&text)?);

        let sealed = seal(report, Utc::now(), self.config.hash_algorithm).await?;
        self.store.save(sealed.clone()).await?;

        tracing::info!(
            unique_ref = %sealed.unique_ref_no,
            provider = self.provider.name(),
            "report analysed and sealed"
        );
        Ok(sealed)
    }

    /// Import a workbook and merge every parsed report into the store.
    pub async fn import(&self, bytes: Vec<u8>) -> Result<ImportOutcome, WorkflowError> {
        self.ensure_writable("import")?;
        let options = ImportOptions {
            hash_algorithm: self.config.hash_algorithm,
        };
        let outcome = import_workbook(bytes, options).await?;
        self.store
            .save_multiple(outcome.imported_reports.clone())
            .await?;
        Ok(outcome)
    }

    /// Every stored report as a workbook.
    pub async fn export_all(&self) -> Result<Vec<u8>, WorkflowError> {
        let mut reports = self.store.get_all().await?;
        sort_newest_first(&mut reports);
        Ok(cqr_out::export_reports(&reports)?)
    }

    pub fn export_template(&self) -> Result<Vec<u8>, WorkflowError> {
        Ok(cqr_out::export_template()?)
    }

    pub async fn get(&self, unique_ref_no: &str) -> Result<Report, WorkflowError> {
        self.store
            .get(unique_ref_no)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(unique_ref_no.to_string()))
    }

    /// List rows, newest timestamp first.
    pub async fn rows(&self) -> Result<Vec<ReportRow>, WorkflowError> {
        let mut reports = self.store.get_all().await?;
        sort_newest_first(&mut reports);
        Ok(reports.iter().map(ReportRow::from).collect())
    }

    pub async fn stats(&self) -> Result<ReportStats, WorkflowError> {
        Ok(ReportStats::from_reports(&self.store.get_all().await?))
    }

    pub async fn verify(&self, unique_ref_no: &str) -> Result<Verification, WorkflowError> {
        let report = self.get(unique_ref_no).await?;
        Ok(verify(&report, self.config.hash_algorithm))
    }
}
