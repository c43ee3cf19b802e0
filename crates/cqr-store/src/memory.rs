//! In-process store
use async_trait::async_trait;
use cqr_core::Report;
use tokio::sync::RwLock;

use crate::merge::{merge, upsert};
use crate::{ReportStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: RwLock<Vec<Report>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reports(reports: Vec<Report>) -> Self {
        Self {
            reports: RwLock::new(reports),
        }
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn get_all(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.reports.read().await.clone())
    }

    async fn get(&self, unique_ref_no: &str) -> Result<Option<Report>, StoreError> {
        Ok(self
            .reports
            .read()
            .await
            .iter()
            .find(|r| r.unique_ref_no == unique_ref_no)
            .cloned())
    }

    async fn save(&self, report: Report) -> Result<(), StoreError> {
        upsert(&mut *self.reports.write().await, report);
        Ok(())
    }

    async fn save_multiple(&self, reports: Vec<Report>) -> Result<usize, StoreError> {
        if reports.is_empty() {
            return Ok(0);
        }
        let count = reports.len();
        let mut guard = self.reports.write().await;
        let existing = std::mem::take(&mut *guard);
        *guard = merge(existing, reports);
        Ok(count)
    }

    async fn delete(&self, unique_ref_no: &str) -> Result<bool, StoreError> {
        let mut guard = self.reports.write().await;
        let before = guard.len();
        guard.retain(|r| r.unique_ref_no != unique_ref_no);
        Ok(guard.len() != before)
    }
}
