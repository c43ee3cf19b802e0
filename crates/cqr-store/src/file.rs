//! JSON document store on disk.
//!
//! The whole report list lives in one file. Writes go to a sibling temp file
//! that is renamed over the target. Attachments are kept beside each report
//! as codec-encoded strings.
use async_trait::async_trait;
use cqr_core::{MediaBlob, Period, Report};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::codec::{BlobCodec, DataUrlCodec};
use crate::merge::{merge, upsert};
use crate::{ReportStore, StoreError};

const SIGNED_PDF_KEY: &str = "signedReportPdfBlob";

fn media_key(period: Period) -> String {
    format!("{}CtmMediaBlob", period.field_prefix())
}

/// On-disk shape of one report
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(flatten)]
    report: Report,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    blobs: BTreeMap<String, String>,
}

pub struct JsonFileStore {
    path: PathBuf,
    codec: Arc<dyn BlobCodec>,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_codec(path, Arc::new(DataUrlCodec))
    }

    pub fn with_codec(path: impl Into<PathBuf>, codec: Arc<dyn BlobCodec>) -> Self {
        Self {
            path: path.into(),
            codec,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode_record(&self, report: &Report) -> StoredRecord {
        let mut blobs = BTreeMap::new();
        for period in Period::ALL {
            if let Some(media) = &report.batch(period).media {
                blobs.insert(media_key(period), self.codec.encode(media));
            }
        }
        if let Some(pdf) = &report.signed_report_pdf {
            blobs.insert(SIGNED_PDF_KEY.to_string(), self.codec.encode(pdf));
        }
        StoredRecord {
            report: report.clone(),
            blobs,
        }
    }

    fn decode_record(&self, record: StoredRecord) -> Result<Report, StoreError> {
        let StoredRecord { mut report, blobs } = record;
        let decode = |key: &str| -> Result<Option<MediaBlob>, StoreError> {
            blobs.get(key).map(|raw| self.codec.decode(raw)).transpose()
        };
        for period in Period::ALL {
            report.batch_mut(period).media = decode(&media_key(period))?;
        }
        report.signed_report_pdf = decode(SIGNED_PDF_KEY)?;
        Ok(report)
    }

    async fn load(&self) -> Result<Vec<Report>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let records: Vec<StoredRecord> =
            serde_json::from_slice(&raw).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        records.into_iter().map(|r| self.decode_record(r)).collect()
    }

    async fn persist(&self, reports: &[Report]) -> Result<(), StoreError> {
        let records: Vec<StoredRecord> = reports.iter().map(|r| self.encode_record(r)).collect();
        let json = serde_json::to_vec_pretty(&records).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let tmp_path = self.path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp_path, &json).await.map_err(write_err)?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                tracing::warn!(path = %tmp_path.display(), error = %cleanup, "temp file left behind");
            }
            return Err(write_err(e));
        }

        tracing::debug!(path = %self.path.display(), count = reports.len(), "store written");
        Ok(())
    }
}

#[async_trait]
impl ReportStore for JsonFileStore {
    async fn get_all(&self) -> Result<Vec<Report>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn get(&self, unique_ref_no: &str) -> Result<Option<Report>, StoreError> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|r| r.unique_ref_no == unique_ref_no))
    }

    async fn save(&self, report: Report) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut reports = self.load().await?;
        let unique_ref = report.unique_ref_no.clone();
        upsert(&mut reports, report);
        self.persist(&reports).await?;
        tracing::info!(%unique_ref, "report saved");
        Ok(())
    }

    async fn save_multiple(&self, reports: Vec<Report>) -> Result<usize, StoreError> {
        if reports.is_empty() {
            return Ok(0);
        }
        let _guard = self.lock.lock().await;
        let count = reports.len();
        let merged = merge(self.load().await?, reports);
        self.persist(&merged).await?;
        tracing::info!(count, total = merged.len(), "reports merged");
        Ok(count)
    }

    async fn delete(&self, unique_ref_no: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut reports = self.load().await?;
        let before = reports.len();
        reports.retain(|r| r.unique_ref_no != unique_ref_no);
        if reports.len() == before {
            return Ok(false);
        }
        self.persist(&reports).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.json");
        // A non-empty directory at the target makes the rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.persist(&[Report::new("A")]).await.unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty(), "{leftovers:?}");
    }
}
