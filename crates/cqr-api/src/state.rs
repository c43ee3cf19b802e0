//! Shared handler state
use crate::config::ApiConfig;
use crate::metrics::ApiMetrics;
use cqr_core::CqrError;
use cqr_store::JsonFileStore;
use cqr_workflow::{AnalysisProvider, DisabledProvider, GeminiProvider, ReportWorkflow, WorkflowConfig};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<ReportWorkflow>,
    pub metrics: Arc<ApiMetrics>,
}

impl AppState {
    pub fn new(workflow: ReportWorkflow) -> Result<Self, CqrError> {
        let metrics = ApiMetrics::new().map_err(|e| CqrError::ConfigError(format!("metrics: {e}")))?;
        Ok(Self {
            workflow: Arc::new(workflow),
            metrics: Arc::new(metrics),
        })
    }

    /// File-backed store plus the Gemini collaborator when a key is present.
    pub fn from_config(config: &ApiConfig) -> Result<Self, CqrError> {
        let store = Arc::new(JsonFileStore::new(&config.store_path));

        let provider: Arc<dyn AnalysisProvider> = match &config.gemini.api_key {
            Some(key) => Arc::new(GeminiProvider::new(
                config.gemini.base_url.clone(),
                key.clone(),
                config.gemini.model.clone(),
            )?),
            None => {
                tracing::warn!("GEMINI_API_KEY not set; report submission is disabled");
                Arc::new(DisabledProvider)
            }
        };

        let workflow = ReportWorkflow::new(
            store,
            provider,
            WorkflowConfig {
                read_only: config.read_only,
                hash_algorithm: config.hash_algorithm,
            },
        );
        tracing::info!(
            store = %config.store_path.display(),
            read_only = config.read_only,
            hash = %config.hash_algorithm,
            "workflow ready"
        );
        Self::new(workflow)
    }
}
