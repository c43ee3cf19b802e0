//! Server configuration from environment variables.
use cqr_core::CqrError;
use cqr_seal::HashAlgorithm;
use cqr_workflow::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub addr: SocketAddr,
    pub store_path: PathBuf,
    pub read_only: bool,
    pub hash_algorithm: HashAlgorithm,
    pub gemini: GeminiConfig,
}

impl ApiConfig {
    /// Load from the process environment.
    ///
    /// | Variable             | Default             |
    /// |----------------------|---------------------|
    /// | `CQR_ADDR`           | `0.0.0.0:8787`      |
    /// | `CQR_STORE_PATH`     | `data/reports.json` |
    /// | `CQR_READ_ONLY`      | `false`             |
    /// | `CQR_HASH_ALGORITHM` | `sha256`            |
    /// | `GEMINI_API_KEY`     | unset               |
    /// | `GEMINI_MODEL`       | `gemini-2.5-flash`  |
    /// | `GEMINI_BASE_URL`    | Google endpoint     |
    pub fn from_env() -> Result<Self, CqrError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CqrError> {
        let var = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let addr = var("CQR_ADDR", "0.0.0.0:8787")
            .parse()
            .map_err(|e| CqrError::ConfigError(format!("CQR_ADDR: {e}")))?;

        let read_only = match var("CQR_READ_ONLY", "false").to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(CqrError::ConfigError(format!(
                    "CQR_READ_ONLY: expected true or false, got '{other}'"
                )))
            }
        };

        let hash_algorithm = var("CQR_HASH_ALGORITHM", "sha256")
            .parse()
            .map_err(|e| CqrError::ConfigError(format!("CQR_HASH_ALGORITHM: {e}")))?;

        Ok(Self {
            addr,
            store_path: PathBuf::from(var("CQR_STORE_PATH", "data/reports.json")),
            read_only,
            hash_algorithm,
            gemini: GeminiConfig {
                api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
                model: var("GEMINI_MODEL", DEFAULT_MODEL),
                base_url: var("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            },
        })
    }
}
