//! Prometheus counters served on `/metrics`.
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

pub struct ApiMetrics {
    registry: Registry,
    pub imports: IntCounter,
    pub imported_reports: IntCounter,
    pub import_row_errors: IntCounter,
    pub reports_sealed: IntCounter,
    pub exports: IntCounter,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let counter = |name: &str, help: &str| -> Result<IntCounter, prometheus::Error> {
            let c = IntCounter::new(name, help)?;
            registry.register(Box::new(c.clone()))?;
            Ok(c)
        };

        Ok(Self {
            imports: counter("cqr_imports_total", "Workbook import calls")?,
            imported_reports: counter("cqr_imported_reports_total", "Reports merged from imports")?,
            import_row_errors: counter("cqr_import_row_errors_total", "Rows rejected during import")?,
            reports_sealed: counter("cqr_reports_sealed_total", "Reports analysed and sealed")?,
            exports: counter("cqr_exports_total", "Workbook exports served")?,
            registry,
        })
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
