//! CQR API /v1: REST endpoints over the report workflow
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use cqr_core::CqrError;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route(
            "/v1/reports",
            get(handlers::list_reports).post(handlers::submit_report),
        )
        .route("/v1/reports/draft", get(handlers::new_draft))
        .route("/v1/reports/{unique_ref}", get(handlers::get_report))
        .route("/v1/reports/{unique_ref}/verify", get(handlers::verify_report))
        .route("/v1/import", post(handlers::import_workbook))
        .route("/v1/export", get(handlers::export_reports))
        .route("/v1/template", get(handlers::import_template))
        .route("/v1/stats", get(handlers::stats))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::upload_limit())
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ApiConfig) -> Result<(), CqrError> {
    let state = AppState::from_config(&config)?;
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| CqrError::ConfigError(format!("failed to bind {}: {e}", config.addr)))?;

    tracing::info!("CQR API listening on {}", config.addr);
    axum::serve(listener, app)
        .await
        .map_err(|e| CqrError::ConfigError(format!("server error: {e}")))
}
