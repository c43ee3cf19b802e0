//! Request layers shared by every route.
use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;

/// Workbooks can run to a few megabytes with embedded media.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn cors() -> CorsLayer {
    CorsLayer::permissive()
}

pub fn upload_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_UPLOAD_BYTES)
}
