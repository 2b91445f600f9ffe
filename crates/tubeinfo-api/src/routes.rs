//! API route definitions

use crate::handlers::classify;
use crate::state::AppState;
use axum::{routing::post, Router};
use std::sync::Arc;

/// Create API v1 routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/classify", post(classify::classify_handler))
}
