mod analyze;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use veredicto_core::ClaimAnalyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ClaimAnalyzer>,
}

pub fn create_router(analyzer: Arc<ClaimAnalyzer>) -> Router {
    let state = AppState { analyzer };

    Router::new()
        .route("/api/analyze", post(analyze::analyze_claim))
        .route("/api/health", get(analyze::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
