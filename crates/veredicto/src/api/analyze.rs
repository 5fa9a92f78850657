use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use veredicto_core::AnalyzeError;
use veredicto_verdict::Verdict;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub claim: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    /// Rendered report for the UI layer
    pub markdown: String,
    pub verdict: Option<Verdict>,
    pub confidence: Option<f64>,
    pub warnings: Vec<String>,
    pub duration_secs: f64,
}

pub async fn analyze_claim(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let outcome = state
        .analyzer
        .analyze(&request.claim)
        .await
        .map_err(|e| match e {
            AnalyzeError::EmptyClaim => (StatusCode::BAD_REQUEST, e.to_string()),
            AnalyzeError::Model(_) => (StatusCode::BAD_GATEWAY, e.to_string()),
        })?;

    Ok(Json(AnalyzeResponse {
        markdown: outcome.to_markdown(),
        verdict: outcome.report.verdict,
        confidence: outcome.report.confidence,
        warnings: outcome
            .report
            .warnings
            .iter()
            .map(|w| w.to_string())
            .collect(),
        duration_secs: outcome.duration_secs,
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
