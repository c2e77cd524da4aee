use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

/// GET /health: Liveness plus which optional collaborators are configured.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "summarizer_configured": state.config.has_summarizer(),
        "auth_enabled": state.config.api_token.is_some(),
    }))
}
