// handlers/public.rs - GET / and GET /health

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Faculty Chat Relay",
            "version": version,
            "description": "Answers student questions with an LLM grounded in whitelisted faculty data",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "chat": "/chat (GET status, POST message; optional Bearer token)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let now = chrono::Utc::now();

    state.chat.store().ping().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::service_unavailable("database unavailable")
    })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        }
    })))
}
