// handlers/chat.rs - GET/POST /chat

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::app::AppState;
use crate::chat::error::EMPTY_MESSAGE_REPLY;
use crate::chat::Principal;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// GET /chat - liveness probe used by the frontend
pub async fn chat_get() -> Json<Value> {
    Json(json!({ "status": "API OK" }))
}

/// POST /chat - answer one message for the resolved principal
pub async fn chat_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let message = match body {
        Ok(Json(ChatRequest { message: Some(message) })) if !message.trim().is_empty() => message,
        Ok(_) => return reject_empty(),
        Err(rejection) => {
            debug!("Rejected chat body: {}", rejection);
            return reject_empty();
        }
    };

    info!(role = %principal.role, student_code = ?principal.student_code, "Received chat message: {}", message);

    let reply = state.chat.handle(&message, &principal).await;
    debug!("Reply: {}...", reply.chars().take(100).collect::<String>());

    (StatusCode::OK, Json(ChatResponse { reply }))
}

fn reject_empty() -> (StatusCode, Json<ChatResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ChatResponse { reply: EMPTY_MESSAGE_REPLY.to_string() }),
    )
}
