use axum::{Json, Router, routing::get};

use crate::models::{AppState, MessageResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Health Buddy API is running".to_string(),
    })
}
