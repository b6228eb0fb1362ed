use axum::{Json, Router, routing::get};

use crate::models::{AppState, MessageResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Clinic Appointment System API".to_string(),
    })
}
