use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/* -------------------------
   Client side
--------------------------*/

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("Request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("{field} must be an integer id, got {value:?}")]
    InvalidId { field: &'static str, value: String },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("unknown form field {0:?}")]
    UnknownField(String),
}

impl ClientError {
    /// Local errors never reached the server.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidId { .. }
                | ClientError::MissingField(_)
                | ClientError::UnknownField(_)
        )
    }
}

/* -------------------------
   Server side
--------------------------*/

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str, String),
    NotFound(&'static str, String),
    Internal(String),
}

impl ApiError {
    pub fn appointment_not_found() -> Self {
        ApiError::NotFound("NOT_FOUND", "Appointment not found".into())
    }

    pub fn db(e: sqlx::Error) -> Self {
        ApiError::Internal(format!("db error: {e}"))
    }

    fn to_error_response(code: &str, message: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            error: ErrorObject {
                code: code.to_string(),
                message: message.to_string(),
            },
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(code, msg) => {
                (StatusCode::BAD_REQUEST, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::NotFound(code, msg) => {
                (StatusCode::NOT_FOUND, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::to_error_response("INTERNAL", &msg),
                )
                    .into_response()
            }
        }
    }
}
