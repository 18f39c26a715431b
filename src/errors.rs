use crate::controller::UnknownView;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

/// A rejected dashboard request. Upstream failures never surface here; they
/// are folded into the load status instead.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unknown_category(name: &str) -> Self {
        Self::bad_request(format!("unknown category '{name}'"))
    }
}

impl From<UnknownView> for AppError {
    fn from(err: UnknownView) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, "rejected request: {}", self.message);
        (self.status, self.message).into_response()
    }
}
