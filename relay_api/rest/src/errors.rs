use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Envelope shared by every response of the api.
#[derive(Debug, Serialize)]
pub struct ApiResponse<M> {
    pub success: bool,
    pub message: M,
}

pub fn success(message: impl Serialize) -> Response {
    let response = ApiResponse {
        success: true,
        message,
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub fn error(code: StatusCode, message: impl Serialize) -> Response {
    let response = ApiResponse {
        success: false,
        message,
    };
    (code, Json(response)).into_response()
}

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
