use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    routing, Json, Router,
};
use relay_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use relay_shared_contracts::rate_limit::RateLimitService;
use relay_utils::Apply;
use serde_json::Value;
use tracing::debug;

use crate::{
    errors::{error, internal_server_error, success},
    middlewares,
    models::contact::validate,
};

pub const MESSAGE_SENT: &str = "Message sent.";

pub fn router(
    service: Arc<impl ContactFeatureService>,
    rate_limit: Arc<impl RateLimitService>,
) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .apply(middlewares::rate_limit::add(rate_limit))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(err) => {
            debug!("rejected contact request body: {err}");
            let status = match err.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return error(status, err.body_text());
        }
    };

    let submission = match validate(&body) {
        Ok(submission) => submission,
        Err(err) => {
            debug!("invalid contact submission: {err}");
            return error(StatusCode::BAD_REQUEST, err.to_string());
        }
    };

    match service.send_message(submission).await {
        Ok(()) => success(MESSAGE_SENT),
        Err(err @ ContactSendMessageError::Send) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err),
    }
}
