use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    Router,
};
use relay_shared_contracts::rate_limit::{RateLimitDecision, RateLimitService};
use tracing::debug;

use super::client_ip::ClientIp;
use crate::errors::error;

pub const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later.";

/// Limit the routes of `router` with the given rate limiter. Only routes that
/// exist are counted.
pub fn add<S: Clone + Send + Sync + 'static, R: RateLimitService>(
    rate_limit: Arc<R>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| router.route_layer(from_fn_with_state(rate_limit, middleware::<R>))
}

async fn middleware<R: RateLimitService>(
    State(rate_limit): State<Arc<R>>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = ClientIp::of(&request);

    match rate_limit.acquire(client_ip.0).await {
        RateLimitDecision::Allow { .. } => next.run(request).await,
        RateLimitDecision::Deny { retry_after } => {
            debug!(%client_ip, ?retry_after, "rate limit exceeded");
            // round up so clients never retry before the window ends
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            (
                [(header::RETRY_AFTER, seconds.to_string())],
                error(StatusCode::TOO_MANY_REQUESTS, TOO_MANY_REQUESTS),
            )
                .into_response()
        }
    }
}
