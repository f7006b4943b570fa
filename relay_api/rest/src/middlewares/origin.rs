//! Restrict browser access to the configured origins

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::debug;

use crate::errors::error;

pub const NOT_ALLOWED_BY_CORS: &str = "Not allowed by CORS";

/// Origins permitted to call the api.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins(HashSet<String>);

impl AllowedOrigins {
    /// Parse a comma separated list of origins. Entries are trimmed and empty
    /// entries are ignored.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.0.contains(origin)
    }
}

impl<'a> FromIterator<&'a str> for AllowedOrigins {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Requests without an `Origin` header (curl, server to server) are always
/// allowed. Otherwise the origin must match an entry exactly.
pub fn is_allowed_origin(origin: Option<&str>, allowed_origins: &AllowedOrigins) -> bool {
    origin.map_or(true, |origin| allowed_origins.contains(origin))
}

pub fn add<S: Clone + Send + Sync + 'static>(
    allowed_origins: Arc<AllowedOrigins>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        let cors_origins = Arc::clone(&allowed_origins);
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _: &Parts| {
                    origin
                        .to_str()
                        .is_ok_and(|origin| cors_origins.contains(origin))
                },
            ))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(AllowHeaders::mirror_request());

        router
            .layer(cors)
            .layer(from_fn_with_state(allowed_origins, middleware))
    }
}

async fn middleware(
    State(allowed_origins): State<Arc<AllowedOrigins>>,
    request: Request,
    next: Next,
) -> Response {
    let allowed = match request.headers().get(header::ORIGIN) {
        None => true,
        Some(origin) => origin
            .to_str()
            .is_ok_and(|origin| is_allowed_origin(Some(origin), &allowed_origins)),
    };

    if !allowed {
        debug!(
            origin = ?request.headers().get(header::ORIGIN),
            "rejected request from foreign origin"
        );
        return error(StatusCode::FORBIDDEN, NOT_ALLOWED_BY_CORS);
    }

    next.run(request).await
}
