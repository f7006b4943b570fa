#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use relay_api_rest::{AllowedOrigins, RestServer, RestServerConfig};
use relay_core_contact_contracts::ContactFeatureService;
use relay_core_health_contracts::HealthFeatureService;
use relay_shared_contracts::rate_limit::RateLimitService;
use serde_json::Value;
use tower::ServiceExt;

pub const ORIGIN: &str = "https://example.com";
pub const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));

pub fn router(
    health: impl HealthFeatureService,
    contact: impl ContactFeatureService,
    rate_limit: impl RateLimitService,
) -> Router {
    let config = RestServerConfig {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        allowed_origins: Arc::new(AllowedOrigins::parse(&format!(
            "{ORIGIN}, https://www.example.com"
        ))),
        real_ip_config: None,
    };
    RestServer::new(health, contact, rate_limit, config).router()
}

pub fn request(
    method: &str,
    uri: &str,
    origin: Option<&str>,
    body: Option<String>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }

    let mut request = builder.body(body.map(Body::from).unwrap_or_default()).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::new(CLIENT, 4242)));
    request
}

pub fn contact_request(origin: Option<&str>, body: &Value) -> Request<Body> {
    request("POST", "/api/contact", origin, Some(body.to_string()))
}

pub async fn call(router: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, headers, body)
}
