use pretty_assertions::assert_eq;
use relay_core_contact_contracts::MockContactFeatureService;
use relay_core_health_contracts::{HealthStatus, MockHealthFeatureService};
use relay_shared_contracts::rate_limit::MockRateLimitService;
use serde_json::json;

mod common;

#[tokio::test]
async fn healthy() {
    // Arrange
    let health = MockHealthFeatureService::new().with_get_status(HealthStatus { email: true });
    let router = common::router(
        health,
        MockContactFeatureService::new(),
        MockRateLimitService::new(),
    );

    // Act
    let request = common::request("GET", "/health", None, None);
    let (status, _, body) = common::call(router, request).await;

    // Assert
    assert_eq!(status, 200);
    assert_eq!(body, json!({"http": true, "email": true}));
}

#[tokio::test]
async fn relay_unreachable() {
    // Arrange
    let health = MockHealthFeatureService::new().with_get_status(HealthStatus { email: false });
    let router = common::router(
        health,
        MockContactFeatureService::new(),
        MockRateLimitService::new(),
    );

    // Act
    let request = common::request("GET", "/health", None, None);
    let (status, _, body) = common::call(router, request).await;

    // Assert
    assert_eq!(status, 500);
    assert_eq!(body, json!({"http": true, "email": false}));
}

#[tokio::test]
async fn request_id_header() {
    // Arrange
    let health = MockHealthFeatureService::new().with_get_status(HealthStatus { email: true });
    let router = common::router(
        health,
        MockContactFeatureService::new(),
        MockRateLimitService::new(),
    );

    // Act
    let (_, headers, _) = common::call(router, common::request("GET", "/health", None, None)).await;

    // Assert
    let request_id = headers.get("X-Request-Id").unwrap().to_str().unwrap();
    assert!(!request_id.is_empty());
}
