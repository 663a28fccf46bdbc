//! Health checks, request IDs, CORS and fallback routing.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};

use shoply_integration_tests::TestApp;
use shoply_storefront::middleware::REQUEST_ID_HEADER;

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let resp = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.text, "ok");

    let resp = app.request(Method::GET, "/health/ready", None, None).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app.request(Method::GET, "/", None, None).await;
    assert_eq!(resp.text, "App is Working");
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = TestApp::new();

    let resp = app.request(Method::GET, "/api/orders", None, None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), Some("Route not found"));
}

#[tokio::test]
async fn test_request_id_is_generated_or_propagated() {
    let app = TestApp::new();

    let resp = app.request(Method::GET, "/health", None, None).await;
    let generated = resp.headers.get(REQUEST_ID_HEADER).unwrap();
    assert!(!generated.is_empty());

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "edge-1234")
        .body(Body::empty())
        .unwrap();
    let resp = app.send(request).await;
    assert_eq!(resp.headers.get(REQUEST_ID_HEADER).unwrap(), "edge-1234");
}

#[tokio::test]
async fn test_cors_preflight_for_allowed_origin() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/cart")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let resp = app.send(request).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        resp.headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let app = TestApp::new();

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let resp = app.send(request).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(
        resp.headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
