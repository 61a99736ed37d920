//! Root-level behaviour: health, unknown routes, request ids and CORS.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_json, get};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_database_and_bucket(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["bucket"], "documentos_ingenieria");
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/planos", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn every_response_carries_a_request_id(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let ok = get(app, "/health", None).await;
    let app = common::build_test_app(pool);
    let unauthorized = get(app, "/api/v1/projects", None).await;
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

    for response in [ok, unauthorized] {
        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert_eq!(id.map(|s| s.len()), Some(36), "x-request-id should be a UUID");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn preflight_allows_upload_from_front_end(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/projects/1/documents/import")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("POST"), "allowed methods: {methods}");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn content_disposition_is_exposed(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let exposed = response.headers()[header::ACCESS_CONTROL_EXPOSE_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(exposed.contains("content-disposition"));
}
