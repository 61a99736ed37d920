//! HTTP-level tests for document file attachments.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{body_bytes, body_json, create_user, data_row, get, send_file, DOCUMENT_CONTROL, WORKER};
use doctrack_core::spreadsheet::writer::render_workbook;
use doctrack_db::models::document::Document;
use doctrack_db::repositories::DocumentRepo;
use doctrack_storage::MemoryBlobStore;
use sqlx::PgPool;

/// Imports a single ME document (extension pdf). Returns it with a control token.
async fn seeded_document(pool: &PgPool) -> (Document, String) {
    let project_id = common::seed_project(pool).await;
    let control = create_user(pool, "control@example.com", DOCUMENT_CONTROL, None).await;
    let bytes = render_workbook(&[data_row("ME", 1)]).unwrap();
    let app = common::build_test_app(pool.clone());
    let response = send_file(
        app,
        Method::POST,
        &format!("/api/v1/projects/{project_id}/documents/import"),
        Some(&control),
        "documentos.xlsx",
        &bytes,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = DocumentRepo::list_by_project(pool, project_id).await.unwrap().remove(0);
    (doc, control)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upload_then_download(pool: PgPool) {
    let (doc, control) = seeded_document(&pool).await;
    let blobs = MemoryBlobStore::new();
    let path = format!("/api/v1/documents/{}/file", doc.id);

    let app = common::build_test_app_with_blobs(pool.clone(), blobs.clone());
    let json = body_json(get(app, &format!("{path}/exists"), Some(&control)).await).await;
    assert_eq!(json["data"]["exists"], false);

    let app = common::build_test_app_with_blobs(pool.clone(), blobs.clone());
    let response = send_file(app, Method::PUT, &path, Some(&control), "plano.PDF", b"%PDF-1.7").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["filename"], "LLL-PTA1-C100-ME-PL-1.pdf");
    assert_eq!(json["data"]["size"], 8);

    let app = common::build_test_app_with_blobs(pool.clone(), blobs.clone());
    let json = body_json(get(app, &format!("{path}/exists"), Some(&control)).await).await;
    assert_eq!(json["data"]["exists"], true);

    let app = common::build_test_app_with_blobs(pool, blobs);
    let response = get(app, &path, Some(&control)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"LLL-PTA1-C100-ME-PL-1.pdf\""
    );
    assert_eq!(body_bytes(response).await, b"%PDF-1.7");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_extension_is_rejected(pool: PgPool) {
    let (doc, control) = seeded_document(&pool).await;
    let blobs = MemoryBlobStore::new();

    let app = common::build_test_app_with_blobs(pool, blobs.clone());
    let response = send_file(
        app,
        Method::PUT,
        &format!("/api/v1/documents/{}/file", doc.id),
        Some(&control),
        "plano.dwg",
        b"AC1032",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(blobs.is_empty().await);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn emitted_document_rejects_upload(pool: PgPool) {
    let (doc, control) = seeded_document(&pool).await;
    DocumentRepo::set_emission(&pool, doc.id, None, Some("R-7")).await.unwrap();

    let app = common::build_test_app(pool);
    let response = send_file(
        app,
        Method::PUT,
        &format!("/api/v1/documents/{}/file", doc.id),
        Some(&control),
        "plano.pdf",
        b"%PDF",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_file_returns_404(pool: PgPool) {
    let (doc, control) = seeded_document(&pool).await;
    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/documents/{}/file", doc.id), Some(&control)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "FILE_NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn other_discipline_cannot_download(pool: PgPool) {
    let (doc, _) = seeded_document(&pool).await;
    let worker = create_user(&pool, "el@example.com", WORKER, Some("EL")).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/documents/{}/file", doc.id), Some(&worker)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
