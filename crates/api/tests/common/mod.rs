#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use doctrack_api::auth::jwt::{sign_token, Claims, JwtConfig};
use doctrack_api::config::ServerConfig;
use doctrack_api::router::build_app_router;
use doctrack_api::state::AppState;
use doctrack_core::spreadsheet::{col, CellValue, COLUMN_COUNT};
use doctrack_db::models::lookup::CreateLookup;
use doctrack_db::models::project::CreateProject;
use doctrack_db::models::user::CreateUser;
use doctrack_db::repositories::{DisciplineRepo, DocumentTypeRepo, ProjectRepo, UserRepo};
use doctrack_storage::{MemoryBlobStore, S3Settings};

pub const ADMIN: &str = "Administrador";
pub const COORDINATOR: &str = "Coordinador";
pub const DOCUMENT_CONTROL: &str = "Control Documentacion";
pub const WORKER: &str = "Trabajador";

const MULTIPART_BOUNDARY: &str = "doctrack-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: None,
        },
        storage: S3Settings::default(),
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over `pool` and an in-memory blob store.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_blobs(pool, MemoryBlobStore::new())
}

pub fn build_test_app_with_blobs(pool: PgPool, blobs: MemoryBlobStore) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blobs: Arc::new(blobs),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// A bearer token for `email`, signed with the test secret.
pub fn token_for(email: &str) -> String {
    let claims = Claims {
        sub: format!("sub-{email}"),
        email: email.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        aud: None,
    };
    sign_token(&claims, &test_config().jwt).unwrap()
}

/// Register a user with `role_name` (and optionally a discipline code,
/// created if missing) and return a token for them.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    role_name: &str,
    discipline_code: Option<&str>,
) -> String {
    let role_id = UserRepo::role_id_by_name(pool, role_name).await.unwrap().unwrap();
    let discipline_id = match discipline_code {
        Some(code) => Some(discipline_id(pool, code).await),
        None => None,
    };
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            full_name: None,
            role_id,
            discipline_id,
        },
    )
    .await
    .unwrap();
    token_for(email)
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Id of the discipline with `code`, creating it if needed.
pub async fn discipline_id(pool: &PgPool, code: &str) -> i64 {
    let existing = DisciplineRepo::list(pool).await.unwrap();
    if let Some(d) = existing.iter().find(|d| d.code == code) {
        return d.id;
    }
    DisciplineRepo::create(pool, &CreateLookup { code: code.to_string(), description: None })
        .await
        .unwrap()
        .id
}

/// Disciplines ME and EL, document type PL, and a project with client code
/// C100 and internal code 4521. Returns the project id.
pub async fn seed_project(pool: &PgPool) -> i64 {
    discipline_id(pool, "ME").await;
    discipline_id(pool, "EL").await;
    DocumentTypeRepo::create(pool, &CreateLookup { code: "PL".into(), description: None })
        .await
        .unwrap();
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Planta Norte".into(),
            location: None,
            client_id: None,
            client_project_code: Some("C100".into()),
            internal_project_code: Some(4521),
            contract_number: None,
            contract_start_date: None,
            pem_date: None,
            hours_per_day: None,
            days_per_week: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// A valid spreadsheet data row for discipline `discipline`.
pub fn data_row(discipline: &str, seq: i32) -> Vec<CellValue> {
    let mut cells = vec![CellValue::Empty; COLUMN_COUNT];
    cells[col::SITE] = CellValue::text("LLL");
    cells[col::INSTALLATION] = CellValue::text("PTA1");
    cells[col::DISCIPLINE] = CellValue::text(discipline);
    cells[col::DOCUMENT_TYPE] = CellValue::text("PL");
    cells[col::SEQUENCE_NUMBER] = CellValue::Number(f64::from(seq));
    cells[col::FILE_EXTENSION] = CellValue::text("pdf");
    cells[col::INTERNAL_HOURS] = CellValue::Number(4.0);
    cells[col::EXTERNAL_HOURS] = CellValue::Number(2.0);
    cells[col::ACTION_TYPE] = CellValue::Number(1.0);
    cells[col::CLIENT_CODE] = CellValue::text("C100");
    cells[col::PROJECT_CODE] = CellValue::Number(4521.0);
    cells
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn request(method: Method, path: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(path);
    match token {
        Some(t) => builder.header(header::AUTHORIZATION, format!("Bearer {t}")),
        None => builder,
    }
}

pub async fn get(app: Router, path: &str, token: Option<&str>) -> Response<Body> {
    let req = request(Method::GET, path, token).body(Body::empty()).unwrap();
    app.oneshot(req).await.unwrap()
}

pub async fn delete(app: Router, path: &str, token: Option<&str>) -> Response<Body> {
    let req = request(Method::DELETE, path, token).body(Body::empty()).unwrap();
    app.oneshot(req).await.unwrap()
}

pub async fn send_json(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let req = request(method, path, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(req).await.unwrap()
}

/// Send `bytes` as the `file` field of a multipart body.
pub async fn send_file(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    file_name: &str,
    bytes: &[u8],
) -> Response<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let req = request(method, path, token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(req).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
