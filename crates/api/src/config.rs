use doctrack_storage::{S3Settings, DEFAULT_BUCKET};

use crate::auth::jwt::JwtConfig;

/// Default upload ceiling for spreadsheets and attachments (25 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Maximum request body size in bytes.
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
    pub storage: S3Settings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `MAX_UPLOAD_BYTES`        | `26214400`                 |
    /// | `STORAGE_BUCKET`          | `documentos_ingenieria`    |
    /// | `STORAGE_ENDPOINT`        | unset (AWS)                |
    /// | `STORAGE_REGION`          | `us-east-1`                |
    /// | `STORAGE_ACCESS_KEY_ID`   | unset (default chain)      |
    /// | `STORAGE_SECRET_ACCESS_KEY` | unset (default chain)    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let storage = S3Settings {
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.into()),
            endpoint: non_empty_var("STORAGE_ENDPOINT"),
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".into()),
            access_key_id: non_empty_var("STORAGE_ACCESS_KEY_ID"),
            secret_access_key: non_empty_var("STORAGE_SECRET_ACCESS_KEY"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            max_upload_bytes,
            jwt: JwtConfig::from_env(),
            storage,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
