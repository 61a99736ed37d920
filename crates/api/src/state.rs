use std::sync::Arc;

use doctrack_storage::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else sits
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: doctrack_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Attachment storage.
    pub blobs: Arc<dyn BlobStore>,
}
