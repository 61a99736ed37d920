//! Client model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use doctrack_core::types::{DbId, Timestamp};

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub name: String,
}
