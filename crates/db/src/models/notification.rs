//! Notification models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use doctrack_core::types::{DbId, Timestamp};

/// A notification row flagged with whether the requesting user has seen it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationWithSeen {
    pub id: DbId,
    pub title: String,
    pub body: Option<String>,
    pub link: Option<String>,
    pub created_at: Timestamp,
    pub seen: bool,
}

/// DTO for publishing a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    pub title: String,
    pub body: Option<String>,
    pub link: Option<String>,
}
