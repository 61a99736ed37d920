//! Repository for `notifications` and the per-user `notification_reads`.

use sqlx::PgPool;
use doctrack_core::types::DbId;

use crate::models::notification::{CreateNotification, NotificationWithSeen};

pub struct NotificationRepo;

impl NotificationRepo {
    /// Publish a notification, returning the generated ID.
    pub async fn create(pool: &PgPool, input: &CreateNotification) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications (title, body, link) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.link)
        .fetch_one(pool)
        .await
    }

    /// Latest `limit` notifications, newest first, flagged `seen` for `user_id`.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<NotificationWithSeen>, sqlx::Error> {
        sqlx::query_as::<_, NotificationWithSeen>(
            "SELECT n.id, n.title, n.body, n.link, n.created_at, \
                    (r.id IS NOT NULL) AS seen \
             FROM notifications n \
             LEFT JOIN notification_reads r \
                ON r.notification_id = n.id AND r.user_id = $1 \
             ORDER BY n.created_at DESC, n.id DESC \
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Number of notifications `user_id` has not seen.
    pub async fn unseen_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications n \
             WHERE NOT EXISTS ( \
                SELECT 1 FROM notification_reads r \
                WHERE r.notification_id = n.id AND r.user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Record read marks for `notification_ids`. Unknown ids and marks that
    /// already exist are skipped.
    ///
    /// Returns the number of marks created.
    pub async fn mark_seen(
        pool: &PgPool,
        user_id: DbId,
        notification_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if notification_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO notification_reads (notification_id, user_id) \
             SELECT n.id, $1 FROM notifications n WHERE n.id = ANY($2) \
             ON CONFLICT (notification_id, user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(notification_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
