//! Notification feed limits and read-mark input cleanup.

use crate::types::DbId;

pub const DEFAULT_FEED_LIMIT: i64 = 30;
pub const MAX_FEED_LIMIT: i64 = 100;

/// Clamp a requested feed size into `1..=MAX_FEED_LIMIT`.
pub fn clamp_feed_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT)
}

/// Drop non-positive and repeated ids, keeping first-seen order.
pub fn dedupe_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut out: Vec<DbId> = Vec::with_capacity(ids.len());
    for &id in ids {
        if id > 0 && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
