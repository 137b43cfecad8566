//! Notification log database operations
//!
//! The notifications table is append-only. Every delivery attempt inserts
//! exactly one row with its final status; rows are never updated.

use coursebridge_common::db::models::{ChannelKind, NotificationStatus};
use coursebridge_common::time::now_rfc3339;
use coursebridge_common::Result;
use sqlx::SqlitePool;

/// Record one delivery attempt. Returns the new row id.
pub async fn record_attempt(
    pool: &SqlitePool,
    user_id: &str,
    course_id: Option<i64>,
    channel: ChannelKind,
    message: &str,
    status: NotificationStatus,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO notifications (user_id, course_id, channel, message, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .bind(channel.to_db_string())
    .bind(message)
    .bind(status.to_db_string())
    .bind(now_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}
