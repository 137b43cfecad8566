//! Class session database operations

use coursebridge_common::db::models::{ClassSession, DeliveryMethod};
use coursebridge_common::time::now_rfc3339;
use coursebridge_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Fields persisted for a newly provisioned session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub course_id: i64,
    pub session_date: String,
    pub start_time: String,
    pub end_time: String,
    pub delivery_method: DeliveryMethod,
    pub video_room_id: Option<String>,
    pub chat_channel_id: Option<String>,
    pub chat_invite_link: Option<String>,
}

fn session_from_row(row: &SqliteRow) -> Result<ClassSession> {
    let method: String = row.get("delivery_method");
    let delivery_method = DeliveryMethod::from_str(&method)
        .ok_or_else(|| Error::Internal(format!("Unknown delivery method '{}'", method)))?;

    Ok(ClassSession {
        id: row.get("id"),
        course_id: row.get("course_id"),
        session_date: row.get("session_date"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        delivery_method,
        video_room_id: row.get("video_room_id"),
        chat_channel_id: row.get("chat_channel_id"),
        chat_invite_link: row.get("chat_invite_link"),
        created_at: row.get("created_at"),
    })
}

/// Insert one session row. Always inserts; callers provisioning the same
/// course and date twice get two distinct sessions.
pub async fn insert_session(pool: &SqlitePool, new: &NewSession) -> Result<ClassSession> {
    let now = now_rfc3339();
    let method = new.delivery_method.to_db_string();

    let result = sqlx::query(
        r#"
        INSERT INTO class_sessions (
            course_id, session_date, start_time, end_time, delivery_method,
            video_room_id, chat_channel_id, chat_invite_link, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.course_id)
    .bind(&new.session_date)
    .bind(&new.start_time)
    .bind(&new.end_time)
    .bind(method)
    .bind(&new.video_room_id)
    .bind(&new.chat_channel_id)
    .bind(&new.chat_invite_link)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(ClassSession {
        id: result.last_insert_rowid(),
        course_id: new.course_id,
        session_date: new.session_date.clone(),
        start_time: new.start_time.clone(),
        end_time: new.end_time.clone(),
        delivery_method: new.delivery_method,
        video_room_id: new.video_room_id.clone(),
        chat_channel_id: new.chat_channel_id.clone(),
        chat_invite_link: new.chat_invite_link.clone(),
        created_at: now,
    })
}

/// Fetch one session by id
pub async fn get_session(pool: &SqlitePool, id: i64) -> Result<Option<ClassSession>> {
    let row = sqlx::query(
        r#"
        SELECT id, course_id, session_date, start_time, end_time,
               delivery_method, video_room_id, chat_channel_id,
               chat_invite_link, created_at
        FROM class_sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| session_from_row(&row)).transpose()
}

/// List a course's sessions in calendar order
pub async fn list_for_course(pool: &SqlitePool, course_id: i64) -> Result<Vec<ClassSession>> {
    let rows = sqlx::query(
        r#"
        SELECT id, course_id, session_date, start_time, end_time,
               delivery_method, video_room_id, chat_channel_id,
               chat_invite_link, created_at
        FROM class_sessions
        WHERE course_id = ?
        ORDER BY session_date, start_time
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(session_from_row).collect()
}
