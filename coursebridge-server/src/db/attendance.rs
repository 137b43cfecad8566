//! Session attendance database operations
//!
//! One row per (session, user) pair holding the current mode selection.
//! Re-selection overwrites in place; no history is kept.

use coursebridge_common::db::models::{AttendanceMode, SessionAttendance};
use coursebridge_common::time::now_rfc3339;
use coursebridge_common::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// Per-mode headcount for one session
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AttendanceBreakdown {
    pub in_person: i64,
    pub video: i64,
    pub chat: i64,
    pub total: i64,
}

/// Record or replace the user's attendance mode for a session.
/// Last write wins on repeated selections.
pub async fn upsert_attendance(
    pool: &SqlitePool,
    session_id: i64,
    user_id: &str,
    mode: AttendanceMode,
) -> Result<SessionAttendance> {
    let joined_at = now_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO session_attendance (session_id, user_id, attendance_mode, joined_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(session_id, user_id) DO UPDATE SET
            attendance_mode = excluded.attendance_mode,
            joined_at = excluded.joined_at
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .bind(mode.to_db_string())
    .bind(&joined_at)
    .execute(pool)
    .await?;

    Ok(SessionAttendance {
        session_id,
        user_id: user_id.to_string(),
        attendance_mode: mode,
        joined_at,
    })
}

/// Count current selections per mode for one session.
/// Recomputed from the table on every call.
pub async fn session_breakdown(pool: &SqlitePool, session_id: i64) -> Result<AttendanceBreakdown> {
    let rows = sqlx::query(
        r#"
        SELECT attendance_mode, COUNT(*) AS cnt
        FROM session_attendance
        WHERE session_id = ?
        GROUP BY attendance_mode
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    let mut breakdown = AttendanceBreakdown::default();
    for row in rows {
        let mode: String = row.get("attendance_mode");
        let count: i64 = row.get("cnt");
        match AttendanceMode::from_str(&mode) {
            Some(AttendanceMode::InPerson) => breakdown.in_person = count,
            Some(AttendanceMode::Video) => breakdown.video = count,
            Some(AttendanceMode::Chat) => breakdown.chat = count,
            None => {}
        }
        breakdown.total += count;
    }

    Ok(breakdown)
}
