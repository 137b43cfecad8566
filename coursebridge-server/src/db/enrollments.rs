//! Enrollment database operations
//!
//! Seat accounting lives here: the confirmed-enrollment insert and the
//! course counter increment commit in one transaction, with the capacity
//! check folded into the UPDATE so concurrent requests cannot oversell
//! the final seat.

use coursebridge_common::db::models::{Enrollment, EnrollmentStatus};
use coursebridge_common::time::now_rfc3339;
use coursebridge_common::Result;
use sqlx::SqlitePool;

/// True when the user already holds a pending or confirmed enrollment
/// in the course. Cancelled enrollments do not block re-enrolling.
pub async fn has_active_enrollment(
    pool: &SqlitePool,
    user_id: &str,
    course_id: i64,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM enrollments
        WHERE user_id = ? AND course_id = ? AND status IN ('pending', 'confirmed')
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Reserve a seat and record the confirmed enrollment atomically.
///
/// The counter increment is conditional on remaining capacity, so under
/// concurrent requests exactly one caller wins the last seat. Returns
/// None when the course is already full.
pub async fn create_confirmed_enrollment(
    pool: &SqlitePool,
    user_id: &str,
    course_id: i64,
) -> Result<Option<Enrollment>> {
    let now = now_rfc3339();

    let mut tx = pool.begin().await?;

    let reserved = sqlx::query(
        r#"
        UPDATE courses
        SET enrolled_students = enrolled_students + 1, updated_at = ?
        WHERE id = ? AND enrolled_students < max_students
        "#,
    )
    .bind(&now)
    .bind(course_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if reserved == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO enrollments (user_id, course_id, status, created_at)
        VALUES (?, ?, 'confirmed', ?)
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    let id = result.last_insert_rowid();
    tx.commit().await?;

    Ok(Some(Enrollment {
        id,
        user_id: user_id.to_string(),
        course_id,
        status: EnrollmentStatus::Confirmed,
        created_at: now,
    }))
}
