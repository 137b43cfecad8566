//! Course catalog database operations

use coursebridge_common::db::models::Course;
use coursebridge_common::time::now_rfc3339;
use coursebridge_common::{Error, Result};
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Fields accepted when creating a course
#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    pub max_students: i64,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub class_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// Partial course update; absent fields leave the stored value unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub max_students: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub class_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

const COURSE_COLUMNS: &str = "id, title, description, category, instructor, \
     max_students, enrolled_students, start_date, end_date, class_time, \
     location, duration, created_at, updated_at";

fn course_from_row(row: &SqliteRow) -> Course {
    Course {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        instructor: row.get("instructor"),
        max_students: row.get("max_students"),
        enrolled_students: row.get("enrolled_students"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        class_time: row.get("class_time"),
        location: row.get("location"),
        duration: row.get("duration"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Insert a new course with zero enrollments
pub async fn insert_course(pool: &SqlitePool, new: &NewCourse) -> Result<Course> {
    let now = now_rfc3339();

    let result = sqlx::query(
        r#"
        INSERT INTO courses (
            title, description, category, instructor, max_students,
            enrolled_students, start_date, end_date, class_time,
            location, duration, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.category)
    .bind(&new.instructor)
    .bind(new.max_students)
    .bind(&new.start_date)
    .bind(&new.end_date)
    .bind(&new.class_time)
    .bind(&new.location)
    .bind(&new.duration)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get_course(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Course {} missing after insert", id)))
}

/// Fetch one course by id
pub async fn get_course(pool: &SqlitePool, id: i64) -> Result<Option<Course>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM courses WHERE id = ?",
        COURSE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| course_from_row(&row)))
}

/// List the full course catalog, newest first
pub async fn list_courses(pool: &SqlitePool) -> Result<Vec<Course>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM courses ORDER BY id DESC",
        COURSE_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(course_from_row).collect())
}

/// Apply a partial update. Returns the updated course, or None when the
/// course does not exist.
pub async fn update_course(
    pool: &SqlitePool,
    id: i64,
    update: &CourseUpdate,
) -> Result<Option<Course>> {
    let now = now_rfc3339();

    let result = sqlx::query(
        r#"
        UPDATE courses SET
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            category = COALESCE(?, category),
            instructor = COALESCE(?, instructor),
            max_students = COALESCE(?, max_students),
            start_date = COALESCE(?, start_date),
            end_date = COALESCE(?, end_date),
            class_time = COALESCE(?, class_time),
            location = COALESCE(?, location),
            duration = COALESCE(?, duration),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&update.title)
    .bind(&update.description)
    .bind(&update.category)
    .bind(&update.instructor)
    .bind(update.max_students)
    .bind(&update.start_date)
    .bind(&update.end_date)
    .bind(&update.class_time)
    .bind(&update.location)
    .bind(&update.duration)
    .bind(&now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_course(pool, id).await
}

/// Delete a course. Enrollments and sessions cascade; notification history
/// is kept with its course reference cleared.
pub async fn delete_course(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
