//! Course catalog handlers
//!
//! Reads are public; create/update/delete sit behind the admin middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use coursebridge_common::db::models::Course;
use tracing::info;

use crate::db::courses::{self, CourseUpdate, NewCourse};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/courses
pub async fn list_courses(State(state): State<AppState>) -> ApiResult<Json<Vec<Course>>> {
    let courses = courses::list_courses(&state.db).await?;
    Ok(Json(courses))
}

/// GET /api/courses/:id
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Course>> {
    let course = courses::get_course(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course {}", id)))?;
    Ok(Json(course))
}

/// POST /api/courses (admin)
pub async fn create_course(
    State(state): State<AppState>,
    Json(new): Json<NewCourse>,
) -> ApiResult<Json<Course>> {
    if new.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    if new.max_students <= 0 {
        return Err(ApiError::BadRequest(
            "max_students must be greater than zero".to_string(),
        ));
    }

    let course = courses::insert_course(&state.db, &new).await?;
    info!(course_id = course.id, title = %course.title, "Created course");
    Ok(Json(course))
}

/// PUT /api/courses/:id (admin)
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<CourseUpdate>,
) -> ApiResult<Json<Course>> {
    if let Some(max_students) = update.max_students {
        if max_students <= 0 {
            return Err(ApiError::BadRequest(
                "max_students must be greater than zero".to_string(),
            ));
        }
    }
    if let Some(title) = &update.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("title cannot be empty".to_string()));
        }
    }

    let course = courses::update_course(&state.db, id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course {}", id)))?;
    Ok(Json(course))
}

/// DELETE /api/courses/:id (admin)
///
/// Enrollments and sessions cascade away with the course; the
/// notification log keeps its rows with the course reference cleared.
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = courses::delete_course(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Course {}", id)));
    }
    info!(course_id = id, "Deleted course");
    Ok(StatusCode::NO_CONTENT)
}
