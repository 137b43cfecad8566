//! Enrollment handler
//!
//! The single write path for seats. Checks run in a fixed order (course
//! exists, capacity, duplicate), then contact details are captured
//! best-effort, then the seat reservation and enrollment insert commit
//! atomically. The counter increment carries its own capacity condition,
//! so two concurrent requests for the last seat cannot both win: the
//! earlier fast-path check only provides a friendlier error.

use axum::{extract::State, Extension, Json};
use coursebridge_common::db::models::Enrollment;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::profiles::{self, ProfileUpdate};
use crate::db::{courses, enrollments};
use crate::error::{ApiError, ApiResult};
use crate::services::auth::AuthUser;
use crate::services::notify::{self, DeliveryOutcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    #[serde(alias = "courseId")]
    pub course_id: i64,

    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub special_needs: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnrollResponse {
    pub enrollment: Enrollment,
    pub notification: DeliveryOutcome,
}

/// POST /api/enroll (authenticated)
pub async fn enroll(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<EnrollRequest>,
) -> ApiResult<Json<EnrollResponse>> {
    let user_id = user.id.to_string();

    let course = courses::get_course(&state.db, req.course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course {}", req.course_id)))?;

    if course.enrolled_students >= course.max_students {
        return Err(ApiError::BadRequest("Course is full".to_string()));
    }

    if enrollments::has_active_enrollment(&state.db, &user_id, course.id).await? {
        return Err(ApiError::BadRequest(
            "Already enrolled in this course".to_string(),
        ));
    }

    // Contact details ride along with the enrollment; losing them must
    // not lose the seat
    let profile_update = ProfileUpdate {
        full_name: req.full_name.clone(),
        phone: req.phone.clone(),
        emergency_contact: req.emergency_contact.clone(),
        special_needs: req.special_needs.clone(),
    };
    if let Err(e) = profiles::upsert_profile(&state.db, &user_id, &profile_update).await {
        warn!(user_id = %user_id, error = %e, "Profile update failed during enrollment");
    }

    let enrollment = enrollments::create_confirmed_enrollment(&state.db, &user_id, course.id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Course is full".to_string()))?;

    info!(
        user_id = %user_id,
        course_id = course.id,
        enrollment_id = enrollment.id,
        "Enrollment confirmed"
    );

    let destination = req.phone.or(user.phone);
    let message = notify::compose_enrollment_message(&course);
    let notification = state
        .notifier
        .notify(
            &state.db,
            &user_id,
            Some(course.id),
            destination.as_deref(),
            &message,
        )
        .await;

    Ok(Json(EnrollResponse {
        enrollment,
        notification,
    }))
}
