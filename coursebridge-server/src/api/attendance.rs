//! Attendance selection and breakdown handlers
//!
//! Selection is an upsert: one row per (session, user), overwritten on
//! re-selection. The confirmation notification fires only after the
//! upsert commits, and nothing after that commit can fail the request.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use coursebridge_common::db::models::{AttendanceMode, SessionAttendance};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::attendance::{self, AttendanceBreakdown};
use crate::db::{courses, profiles, sessions};
use crate::error::{ApiError, ApiResult};
use crate::services::auth::AuthUser;
use crate::services::notify::{self, DeliveryOutcome};
use crate::services::rooms;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectAttendanceRequest {
    pub mode: String,
}

#[derive(Debug, Serialize)]
pub struct SelectAttendanceResponse {
    pub attendance: SessionAttendance,
    pub notification: DeliveryOutcome,
}

/// POST /api/sessions/:id/attendance (authenticated)
pub async fn select_attendance_mode(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(session_id): Path<i64>,
    Json(req): Json<SelectAttendanceRequest>,
) -> ApiResult<Json<SelectAttendanceResponse>> {
    let mode = AttendanceMode::from_str(&req.mode)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown attendance mode '{}'", req.mode)))?;

    let session = sessions::get_session(&state.db, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))?;

    let user_id = user.id.to_string();
    let attendance = attendance::upsert_attendance(&state.db, session_id, &user_id, mode).await?;

    info!(
        session_id,
        user_id = %user_id,
        mode = mode.to_db_string(),
        "Attendance mode recorded"
    );

    // The selection is committed; everything below is best-effort
    let join_link = match mode {
        AttendanceMode::Video => session
            .video_room_id
            .as_deref()
            .map(|room_id| rooms::video_room_url(&state.video.base_url, room_id)),
        AttendanceMode::Chat => session.chat_invite_link.clone(),
        AttendanceMode::InPerson => None,
    };

    let course_title = courses::get_course(&state.db, session.course_id)
        .await
        .ok()
        .flatten()
        .map(|course| course.title)
        .unwrap_or_else(|| "your course".to_string());

    let destination = profiles::get_profile(&state.db, &user_id)
        .await
        .ok()
        .flatten()
        .and_then(|profile| profile.phone)
        .or(user.phone);

    let message = notify::compose_attendance_message(
        &course_title,
        &session.session_date,
        &session.start_time,
        &session.end_time,
        mode.display_name(),
        join_link.as_deref(),
    );

    let notification = state
        .notifier
        .notify(
            &state.db,
            &user_id,
            Some(session.course_id),
            destination.as_deref(),
            &message,
        )
        .await;

    Ok(Json(SelectAttendanceResponse {
        attendance,
        notification,
    }))
}

/// GET /api/sessions/:id/attendance (authenticated)
pub async fn session_attendance_breakdown(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> ApiResult<Json<AttendanceBreakdown>> {
    sessions::get_session(&state.db, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))?;

    let breakdown = attendance::session_breakdown(&state.db, session_id).await?;
    Ok(Json(breakdown))
}
