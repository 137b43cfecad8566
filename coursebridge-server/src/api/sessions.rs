//! Class session handlers
//!
//! Session creation provisions the delivery-method resources inline:
//! video rooms are derived (no API call), chat channels go through the
//! provisioner seam, in-person sessions get neither. Each call inserts a
//! fresh row; nothing deduplicates repeated provisioning of the same
//! course and date.

use axum::{
    extract::{Query, State},
    Json,
};
use coursebridge_common::db::models::{ClassSession, DeliveryMethod};
use coursebridge_common::time::parse_date;
use serde::Deserialize;
use tracing::info;

use crate::db::courses;
use crate::db::sessions::{self, NewSession};
use crate::error::{ApiError, ApiResult};
use crate::services::rooms;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(alias = "courseId")]
    pub course_id: i64,
    #[serde(alias = "date")]
    pub session_date: String,
    pub start_time: String,
    pub end_time: String,
    pub delivery_method: String,
}

/// POST /api/sessions (admin)
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<Json<ClassSession>> {
    let method = DeliveryMethod::from_str(&req.delivery_method).ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown delivery method '{}'", req.delivery_method))
    })?;

    if parse_date(&req.session_date).is_none() {
        return Err(ApiError::BadRequest(format!(
            "Invalid session date '{}' (expected YYYY-MM-DD)",
            req.session_date
        )));
    }
    if req.start_time.trim().is_empty() || req.end_time.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "start_time and end_time are required".to_string(),
        ));
    }

    let course = courses::get_course(&state.db, req.course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Course {}", req.course_id)))?;

    let (video_room_id, chat_channel_id, chat_invite_link) = match method {
        DeliveryMethod::Video => {
            let room_id =
                rooms::video_room_id(&state.video.room_prefix, course.id, &req.session_date);
            (Some(room_id), None, None)
        }
        DeliveryMethod::Chat => {
            let name = rooms::channel_name(&course.title, &req.session_date);
            let channel = state
                .chat
                .provision_channel(&name)
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            (None, Some(channel.channel_id), Some(channel.invite_link))
        }
        DeliveryMethod::InPerson => (None, None, None),
    };

    let session = sessions::insert_session(
        &state.db,
        &NewSession {
            course_id: course.id,
            session_date: req.session_date,
            start_time: req.start_time,
            end_time: req.end_time,
            delivery_method: method,
            video_room_id,
            chat_channel_id,
            chat_invite_link,
        },
    )
    .await?;

    info!(
        session_id = session.id,
        course_id = course.id,
        delivery_method = method.to_db_string(),
        "Created class session"
    );

    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    #[serde(alias = "courseId")]
    pub course_id: i64,
}

/// GET /api/sessions?course_id= (public; courseId accepted as an alias)
///
/// Unknown courses simply list as empty.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> ApiResult<Json<Vec<ClassSession>>> {
    let sessions = sessions::list_for_course(&state.db, query.course_id).await?;
    Ok(Json(sessions))
}
