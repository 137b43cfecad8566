//! Partner institution handlers
//!
//! Applications arrive on the public surface; review lives behind the
//! admin middleware. Decisions overwrite status in place and removal is
//! a physical delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use coursebridge_common::db::models::{Partnership, PartnershipStatus};
use serde::Deserialize;
use tracing::info;

use crate::db::partnerships::{self, NewPartnership};
use crate::error::{ApiError, ApiResult};
use crate::services::auth::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PartnershipRequest {
    pub organization_name: String,
    pub contact_name: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub selected_courses: Vec<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// POST /api/partnerships (public)
pub async fn submit_partnership(
    State(state): State<AppState>,
    Json(req): Json<PartnershipRequest>,
) -> ApiResult<Json<Partnership>> {
    let required = [
        ("organization_name", &req.organization_name),
        ("contact_name", &req.contact_name),
        ("contact_email", &req.contact_email),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("{} is required", field)));
        }
    }

    let partnership = partnerships::insert_partnership(
        &state.db,
        &NewPartnership {
            organization_name: req.organization_name,
            contact_name: req.contact_name,
            contact_email: req.contact_email,
            contact_phone: req.contact_phone,
            selected_courses: req.selected_courses,
            notes: req.notes,
        },
    )
    .await?;

    info!(
        partnership_id = partnership.id,
        organization = %partnership.organization_name,
        "Partnership application submitted"
    );

    Ok(Json(partnership))
}

#[derive(Debug, Deserialize)]
pub struct ListPartnershipsQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// GET /api/partnerships (admin), optional ?status= filter
pub async fn list_partnerships(
    State(state): State<AppState>,
    Query(query): Query<ListPartnershipsQuery>,
) -> ApiResult<Json<Vec<Partnership>>> {
    let status = match &query.status {
        Some(raw) => Some(
            PartnershipStatus::from_str(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown status '{}'", raw)))?,
        ),
        None => None,
    };

    let partnerships = partnerships::list_partnerships(&state.db, status).await?;
    Ok(Json(partnerships))
}

/// POST /api/partnerships/:id/approve (admin)
pub async fn approve_partnership(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Partnership>> {
    decide(&state, &admin, id, PartnershipStatus::Approved).await
}

/// POST /api/partnerships/:id/reject (admin)
pub async fn reject_partnership(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Partnership>> {
    decide(&state, &admin, id, PartnershipStatus::Rejected).await
}

async fn decide(
    state: &AppState,
    admin: &AuthUser,
    id: i64,
    status: PartnershipStatus,
) -> ApiResult<Json<Partnership>> {
    let partnership = partnerships::set_status(&state.db, id, status, &admin.id.to_string())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Partnership {}", id)))?;

    info!(
        partnership_id = id,
        status = status.to_db_string(),
        decided_by = %admin.id,
        "Partnership application decided"
    );

    Ok(Json(partnership))
}

/// DELETE /api/partnerships/:id (admin)
pub async fn delete_partnership(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = partnerships::delete_partnership(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Partnership {}", id)));
    }
    info!(partnership_id = id, "Partnership application deleted");
    Ok(StatusCode::NO_CONTENT)
}
