use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::organizer;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::Role;
use crate::models::organizer::{
    OrganizerListQuery, OrganizerListResponse, OrganizerResponse, UpdateOrganizerStatusRequest,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/admin/organizers",
    tag = "Admin",
    operation_id = "listOrganizers",
    summary = "List organizers for moderation",
    description = "Returns organizers newest first, optionally filtered by status. Requires an admin token.",
    params(OrganizerListQuery),
    responses(
        (status = 200, description = "Organizer list", body = OrganizerListResponse),
        (status = 401, description = "No token (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token or not an admin (TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_organizers(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<OrganizerListQuery>,
) -> Result<Json<OrganizerListResponse>, AppError> {
    auth_user.require_role(Role::Admin)?;

    let mut select = organizer::Entity::find();
    if let Some(status) = query.status {
        select = select.filter(organizer::Column::Status.eq(status));
    }

    let organizers: Vec<OrganizerResponse> = select
        .order_by_desc(organizer::Column::CreatedAt)
        .order_by_desc(organizer::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(OrganizerResponse::from)
        .collect();

    Ok(Json(OrganizerListResponse {
        total: organizers.len() as u64,
        organizers,
    }))
}

#[utoipa::path(
    patch,
    path = "/admin/organizers/{id}/status",
    tag = "Admin",
    operation_id = "updateOrganizerStatus",
    summary = "Approve or suspend an organizer",
    description = "Sets the moderation state. Only `approved` organizers can log in. Requires an admin token.",
    params(("id" = i32, Path, description = "Organizer ID")),
    request_body = UpdateOrganizerStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrganizerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "No token (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid token or not an admin (TOKEN_INVALID, PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Organizer not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(organizer_id = id))]
pub async fn update_organizer_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateOrganizerStatusRequest>,
) -> Result<Json<OrganizerResponse>, AppError> {
    auth_user.require_role(Role::Admin)?;

    let existing = organizer::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organizer {id} not found")))?;

    let previous = existing.status;
    let mut active: organizer::ActiveModel = existing.into();
    active.status = Set(payload.status);
    let updated = active.update(&state.db).await?;

    info!(
        email = %updated.email,
        from = ?previous,
        to = ?updated.status,
        admin_id = auth_user.claims.id,
        "Organizer status changed"
    );

    Ok(Json(OrganizerResponse::from(updated)))
}
