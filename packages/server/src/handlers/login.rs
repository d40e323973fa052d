use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{admin, organizer, participant};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::auth::{AdminLoginResponse, LoginRequest, LoginResponse, Role};
use crate::state::AppState;
use crate::utils::{hash, jwt};

/// Compare a submitted password with the stored hash. A mismatch is the
/// same `InvalidCredentials` an unknown email produces.
async fn check_password(password: &str, stored: String) -> Result<(), AppError> {
    let is_valid = hash::verify_password_blocking(password.to_owned(), stored)
        .await
        .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;

    if is_valid {
        Ok(())
    } else {
        Err(AppError::InvalidCredentials)
    }
}

fn issue_token(state: &AppState, id: i32, email: &str, role: Role) -> Result<String, AppError> {
    let auth = &state.config.auth;
    jwt::sign(id, email, role, auth.ttl_for(role), &auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))
}

#[utoipa::path(
    post,
    path = "/login-participant",
    tag = "Login",
    operation_id = "loginParticipant",
    summary = "Log in as a participant",
    description = "Returns a bearer token valid for 9 hours by default. Unknown email and wrong \
        password produce the same 401.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 500, description = "Server error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login_participant(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = payload.credentials().ok_or(AppError::InvalidCredentials)?;

    let user = participant::Entity::find()
        .filter(participant::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    check_password(password, user.password).await?;

    let token = issue_token(&state, user.id, &user.email, Role::Participant)?;

    Ok(Json(LoginResponse {
        token,
        id: user.id,
        email: user.email,
        role: Role::Participant,
    }))
}

#[utoipa::path(
    post,
    path = "/login-organizer",
    tag = "Login",
    operation_id = "loginOrganizer",
    summary = "Log in as an organizer",
    description = "Returns a bearer token valid for 1 hour by default. Accounts that are not \
        approved get 403 before the password is checked.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 403, description = "Account pending or suspended (ACCOUNT_NOT_APPROVED)", body = ErrorBody),
        (status = 500, description = "Server error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login_organizer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = payload.credentials().ok_or(AppError::InvalidCredentials)?;

    let user = organizer::Entity::find()
        .filter(organizer::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !user.status.can_login() {
        return Err(AppError::AccountNotApproved);
    }

    check_password(password, user.password).await?;

    let token = issue_token(&state, user.id, &user.email, Role::Organizer)?;

    Ok(Json(LoginResponse {
        token,
        id: user.id,
        email: user.email,
        role: Role::Organizer,
    }))
}

#[utoipa::path(
    post,
    path = "/login-admin",
    tag = "Login",
    operation_id = "loginAdmin",
    summary = "Log in as an admin",
    description = "Returns a bearer token valid for 6 hours by default. Admin passwords are \
        hashed like every other role.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminLoginResponse),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 500, description = "Server error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login_admin(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    let (email, password) = payload.credentials().ok_or(AppError::InvalidCredentials)?;

    let user = admin::Entity::find()
        .filter(admin::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    check_password(password, user.password).await?;

    let token = issue_token(&state, user.id, &user.email, Role::Admin)?;

    Ok(Json(AdminLoginResponse {
        token,
        role: Role::Admin,
    }))
}
