use axum::Json;
use tracing::instrument;

use crate::error::ErrorBody;
use crate::extractors::auth::AuthUser;
use crate::models::auth::ProtectedResponse;

#[utoipa::path(
    get,
    path = "/protected",
    tag = "Protected",
    operation_id = "getProtected",
    summary = "Example resource gated by a bearer token",
    description = "Any valid token is accepted regardless of role. Echoes the decoded claims.",
    responses(
        (status = 200, description = "Token accepted", body = ProtectedResponse),
        (status = 401, description = "No token (TOKEN_MISSING)", body = ErrorBody),
        (status = 403, description = "Invalid or expired token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.claims.id, role = %auth_user.claims.role))]
pub async fn protected(auth_user: AuthUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "This is a protected route".into(),
        user: auth_user.claims,
    })
}
