use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::models::auth::Role;
use crate::state::AppState;
use crate::utils::jwt::{self, Claims};

/// Authenticated caller extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require a valid token. A missing
/// header or token is rejected with 401, a token that fails verification
/// with 403. Role checks happen via `require_role()` in the handler body.
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    /// Returns `Ok(())` if the caller holds the given role, `Err(PermissionDenied)` otherwise.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.claims.role == role {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

/// Pull the token out of a `Bearer <token>` header value. The scheme is
/// matched case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AppError::TokenMissing)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Token rejected: {e}");
            AppError::TokenInvalid
        })?;

        Ok(AuthUser { claims })
    }
}
