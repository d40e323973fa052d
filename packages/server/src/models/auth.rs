use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::jwt::Claims;

/// Account kind carried in the token's `type` claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Participant,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Organizer => "organizer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body shared by the three login endpoints.
///
/// Missing fields deserialize as empty and are rejected as invalid credentials.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "a@b.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "password1")]
    pub password: String,
}

impl LoginRequest {
    /// Normalized email, or `None` when either credential is blank.
    pub fn credentials(&self) -> Option<(String, &str)> {
        let email = crate::utils::validation::normalize_email(&self.email);
        if email.is_empty() || self.password.is_empty() {
            None
        } else {
            Some((email, self.password.as_str()))
        }
    }
}

/// Successful participant or organizer login.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "a@b.com")]
    pub email: String,
    #[serde(rename = "type")]
    pub role: Role,
}

/// Successful admin login. Identity is not echoed back.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminLoginResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[serde(rename = "type")]
    pub role: Role,
}

/// Body of the protected example resource.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProtectedResponse {
    #[schema(example = "This is a protected route")]
    pub message: String,
    /// Decoded claims of the caller's token.
    pub user: Claims,
}
