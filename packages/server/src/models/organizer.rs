use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::organizer::{self, OrganizerStatus};

/// Organizer as shown to admins during moderation.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "O Rganizer")]
    pub full_name: String,
    #[schema(example = "o@b.com")]
    pub email: String,
    #[schema(example = "1234567890")]
    pub phone: String,
    #[schema(example = "ID-123")]
    pub id_number: String,
    #[schema(example = "uploads/1760600000000.pdf")]
    pub id_document_path: String,
    pub portfolio_link: Option<String>,
    pub status: OrganizerStatus,
    pub created_at: DateTime<Utc>,
}

impl From<organizer::Model> for OrganizerResponse {
    fn from(model: organizer::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            id_number: model.id_number,
            id_document_path: model.id_document_path,
            portfolio_link: model.portfolio_link,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct OrganizerListResponse {
    pub organizers: Vec<OrganizerResponse>,
    pub total: u64,
}

/// Optional filter for the moderation list.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct OrganizerListQuery {
    /// Only return organizers in this state.
    pub status: Option<OrganizerStatus>,
}

/// Request body for changing an organizer's moderation state.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateOrganizerStatusRequest {
    pub status: OrganizerStatus,
}
