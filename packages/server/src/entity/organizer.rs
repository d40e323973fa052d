use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation state of an organizer account. Only `Approved` may log in.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum OrganizerStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

impl OrganizerStatus {
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organizer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub full_name: String,

    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,

    pub phone: String,
    pub id_number: String,
    /// Path of the stored identity document, relative to the working directory.
    pub id_document_path: String,
    pub portfolio_link: Option<String>,
    pub accepts_contract: bool,

    pub status: OrganizerStatus,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
