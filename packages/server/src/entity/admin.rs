use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin accounts are provisioned out-of-band; there is no signup route.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string, same as the other roles.
    #[serde(skip_serializing)]
    pub password: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
