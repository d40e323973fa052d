use sea_orm::*;
use tracing::info;

use crate::config::AdminBootstrapConfig;
use crate::entity::admin;
use crate::utils::hash;
use crate::utils::validation::normalize_email;

/// Make sure the configured bootstrap admin exists.
///
/// Does nothing unless both `admin.email` and `admin.password` are set. An
/// existing row with that email is left untouched.
pub async fn ensure_admin(
    db: &DatabaseConnection,
    config: &AdminBootstrapConfig,
) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&config.email, &config.password) else {
        return Ok(());
    };
    let email = normalize_email(email);

    let existing = admin::Entity::find()
        .filter(admin::Column::Email.eq(&email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let hash = hash::hash_password_blocking(password.clone()).await?;

    let model = admin::ActiveModel {
        email: Set(email.clone()),
        password: Set(hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = admin::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(admin::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => info!(%email, "Provisioned bootstrap admin"),
        Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
