use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::utils::upload::DocumentStore;

/// Shared, read-only context handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub documents: DocumentStore,
}
