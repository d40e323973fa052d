use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Upper bound on pooled storage connections.
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub participant_ttl_hours: i64,
    pub organizer_ttl_hours: i64,
    pub admin_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Directory identity documents are written to.
    pub dir: PathBuf,
    /// Maximum accepted document size in bytes.
    pub max_size: usize,
    /// Accepted file extensions, also matched against the declared MIME subtype.
    pub allowed_types: Vec<String>,
}

/// Optional bootstrap admin account created on startup.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminBootstrapConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub upload: UploadConfig,
    #[serde(default)]
    pub admin: AdminBootstrapConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.max_connections", 10)?
            .set_default("auth.participant_ttl_hours", 9)?
            .set_default("auth.organizer_ttl_hours", 1)?
            .set_default("auth.admin_ttl_hours", 6)?
            .set_default("upload.dir", "uploads")?
            .set_default("upload.max_size", 5 * 1024 * 1024)?
            .set_default("upload.allowed_types", vec!["jpeg", "jpg", "png", "pdf"])?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., EVENTGATE__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("EVENTGATE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .with_list_parse_key("upload.allowed_types")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set (EVENTGATE__AUTH__JWT_SECRET)".into(),
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "database.url must be set (EVENTGATE__DATABASE__URL)".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be at least 1".into(),
            ));
        }
        if self.upload.allowed_types.is_empty() {
            return Err(ConfigError::Message(
                "upload.allowed_types must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl AuthConfig {
    /// Token lifetime for the given role.
    pub fn ttl_for(&self, role: crate::models::auth::Role) -> chrono::Duration {
        use crate::models::auth::Role;

        let hours = match role {
            Role::Participant => self.participant_ttl_hours,
            Role::Organizer => self.organizer_ttl_hours,
            Role::Admin => self.admin_ttl_hours,
        };
        chrono::Duration::hours(hours)
    }
}
