use std::net::SocketAddr;

use anyhow::Context;
use tracing::{Level, info};

use eventgate_server::config::AppConfig;
use eventgate_server::state::AppState;
use eventgate_server::utils::upload::DocumentStore;
use eventgate_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Database ready"
    );

    seed::ensure_admin(&db, &config.admin)
        .await
        .context("Failed to provision bootstrap admin")?;

    let documents = DocumentStore::new(config.upload.dir.clone(), config.upload.max_size)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.upload.dir.display()
            )
        })?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;

    let app = build_router(AppState {
        db,
        config,
        documents,
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
