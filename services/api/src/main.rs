use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use media::{FfmpegTool, S3ObjectStore};
use tubely_api::{AppConfig, AppState, create_router, repositories::PgVideoRepository};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Tubely API service");

    let config = AppConfig::from_env()?;
    tokio::fs::create_dir_all(&config.assets_root).await?;
    tokio::fs::create_dir_all(config.staging_dir()).await?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    run_migrations(&pool).await?;

    let object_store = S3ObjectStore::new(config.s3_config()).await;
    let media_tool = FfmpegTool::new(config.media_tool_config());
    let port = config.port;

    let app_state = AppState::new(
        config,
        Arc::new(PgVideoRepository::new(pool)),
        Arc::new(object_store),
        Arc::new(media_tool),
    );

    // Start the web server
    let app = create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Tubely API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
