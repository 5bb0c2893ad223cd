//! Application setup and initialization
//!
//! Initialization logic lives here instead of main.rs so the pieces stay
//! testable and the binary stays thin.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use cliphost_core::Config;
use cliphost_db::{PostgresChannelRepository, PostgresUserRepository, PostgresVideoRepository};
use cliphost_storage::create_media_store;

use crate::services::IngestionService;
use crate::state::{AppState, DbState, MediaState};

/// Initialize the entire application: config validation, telemetry,
/// database, media store, state, and routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!(
        environment = %config.environment(),
        media_backend = %config.media_backend(),
        "Configuration loaded and validated"
    );

    let pool = database::setup_database(&config).await?;

    let media_store = create_media_store(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize media store: {}", e))?;

    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let channels = Arc::new(PostgresChannelRepository::new(pool.clone()));
    let videos = Arc::new(PostgresVideoRepository::new(pool));

    let ingestion = IngestionService::new(channels.clone(), videos.clone(), media_store);

    let state = Arc::new(AppState {
        db: DbState {
            users,
            channels,
            videos,
        },
        media: MediaState {
            max_video_size_bytes: config.max_video_size_bytes(),
            max_image_size_bytes: config.max_image_size_bytes(),
        },
        ingestion,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
