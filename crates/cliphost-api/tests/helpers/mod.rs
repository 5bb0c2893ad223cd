//! Shared test harness: builds the application router over the in-memory
//! fakes, so integration tests exercise the full HTTP surface with no
//! database or media host behind it.

#![allow(dead_code)]

pub mod auth;

use std::sync::Arc;

use axum_test::TestServer;
use cliphost_api::constants::API_PREFIX;
use cliphost_api::services::IngestionService;
use cliphost_api::setup::routes::setup_routes;
use cliphost_api::state::{AppState, DbState, MediaState};
use cliphost_api::test_support::{
    InMemoryChannelRepository, InMemoryDb, InMemoryMediaStore, InMemoryUserRepository,
    InMemoryVideoRepository,
};
use cliphost_core::{Config, MediaBackend};

/// Signing secret shared by the test server and the token helpers.
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// A running test application plus handles to the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub db: InMemoryDb,
    pub store: InMemoryMediaStore,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Prefix a route with the versioned API mount point.
pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

fn test_config() -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        database_url: "postgresql://localhost/cliphost_test".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 5,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_hours: 24,
        media_backend: MediaBackend::Local,
        media_store_url: None,
        media_store_api_key: None,
        media_store_timeout_seconds: 5,
        local_media_path: Some("/tmp/cliphost-test-media".to_string()),
        local_media_base_url: Some("http://localhost/media".to_string()),
        max_video_size_bytes: 50 * 1024 * 1024,
        max_image_size_bytes: 5 * 1024 * 1024,
    }
}

/// Build the router over fresh fakes and wrap it in a test server.
pub fn setup_test_app() -> TestApp {
    let config = test_config();
    let db = InMemoryDb::new();
    let store = InMemoryMediaStore::new();

    let users = Arc::new(InMemoryUserRepository::new(db.clone()));
    let channels = Arc::new(InMemoryChannelRepository::new(db.clone()));
    let videos = Arc::new(InMemoryVideoRepository::new(db.clone()));
    let media_store = Arc::new(store.clone());

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

    let app = setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, db, store }
}
