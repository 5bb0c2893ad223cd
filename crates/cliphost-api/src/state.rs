//! Application state management
//!
//! State is split into domain sub-states so handlers extract only what they
//! use, via `FromRef`.

use std::sync::Arc;

use cliphost_db::{ChannelRepositoryTrait, UserRepositoryTrait, VideoRepositoryTrait};

use crate::services::IngestionService;

/// Repository handles.
#[derive(Clone)]
pub struct DbState {
    pub users: Arc<dyn UserRepositoryTrait>,
    pub channels: Arc<dyn ChannelRepositoryTrait>,
    pub videos: Arc<dyn VideoRepositoryTrait>,
}

/// Per-file size caps enforced while draining multipart bodies.
#[derive(Clone)]
pub struct MediaState {
    pub max_video_size_bytes: usize,
    pub max_image_size_bytes: usize,
}

/// Main application state, aggregating the sub-states.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub media: MediaState,
    pub ingestion: IngestionService,
}

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for MediaState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for IngestionService {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.ingestion.clone()
    }
}
