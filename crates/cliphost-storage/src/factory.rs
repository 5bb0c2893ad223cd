use crate::local::LocalMediaStore;
use crate::remote::RemoteMediaStore;
use crate::traits::{MediaStore, MediaStoreError, MediaStoreResult};
use cliphost_core::{Config, MediaBackend};
use std::sync::Arc;
use std::time::Duration;

/// Build the media store selected by configuration.
pub fn create_media_store(config: &Config) -> MediaStoreResult<Arc<dyn MediaStore>> {
    match config.media_backend() {
        MediaBackend::Remote => {
            let upload_url = config.media_store_url().ok_or_else(|| {
                MediaStoreError::ConfigError(
                    "MEDIA_STORE_URL is required for the remote backend".to_string(),
                )
            })?;
            let api_key = config.media_store_api_key().ok_or_else(|| {
                MediaStoreError::ConfigError(
                    "MEDIA_STORE_API_KEY is required for the remote backend".to_string(),
                )
            })?;
            let timeout = Duration::from_secs(config.media_store_timeout_seconds());

            tracing::info!(backend = "remote", "Initializing media store");
            Ok(Arc::new(RemoteMediaStore::new(upload_url, api_key, timeout)?))
        }
        MediaBackend::Local => {
            let base_path = config.local_media_path().ok_or_else(|| {
                MediaStoreError::ConfigError(
                    "LOCAL_MEDIA_PATH is required for the local backend".to_string(),
                )
            })?;
            let base_url = config.local_media_base_url().ok_or_else(|| {
                MediaStoreError::ConfigError(
                    "LOCAL_MEDIA_BASE_URL is required for the local backend".to_string(),
                )
            })?;

            tracing::info!(backend = "local", path = base_path, "Initializing media store");
            Ok(Arc::new(LocalMediaStore::new(base_path, base_url)?))
        }
    }
}
