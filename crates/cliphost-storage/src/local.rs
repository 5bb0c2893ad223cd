use crate::traits::{MediaStore, MediaStoreError, MediaStoreResult, StoredMedia, UploadRequest};
use async_trait::async_trait;
use cliphost_core::MediaBackend;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Media store backed by the local filesystem. Intended for development
/// and tests; it serves originals only, so derived URLs and durations
/// come back empty.
pub struct LocalMediaStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    /// Create a local media store rooted at `base_path`, serving files
    /// under `base_url`.
    pub fn new(base_path: impl Into<PathBuf>, base_url: &str) -> MediaStoreResult<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path).map_err(|e| {
            MediaStoreError::ConfigError(format!(
                "Failed to create media directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(Self {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the storage key for an upload: `{folder}/{uuid}.{ext}`.
    ///
    /// Filenames are never trusted; only a sanitized extension survives.
    fn generate_key(&self, request: &UploadRequest) -> String {
        let extension: String = Path::new(&request.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("bin")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(8)
            .collect::<String>()
            .to_lowercase();
        let extension = if extension.is_empty() {
            "bin".to_string()
        } else {
            extension
        };

        format!("{}/{}.{}", request.folder.as_str(), Uuid::new_v4(), extension)
    }

    /// Convert a storage key to a filesystem path, rejecting traversal.
    fn key_to_path(&self, key: &str) -> MediaStoreResult<PathBuf> {
        if key.contains("..") || key.starts_with('/') {
            return Err(MediaStoreError::InvalidKey(format!(
                "Key contains path traversal: {}",
                key
            )));
        }
        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> MediaStoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                MediaStoreError::UploadFailed(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    #[tracing::instrument(skip(self, data), fields(folder = %request.folder, size_bytes = data.len()))]
    async fn upload(&self, request: UploadRequest, data: Vec<u8>) -> MediaStoreResult<StoredMedia> {
        let start = std::time::Instant::now();
        let key = self.generate_key(&request);
        let path = self.key_to_path(&key)?;
        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            MediaStoreError::UploadFailed(format!(
                "Failed to create file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.write_all(&data).await.map_err(|e| {
            MediaStoreError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            MediaStoreError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            key = %key,
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_millis(),
            "Uploaded media to local store"
        );

        Ok(StoredMedia {
            url: self.generate_url(&key),
            derived_url: None,
            duration_secs: None,
        })
    }

    fn backend(&self) -> MediaBackend {
        MediaBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MediaFolder;
    use tempfile::tempdir;

    fn test_store(dir: &tempfile::TempDir) -> LocalMediaStore {
        LocalMediaStore::new(dir.path(), "http://localhost:4000/media").unwrap()
    }

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let request = UploadRequest::image(MediaFolder::ChannelAvatar, "avatar.png", "image/png");
        let media = store.upload(request, b"png bytes".to_vec()).await.unwrap();

        assert!(media.url.starts_with("http://localhost:4000/media/channel_avatar/"));
        assert!(media.url.ends_with(".png"));
        assert!(media.derived_url.is_none());
        assert!(media.duration_secs.is_none());

        let key = media
            .url
            .strip_prefix("http://localhost:4000/media/")
            .unwrap();
        let written = std::fs::read(dir.path().join(key)).unwrap();
        assert_eq!(written, b"png bytes");
    }

    #[tokio::test]
    async fn test_uploads_with_same_filename_do_not_collide() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let first = store
            .upload(UploadRequest::video("clip.mp4", "video/mp4"), vec![1])
            .await
            .unwrap();
        let second = store
            .upload(UploadRequest::video("clip.mp4", "video/mp4"), vec![2])
            .await
            .unwrap();

        assert_ne!(first.url, second.url);
    }

    #[tokio::test]
    async fn test_extension_is_sanitized() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        let request = UploadRequest::video("weird.MP4!!", "video/mp4");
        let media = store.upload(request, vec![0]).await.unwrap();
        assert!(media.url.ends_with(".mp4"));

        let no_extension = UploadRequest::video("clip", "video/mp4");
        let media = store.upload(no_extension, vec![0]).await.unwrap();
        assert!(media.url.ends_with(".bin"));
    }

    #[test]
    fn test_key_to_path_rejects_traversal() {
        let dir = tempdir().unwrap();
        let store = test_store(&dir);

        assert!(store.key_to_path("videos/../../etc/passwd").is_err());
        assert!(store.key_to_path("/etc/passwd").is_err());
        assert!(store.key_to_path("videos/ok.mp4").is_ok());
    }
}
