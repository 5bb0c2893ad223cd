use async_trait::async_trait;
use cliphost_core::MediaBackend;
use thiserror::Error;

/// Media store errors
#[derive(Debug, Error)]
pub enum MediaStoreError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid media key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for media store operations
pub type MediaStoreResult<T> = Result<T, MediaStoreError>;

/// Logical folder an asset is filed under in the media store.
///
/// Folder names are part of the public URL layout and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFolder {
    ChannelAvatar,
    ChannelBanner,
    Videos,
}

impl MediaFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFolder::ChannelAvatar => "channel_avatar",
            MediaFolder::ChannelBanner => "channel_banner",
            MediaFolder::Videos => "videos",
        }
    }
}

impl std::fmt::Display for MediaFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the backend should treat the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Video,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
        }
    }
}

/// Derived asset the store is asked to produce alongside the original.
///
/// For videos this is the poster frame: a 300x200 thumb-cropped JPEG
/// grabbed three seconds into the clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedSpec {
    pub width: u32,
    pub height: u32,
    pub crop: String,
    pub start_offset_secs: u32,
    pub format: String,
}

impl DerivedSpec {
    pub fn video_thumbnail() -> Self {
        Self {
            width: 300,
            height: 200,
            crop: "thumb".to_string(),
            start_offset_secs: 3,
            format: "jpg".to_string(),
        }
    }
}

/// Everything the store needs to file one uploaded asset.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub folder: MediaFolder,
    pub resource_kind: ResourceKind,
    pub filename: String,
    pub content_type: String,
    pub derived: Option<DerivedSpec>,
}

impl UploadRequest {
    /// Request for a channel image (avatar or banner). No derived assets.
    pub fn image(folder: MediaFolder, filename: &str, content_type: &str) -> Self {
        Self {
            folder,
            resource_kind: ResourceKind::Image,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            derived: None,
        }
    }

    /// Request for a video, including its poster thumbnail.
    pub fn video(filename: &str, content_type: &str) -> Self {
        Self {
            folder: MediaFolder::Videos,
            resource_kind: ResourceKind::Video,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            derived: Some(DerivedSpec::video_thumbnail()),
        }
    }
}

/// Outcome of a completed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMedia {
    /// Durable URL of the original asset.
    pub url: String,
    /// URL of the derived asset, when one was requested and produced.
    pub derived_url: Option<String>,
    /// Media duration in seconds, when the backend can measure it.
    pub duration_secs: Option<f64>,
}

impl StoredMedia {
    /// Duration rendered for persistence. Empty string when unknown.
    pub fn duration_string(&self) -> String {
        self.duration_secs.map(|d| d.to_string()).unwrap_or_default()
    }

    /// Derived URL for persistence. Empty string when none was produced.
    pub fn derived_url_or_empty(&self) -> String {
        self.derived_url.clone().unwrap_or_default()
    }
}

/// Media store abstraction.
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a binary payload and return its durable URLs.
    ///
    /// The upload is awaited in full. Callers only get a `StoredMedia`
    /// once the backend has accepted the asset, so nothing is persisted
    /// against a URL that might still fail.
    async fn upload(&self, request: UploadRequest, data: Vec<u8>) -> MediaStoreResult<StoredMedia>;

    /// Get the backend kind (used for logging)
    fn backend(&self) -> MediaBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_names_are_stable() {
        assert_eq!(MediaFolder::ChannelAvatar.as_str(), "channel_avatar");
        assert_eq!(MediaFolder::ChannelBanner.as_str(), "channel_banner");
        assert_eq!(MediaFolder::Videos.as_str(), "videos");
    }

    #[test]
    fn test_video_request_carries_thumbnail_spec() {
        let request = UploadRequest::video("clip.mp4", "video/mp4");

        assert_eq!(request.folder, MediaFolder::Videos);
        assert_eq!(request.resource_kind, ResourceKind::Video);
        let derived = request.derived.expect("video uploads request a thumbnail");
        assert_eq!(derived.width, 300);
        assert_eq!(derived.height, 200);
        assert_eq!(derived.crop, "thumb");
        assert_eq!(derived.start_offset_secs, 3);
        assert_eq!(derived.format, "jpg");
    }

    #[test]
    fn test_image_request_has_no_derived_spec() {
        let request = UploadRequest::image(MediaFolder::ChannelAvatar, "me.png", "image/png");

        assert_eq!(request.resource_kind, ResourceKind::Image);
        assert!(request.derived.is_none());
    }

    #[test]
    fn test_duration_string_formats_seconds() {
        let media = StoredMedia {
            url: "https://cdn.example.com/videos/a.mp4".to_string(),
            derived_url: None,
            duration_secs: Some(13.4),
        };
        assert_eq!(media.duration_string(), "13.4");

        let unknown = StoredMedia {
            url: "https://cdn.example.com/videos/b.mp4".to_string(),
            derived_url: None,
            duration_secs: None,
        };
        assert_eq!(unknown.duration_string(), "");
    }
}
