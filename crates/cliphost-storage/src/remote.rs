use crate::traits::{
    DerivedSpec, MediaStore, MediaStoreError, MediaStoreResult, StoredMedia, UploadRequest,
};
use async_trait::async_trait;
use cliphost_core::MediaBackend;
use serde::Deserialize;
use std::time::Duration;

/// Media store backed by a remote hosting service.
///
/// Uploads go out as a single multipart POST and are awaited in full,
/// including derived-asset generation, so the response already carries
/// every URL the caller needs.
pub struct RemoteMediaStore {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

/// Wire shape of the hosting service's upload response.
#[derive(Debug, Deserialize)]
struct RemoteUploadResponse {
    secure_url: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    eager: Vec<RemoteEagerAsset>,
}

#[derive(Debug, Deserialize)]
struct RemoteEagerAsset {
    secure_url: String,
}

impl From<RemoteUploadResponse> for StoredMedia {
    fn from(response: RemoteUploadResponse) -> Self {
        StoredMedia {
            url: response.secure_url,
            derived_url: response.eager.into_iter().next().map(|asset| asset.secure_url),
            duration_secs: response.duration,
        }
    }
}

/// Eager transformation list in the wire format the hosting service expects.
fn eager_payload(spec: &DerivedSpec) -> String {
    serde_json::json!([{
        "width": spec.width,
        "height": spec.height,
        "crop": spec.crop,
        "start_offset": spec.start_offset_secs.to_string(),
        "format": spec.format,
    }])
    .to_string()
}

impl RemoteMediaStore {
    pub fn new(upload_url: &str, api_key: &str, timeout: Duration) -> MediaStoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediaStoreError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            upload_url: upload_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn build_form(&self, request: &UploadRequest, data: Vec<u8>) -> MediaStoreResult<reqwest::multipart::Form> {
        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(request.filename.clone())
            .mime_str(&request.content_type)
            .map_err(|e| {
                MediaStoreError::UploadFailed(format!(
                    "Invalid content type {}: {}",
                    request.content_type, e
                ))
            })?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("folder", request.folder.as_str())
            .text("resource_type", request.resource_kind.as_str());

        if let Some(spec) = &request.derived {
            form = form
                .text("eager", eager_payload(spec))
                .text("eager_async", "false");
        }

        Ok(form)
    }
}

#[async_trait]
impl MediaStore for RemoteMediaStore {
    #[tracing::instrument(skip(self, data), fields(folder = %request.folder, size_bytes = data.len()))]
    async fn upload(&self, request: UploadRequest, data: Vec<u8>) -> MediaStoreResult<StoredMedia> {
        let start = std::time::Instant::now();
        let size_bytes = data.len();
        let form = self.build_form(&request, data)?;

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaStoreError::UploadFailed(format!("Failed to reach media store: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MediaStoreError::UploadFailed(format!(
                "Media store returned {}: {}",
                status, error_text
            )));
        }

        let body: RemoteUploadResponse = response.json().await.map_err(|e| {
            MediaStoreError::UploadFailed(format!("Failed to parse media store response: {}", e))
        })?;

        tracing::info!(
            folder = %request.folder,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_millis(),
            "Uploaded media to remote store"
        );

        Ok(body.into())
    }

    fn backend(&self) -> MediaBackend {
        MediaBackend::Remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MediaFolder;

    #[test]
    fn test_response_maps_video_fields() {
        let json = r#"{
            "secure_url": "https://media.example.com/videos/abc.mp4",
            "duration": 42.5,
            "eager": [
                {"secure_url": "https://media.example.com/videos/abc.jpg"}
            ]
        }"#;

        let response: RemoteUploadResponse = serde_json::from_str(json).unwrap();
        let media: StoredMedia = response.into();

        assert_eq!(media.url, "https://media.example.com/videos/abc.mp4");
        assert_eq!(
            media.derived_url.as_deref(),
            Some("https://media.example.com/videos/abc.jpg")
        );
        assert_eq!(media.duration_secs, Some(42.5));
    }

    #[test]
    fn test_response_tolerates_missing_eager_and_duration() {
        let json = r#"{"secure_url": "https://media.example.com/channel_avatar/a.png"}"#;

        let response: RemoteUploadResponse = serde_json::from_str(json).unwrap();
        let media: StoredMedia = response.into();

        assert_eq!(media.url, "https://media.example.com/channel_avatar/a.png");
        assert!(media.derived_url.is_none());
        assert!(media.duration_secs.is_none());
        assert_eq!(media.duration_string(), "");
        assert_eq!(media.derived_url_or_empty(), "");
    }

    #[test]
    fn test_eager_payload_wire_shape() {
        let payload = eager_payload(&DerivedSpec::video_thumbnail());
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        let spec = &value.as_array().unwrap()[0];
        assert_eq!(spec["width"], 300);
        assert_eq!(spec["height"], 200);
        assert_eq!(spec["crop"], "thumb");
        assert_eq!(spec["start_offset"], "3");
        assert_eq!(spec["format"], "jpg");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let store =
            RemoteMediaStore::new("https://media.example.com/upload/", "key", Duration::from_secs(5))
                .unwrap();
        assert_eq!(store.upload_url, "https://media.example.com/upload");
        assert_eq!(store.backend(), MediaBackend::Remote);

        // Folder names ride along as plain form fields.
        let request = UploadRequest::image(MediaFolder::ChannelBanner, "b.png", "image/png");
        assert!(store.build_form(&request, vec![1, 2, 3]).is_ok());
    }
}
