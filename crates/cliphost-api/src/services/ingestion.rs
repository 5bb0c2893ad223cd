//! Ingestion workflows: channel creation, channel edit, video upload.
//!
//! Every mutation follows the same arc: caller preconditions, field
//! validation, awaited media-store uploads, then one transactional
//! repository call. All validation and authorization runs before the first
//! upload, and a store failure leaves no rows behind.

use std::sync::Arc;

use cliphost_core::constants::{ALLOWED_IMAGE_CONTENT_TYPES, ALLOWED_VIDEO_CONTENT_TYPES};
use cliphost_core::models::{Channel, User, Video};
use cliphost_core::{normalize_tags, require_trimmed, AppError, TagsInput};
use cliphost_db::{ChannelEdit, ChannelRepositoryTrait, NewChannel, NewVideo, VideoRepositoryTrait};
use cliphost_storage::{MediaFolder, MediaStore, MediaStoreError, StoredMedia, UploadRequest};

use crate::utils::upload::{validate_content_type, UploadedFile};

const IMAGE_TYPE_MESSAGE: &str = "Invalid file type. Only jpeg, png, gif, webp are allowed.";
const VIDEO_TYPE_MESSAGE: &str = "Invalid file type. Only mp4, mov, webm are allowed.";

/// Fields of a channel creation request.
#[derive(Debug, Default)]
pub struct ChannelCreateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<UploadedFile>,
    pub banner: Option<UploadedFile>,
}

/// Fields of a channel edit request. Everything is optional; only supplied
/// fields change.
#[derive(Debug, Default)]
pub struct ChannelEditInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<UploadedFile>,
    pub banner: Option<UploadedFile>,
}

/// Fields of a video upload request.
#[derive(Debug, Default)]
pub struct VideoUploadInput {
    pub file: Option<UploadedFile>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<TagsInput>,
}

fn store_error(error: MediaStoreError) -> AppError {
    match error {
        MediaStoreError::UploadFailed(msg) => AppError::Upload(msg),
        MediaStoreError::InvalidKey(msg) => AppError::Validation(msg),
        MediaStoreError::ConfigError(msg) => AppError::Internal(msg),
        MediaStoreError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
    }
}

/// Orchestrates the mutation routes against the repositories and the media
/// store.
#[derive(Clone)]
pub struct IngestionService {
    channels: Arc<dyn ChannelRepositoryTrait>,
    videos: Arc<dyn VideoRepositoryTrait>,
    media_store: Arc<dyn MediaStore>,
}

impl IngestionService {
    pub fn new(
        channels: Arc<dyn ChannelRepositoryTrait>,
        videos: Arc<dyn VideoRepositoryTrait>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            channels,
            videos,
            media_store,
        }
    }

    /// Create the caller's channel.
    ///
    /// A user owns at most one channel. The in-hand caller record decides the
    /// precondition; the owner unique constraint backstops concurrent
    /// creations with the same message.
    #[tracing::instrument(skip_all, fields(operation = "create_channel"))]
    pub async fn create_channel(
        &self,
        caller: Option<User>,
        input: ChannelCreateInput,
    ) -> Result<Channel, AppError> {
        let user = caller
            .ok_or_else(|| AppError::Validation("Not authorized!! Login first".to_string()))?;

        let name = require_trimmed(
            input.name.as_deref(),
            "Channel name and description required!!",
        )?;
        let description = require_trimmed(
            input.description.as_deref(),
            "Channel name and description required!!",
        )?;

        if user.owns_channel() {
            return Err(AppError::Conflict("You already have a channel".to_string()));
        }

        for file in [&input.avatar, &input.banner].into_iter().flatten() {
            validate_content_type(
                &file.content_type,
                &ALLOWED_IMAGE_CONTENT_TYPES,
                IMAGE_TYPE_MESSAGE,
            )?;
        }

        let avatar_url = match input.avatar {
            Some(file) => {
                self.upload_image(MediaFolder::ChannelAvatar, file)
                    .await?
                    .url
            }
            None => String::new(),
        };
        let banner_url = match input.banner {
            Some(file) => {
                self.upload_image(MediaFolder::ChannelBanner, file)
                    .await?
                    .url
            }
            None => String::new(),
        };

        let channel = self
            .channels
            .create_for_owner(
                user.id,
                NewChannel {
                    name,
                    description,
                    avatar_url,
                    banner_url,
                },
            )
            .await?;

        tracing::info!(channel_id = %channel.id, owner_id = %user.id, "Channel created");
        Ok(channel)
    }

    /// Edit the caller's channel. Only supplied fields change; a new avatar
    /// is mirrored onto the caller's profile in the same transaction.
    #[tracing::instrument(skip_all, fields(operation = "edit_channel"))]
    pub async fn edit_channel(
        &self,
        caller: Option<User>,
        input: ChannelEditInput,
    ) -> Result<Channel, AppError> {
        let user = caller
            .ok_or_else(|| AppError::Validation("Not authorized!! Login first".to_string()))?;
        let channel_id = user
            .channel_id
            .filter(|_| user.has_channel)
            .ok_or_else(|| {
                AppError::Authorization("You don't have a channel to edit".to_string())
            })?;

        let name = match input.name.as_deref() {
            Some(raw) => Some(require_trimmed(Some(raw), "Channel name cannot be empty")?),
            None => None,
        };
        // A blank description means "leave it alone", it cannot be blanked
        // out once set.
        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        for file in [&input.avatar, &input.banner].into_iter().flatten() {
            validate_content_type(
                &file.content_type,
                &ALLOWED_IMAGE_CONTENT_TYPES,
                IMAGE_TYPE_MESSAGE,
            )?;
        }

        let avatar_url = match input.avatar {
            Some(file) => Some(
                self.upload_image(MediaFolder::ChannelAvatar, file)
                    .await?
                    .url,
            ),
            None => None,
        };
        let banner_url = match input.banner {
            Some(file) => Some(
                self.upload_image(MediaFolder::ChannelBanner, file)
                    .await?
                    .url,
            ),
            None => None,
        };

        let channel = self
            .channels
            .apply_edit(
                channel_id,
                user.id,
                ChannelEdit {
                    name,
                    description,
                    avatar_url,
                    banner_url,
                },
            )
            .await?;

        tracing::info!(channel_id = %channel.id, "Channel updated");
        Ok(channel)
    }

    /// Upload a video into the caller's channel.
    ///
    /// The file and its declared type are checked before anything else, so a
    /// bad request never reaches the store. The store upload is awaited in
    /// full; the row insert only happens with durable URLs in hand.
    #[tracing::instrument(skip_all, fields(operation = "upload_video"))]
    pub async fn upload_video(
        &self,
        caller: Option<User>,
        input: VideoUploadInput,
    ) -> Result<Video, AppError> {
        let file = input
            .file
            .ok_or_else(|| AppError::Validation("No Video Uploaded".to_string()))?;
        validate_content_type(
            &file.content_type,
            &ALLOWED_VIDEO_CONTENT_TYPES,
            VIDEO_TYPE_MESSAGE,
        )?;

        let user = caller.ok_or_else(|| AppError::Validation("No authorized user".to_string()))?;
        let channel_id = user
            .channel_id
            .filter(|_| user.has_channel)
            .ok_or_else(|| {
                AppError::Authorization("You don't have a channel to upload to".to_string())
            })?;

        let title = require_trimmed(input.title.as_deref(), "Title and description are required")?;
        let description = require_trimmed(
            input.description.as_deref(),
            "Title and description are required",
        )?;

        let tags = input.tags.map(normalize_tags).unwrap_or_default();

        let stored = self
            .media_store
            .upload(
                UploadRequest::video(&file.filename, &file.content_type),
                file.data,
            )
            .await
            .map_err(store_error)?;

        let thumbnail_url = stored.derived_url_or_empty();
        let duration = stored.duration_string();

        let video = self
            .videos
            .create_in_channel(NewVideo {
                channel_id,
                uploader_id: user.id,
                title,
                description,
                video_url: stored.url,
                thumbnail_url,
                duration,
                tags,
            })
            .await?;

        tracing::info!(video_id = %video.id, channel_id = %channel_id, "Video uploaded");
        Ok(video)
    }

    async fn upload_image(
        &self,
        folder: MediaFolder,
        file: UploadedFile,
    ) -> Result<StoredMedia, AppError> {
        self.media_store
            .upload(
                UploadRequest::image(folder, &file.filename, &file.content_type),
                file.data,
            )
            .await
            .map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        seed_channel_owner, test_user, InMemoryChannelRepository, InMemoryDb, InMemoryMediaStore,
        InMemoryVideoRepository,
    };

    fn service(db: &InMemoryDb, store: &InMemoryMediaStore) -> IngestionService {
        IngestionService::new(
            Arc::new(InMemoryChannelRepository::new(db.clone())),
            Arc::new(InMemoryVideoRepository::new(db.clone())),
            Arc::new(store.clone()),
        )
    }

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            content_type: "image/png".to_string(),
            data: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    fn mp4() -> UploadedFile {
        UploadedFile {
            filename: "clip.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            data: vec![0; 64],
        }
    }

    fn create_input(name: &str, description: &str) -> ChannelCreateInput {
        ChannelCreateInput {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    fn upload_input(title: &str, description: &str) -> VideoUploadInput {
        VideoUploadInput {
            file: Some(mp4()),
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            tags: None,
        }
    }

    #[tokio::test]
    async fn test_create_channel_requires_identity() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();

        let result = service(&db, &store)
            .create_channel(None, create_input("Trail Clips", "Riding videos"))
            .await;

        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Not authorized!! Login first"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_create_channel_requires_name_and_description() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let user = test_user();
        db.insert_user(user.clone());

        let result = service(&db, &store)
            .create_channel(Some(user), create_input("   ", "Riding videos"))
            .await;

        match result {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Channel name and description required!!")
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_create_channel_trims_fields() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let user = test_user();
        db.insert_user(user.clone());

        let channel = service(&db, &store)
            .create_channel(Some(user), create_input("  Trail Clips  ", " Riding videos "))
            .await
            .unwrap();

        assert_eq!(channel.name, "Trail Clips");
        assert_eq!(channel.description, "Riding videos");
        assert_eq!(channel.avatar_url, "");
        assert_eq!(channel.banner_url, "");
    }

    #[tokio::test]
    async fn test_create_channel_flags_owner() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let user = test_user();
        db.insert_user(user.clone());

        let channel = service(&db, &store)
            .create_channel(Some(user.clone()), create_input("Trail Clips", "Riding"))
            .await
            .unwrap();

        let updated = db.user(user.id).unwrap();
        assert!(updated.has_channel);
        assert_eq!(updated.channel_id, Some(channel.id));
    }

    #[tokio::test]
    async fn test_create_channel_rejects_second_channel() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, _channel) = seed_channel_owner(&db, "Trail Clips");

        let result = service(&db, &store)
            .create_channel(Some(owner), create_input("Road Clips", "More riding"))
            .await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "You already have a channel"),
            _ => panic!("Expected Conflict error"),
        }
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_create_channel_duplicate_name_conflicts() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (_owner, _channel) = seed_channel_owner(&db, "Trail Clips");
        let newcomer = test_user();
        db.insert_user(newcomer.clone());

        let result = service(&db, &store)
            .create_channel(Some(newcomer), create_input("Trail Clips", "Riding"))
            .await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Channel name already exists"),
            _ => panic!("Expected Conflict error"),
        }
    }

    #[tokio::test]
    async fn test_create_channel_uploads_images_under_channel_folders() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let user = test_user();
        db.insert_user(user.clone());

        let mut input = create_input("Trail Clips", "Riding");
        input.avatar = Some(png("avatar.png"));
        input.banner = Some(png("banner.png"));

        let channel = service(&db, &store)
            .create_channel(Some(user), input)
            .await
            .unwrap();

        let uploads = store.uploads();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0].folder, MediaFolder::ChannelAvatar);
        assert_eq!(uploads[1].folder, MediaFolder::ChannelBanner);
        assert!(channel.avatar_url.contains("channel_avatar"));
        assert!(channel.banner_url.contains("channel_banner"));
    }

    #[tokio::test]
    async fn test_create_channel_rejects_bad_image_type_before_upload() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let user = test_user();
        db.insert_user(user.clone());

        let mut input = create_input("Trail Clips", "Riding");
        input.avatar = Some(UploadedFile {
            filename: "avatar.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![1, 2, 3],
        });

        let result = service(&db, &store).create_channel(Some(user), input).await;

        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, IMAGE_TYPE_MESSAGE),
            _ => panic!("Expected Validation error"),
        }
        assert_eq!(store.upload_count(), 0);
        assert_eq!(db.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_edit_channel_requires_ownership() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let user = test_user();
        db.insert_user(user.clone());

        let result = service(&db, &store)
            .edit_channel(Some(user), ChannelEditInput::default())
            .await;

        match result {
            Err(AppError::Authorization(msg)) => {
                assert_eq!(msg, "You don't have a channel to edit")
            }
            _ => panic!("Expected Authorization error"),
        }
    }

    #[tokio::test]
    async fn test_edit_channel_rejects_blank_name() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, _channel) = seed_channel_owner(&db, "Trail Clips");

        let result = service(&db, &store)
            .edit_channel(
                Some(owner),
                ChannelEditInput {
                    name: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await;

        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Channel name cannot be empty"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_edit_channel_partial_update_keeps_other_fields() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, channel) = seed_channel_owner(&db, "Trail Clips");

        let updated = service(&db, &store)
            .edit_channel(
                Some(owner),
                ChannelEditInput {
                    name: Some("Road Clips".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Road Clips");
        assert_eq!(updated.description, channel.description);
        assert_eq!(updated.id, channel.id);
    }

    #[tokio::test]
    async fn test_edit_channel_blank_description_is_ignored() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, channel) = seed_channel_owner(&db, "Trail Clips");

        let updated = service(&db, &store)
            .edit_channel(
                Some(owner),
                ChannelEditInput {
                    description: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description, channel.description);
    }

    #[tokio::test]
    async fn test_edit_channel_avatar_mirrors_to_user() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, _channel) = seed_channel_owner(&db, "Trail Clips");

        let mut input = ChannelEditInput::default();
        input.avatar = Some(png("new-avatar.png"));

        let updated = service(&db, &store)
            .edit_channel(Some(owner.clone()), input)
            .await
            .unwrap();

        let user = db.user(owner.id).unwrap();
        assert_eq!(user.avatar_url, updated.avatar_url);
        assert!(!updated.avatar_url.is_empty());
    }

    #[tokio::test]
    async fn test_edit_channel_banner_does_not_touch_user() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, _channel) = seed_channel_owner(&db, "Trail Clips");

        let mut input = ChannelEditInput::default();
        input.banner = Some(png("new-banner.png"));

        service(&db, &store)
            .edit_channel(Some(owner.clone()), input)
            .await
            .unwrap();

        let user = db.user(owner.id).unwrap();
        assert_eq!(user.avatar_url, owner.avatar_url);
    }

    #[tokio::test]
    async fn test_upload_video_requires_file() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, _channel) = seed_channel_owner(&db, "Trail Clips");

        let mut input = upload_input("First ride", "Down the hill");
        input.file = None;

        let result = service(&db, &store).upload_video(Some(owner), input).await;

        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "No Video Uploaded"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_upload_video_checks_type_before_identity() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();

        let mut input = upload_input("First ride", "Down the hill");
        input.file = Some(UploadedFile {
            filename: "notes.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![1, 2, 3],
        });

        // Anonymous caller and a bad file type: the type check must fire first.
        let result = service(&db, &store).upload_video(None, input).await;

        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, VIDEO_TYPE_MESSAGE),
            _ => panic!("Expected Validation error"),
        }
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_video_requires_identity() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();

        let result = service(&db, &store)
            .upload_video(None, upload_input("First ride", "Down the hill"))
            .await;

        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "No authorized user"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[tokio::test]
    async fn test_upload_video_requires_channel() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let user = test_user();
        db.insert_user(user.clone());

        let result = service(&db, &store)
            .upload_video(Some(user), upload_input("First ride", "Down the hill"))
            .await;

        match result {
            Err(AppError::Authorization(msg)) => {
                assert_eq!(msg, "You don't have a channel to upload to")
            }
            _ => panic!("Expected Authorization error"),
        }
    }

    #[tokio::test]
    async fn test_upload_video_requires_title_and_description() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, _channel) = seed_channel_owner(&db, "Trail Clips");

        let result = service(&db, &store)
            .upload_video(Some(owner), upload_input("First ride", "  "))
            .await;

        match result {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Title and description are required")
            }
            _ => panic!("Expected Validation error"),
        }
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_video_persists_with_store_urls() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, channel) = seed_channel_owner(&db, "Trail Clips");

        let mut input = upload_input("First ride", "Down the hill");
        input.tags = Some(TagsInput::Sequence(vec![
            "bikes".to_string(),
            "trails".to_string(),
            "extra".to_string(),
        ]));

        let video = service(&db, &store)
            .upload_video(Some(owner.clone()), input)
            .await
            .unwrap();

        assert_eq!(video.channel_id, channel.id);
        assert_eq!(video.uploader_id, owner.id);
        assert!(video.video_url.contains("videos"));
        assert!(!video.thumbnail_url.is_empty());
        assert_eq!(video.duration, "12.5");
        assert_eq!(video.tags, vec!["bikes".to_string(), "trails".to_string()]);
        assert_eq!(video.views, 0);
        assert_eq!(video.position, 1);
        assert_eq!(db.channel(channel.id).unwrap().video_count, 1);
    }

    #[tokio::test]
    async fn test_upload_video_delimited_tags() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        let (owner, _channel) = seed_channel_owner(&db, "Trail Clips");

        let mut input = upload_input("First ride", "Down the hill");
        input.tags = Some(TagsInput::Delimited("dogs, green, blue".to_string()));

        let video = service(&db, &store)
            .upload_video(Some(owner), input)
            .await
            .unwrap();

        assert_eq!(video.tags, vec!["dogs".to_string(), "green".to_string()]);
    }

    #[tokio::test]
    async fn test_upload_video_store_failure_writes_nothing() {
        let db = InMemoryDb::new();
        let store = InMemoryMediaStore::new();
        store.fail_uploads_with("media host rejected the stream");
        let (owner, channel) = seed_channel_owner(&db, "Trail Clips");

        let result = service(&db, &store)
            .upload_video(Some(owner), upload_input("First ride", "Down the hill"))
            .await;

        match result {
            Err(AppError::Upload(msg)) => assert_eq!(msg, "media host rejected the stream"),
            _ => panic!("Expected Upload error"),
        }
        assert_eq!(db.video_count(), 0);
        assert_eq!(db.channel(channel.id).unwrap().video_count, 0);
    }
}
