//! In-memory fakes for tests: repositories over shared maps and a media
//! store that records uploads. Behavior mirrors the Postgres implementations,
//! including the uniqueness conflicts and the transactional side effects, so
//! service and router tests run with no database or network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use cliphost_core::models::{Channel, User, Video, VideoSummary, VideoWithChannel};
use cliphost_core::{AppError, MediaBackend};
use cliphost_db::{
    ChannelEdit, ChannelRepositoryTrait, NewChannel, NewVideo, UserRepositoryTrait,
    VideoRepositoryTrait,
};
use cliphost_storage::{
    MediaFolder, MediaStore, MediaStoreError, MediaStoreResult, ResourceKind, StoredMedia,
    UploadRequest,
};
use uuid::Uuid;

/// Shared in-memory tables.
#[derive(Clone, Default)]
pub struct InMemoryDb {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    channels: Arc<Mutex<HashMap<Uuid, Channel>>>,
    videos: Arc<Mutex<HashMap<Uuid, Video>>>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn insert_channel(&self, channel: Channel) {
        self.channels.lock().unwrap().insert(channel.id, channel);
    }

    pub fn channel(&self, id: Uuid) -> Option<Channel> {
        self.channels.lock().unwrap().get(&id).cloned()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.lock().unwrap().len()
    }

    pub fn insert_video(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn video_count(&self) -> usize {
        self.videos.lock().unwrap().len()
    }
}

/// Fresh user without a channel.
pub fn test_user() -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: "creator".to_string(),
        email: "creator@example.com".to_string(),
        avatar_url: String::new(),
        has_channel: false,
        channel_id: None,
        created_at: now,
        updated_at: now,
    }
}

/// Insert a user together with a channel they own, wired both ways.
pub fn seed_channel_owner(db: &InMemoryDb, channel_name: &str) -> (User, Channel) {
    let mut user = test_user();
    let now = Utc::now();
    let channel = Channel {
        id: Uuid::new_v4(),
        owner_id: user.id,
        name: channel_name.to_string(),
        description: "Seeded channel".to_string(),
        avatar_url: String::new(),
        banner_url: String::new(),
        video_count: 0,
        created_at: now,
        updated_at: now,
    };
    user.has_channel = true;
    user.channel_id = Some(channel.id);

    db.insert_user(user.clone());
    db.insert_channel(channel.clone());
    (user, channel)
}

#[derive(Clone)]
pub struct InMemoryUserRepository {
    db: InMemoryDb,
}

impl InMemoryUserRepository {
    pub fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.db.user(id))
    }
}

#[derive(Clone)]
pub struct InMemoryChannelRepository {
    db: InMemoryDb,
}

impl InMemoryChannelRepository {
    pub fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChannelRepositoryTrait for InMemoryChannelRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Channel>, AppError> {
        Ok(self.db.channel(id))
    }

    async fn create_for_owner(
        &self,
        owner_id: Uuid,
        new_channel: NewChannel,
    ) -> Result<Channel, AppError> {
        let channel = {
            let mut channels = self.db.channels.lock().unwrap();
            if channels.values().any(|c| c.name == new_channel.name) {
                return Err(AppError::Conflict("Channel name already exists".to_string()));
            }
            if channels.values().any(|c| c.owner_id == owner_id) {
                return Err(AppError::Conflict("You already have a channel".to_string()));
            }
            let now = Utc::now();
            let channel = Channel {
                id: Uuid::new_v4(),
                owner_id,
                name: new_channel.name,
                description: new_channel.description,
                avatar_url: new_channel.avatar_url,
                banner_url: new_channel.banner_url,
                video_count: 0,
                created_at: now,
                updated_at: now,
            };
            channels.insert(channel.id, channel.clone());
            channel
        };

        let mut users = self.db.users.lock().unwrap();
        if let Some(user) = users.get_mut(&owner_id) {
            user.has_channel = true;
            user.channel_id = Some(channel.id);
            user.updated_at = channel.updated_at;
        }

        Ok(channel)
    }

    async fn apply_edit(
        &self,
        channel_id: Uuid,
        owner_id: Uuid,
        edit: ChannelEdit,
    ) -> Result<Channel, AppError> {
        let mirrored_avatar = edit.avatar_url.clone();

        let updated = {
            let mut channels = self.db.channels.lock().unwrap();

            if let Some(name) = &edit.name {
                let taken = channels
                    .values()
                    .any(|c| c.id != channel_id && &c.name == name);
                if taken {
                    return Err(AppError::Conflict("Channel name already exists".to_string()));
                }
            }

            let channel = channels
                .values_mut()
                .find(|c| c.id == channel_id && c.owner_id == owner_id)
                .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

            if let Some(name) = edit.name {
                channel.name = name;
            }
            if let Some(description) = edit.description {
                channel.description = description;
            }
            if let Some(avatar_url) = edit.avatar_url {
                channel.avatar_url = avatar_url;
            }
            if let Some(banner_url) = edit.banner_url {
                channel.banner_url = banner_url;
            }
            channel.updated_at = Utc::now();
            channel.clone()
        };

        if let Some(avatar_url) = mirrored_avatar {
            let mut users = self.db.users.lock().unwrap();
            if let Some(user) = users.get_mut(&owner_id) {
                user.avatar_url = avatar_url;
                user.updated_at = updated.updated_at;
            }
        }

        Ok(updated)
    }

    async fn list_videos(&self, channel_id: Uuid) -> Result<Vec<VideoSummary>, AppError> {
        let videos = self.db.videos.lock().unwrap();
        let mut in_channel: Vec<&Video> = videos
            .values()
            .filter(|v| v.channel_id == channel_id)
            .collect();
        in_channel.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.position.cmp(&a.position))
        });
        Ok(in_channel.into_iter().map(VideoSummary::from).collect())
    }
}

#[derive(Clone)]
pub struct InMemoryVideoRepository {
    db: InMemoryDb,
}

impl InMemoryVideoRepository {
    pub fn new(db: InMemoryDb) -> Self {
        Self { db }
    }
}

impl InMemoryVideoRepository {
    fn join_channel(&self, video: Video) -> VideoWithChannel {
        let channel = self.db.channel(video.channel_id);
        VideoWithChannel {
            channel_name: channel
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            channel_avatar: channel.map(|c| c.avatar_url).unwrap_or_default(),
            video,
        }
    }
}

#[async_trait]
impl VideoRepositoryTrait for InMemoryVideoRepository {
    async fn create_in_channel(&self, new_video: NewVideo) -> Result<Video, AppError> {
        let position = {
            let mut channels = self.db.channels.lock().unwrap();
            let channel = channels
                .get_mut(&new_video.channel_id)
                .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;
            channel.video_count += 1;
            channel.updated_at = Utc::now();
            channel.video_count
        };

        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            channel_id: new_video.channel_id,
            uploader_id: new_video.uploader_id,
            title: new_video.title,
            description: new_video.description,
            video_url: new_video.video_url,
            thumbnail_url: new_video.thumbnail_url,
            duration: new_video.duration,
            views: 0,
            tags: new_video.tags,
            position,
            created_at: now,
            updated_at: now,
        };
        self.db.insert_video(video.clone());
        Ok(video)
    }

    async fn find_with_channel(&self, id: Uuid) -> Result<Option<VideoWithChannel>, AppError> {
        let video = self.db.videos.lock().unwrap().get(&id).cloned();
        Ok(video.map(|v| self.join_channel(v)))
    }

    async fn list_with_channel(&self) -> Result<Vec<VideoWithChannel>, AppError> {
        let mut all: Vec<Video> = self.db.videos.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.position.cmp(&a.position))
        });
        Ok(all.into_iter().map(|v| self.join_channel(v)).collect())
    }
}

/// One upload accepted by the fake store.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub folder: MediaFolder,
    pub resource_kind: ResourceKind,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: usize,
}

/// Media store that records uploads and hands back deterministic URLs.
#[derive(Clone, Default)]
pub struct InMemoryMediaStore {
    uploads: Arc<Mutex<Vec<RecordedUpload>>>,
    fail_message: Arc<Mutex<Option<String>>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail with this message.
    pub fn fail_uploads_with(&self, message: &str) {
        *self.fail_message.lock().unwrap() = Some(message.to_string());
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn upload(&self, request: UploadRequest, data: Vec<u8>) -> MediaStoreResult<StoredMedia> {
        if let Some(message) = self.fail_message.lock().unwrap().clone() {
            return Err(MediaStoreError::UploadFailed(message));
        }

        self.uploads.lock().unwrap().push(RecordedUpload {
            folder: request.folder,
            resource_kind: request.resource_kind,
            filename: request.filename.clone(),
            content_type: request.content_type.clone(),
            size_bytes: data.len(),
        });

        let key = Uuid::new_v4();
        let url = format!("https://media.test/{}/{}", request.folder.as_str(), key);
        Ok(StoredMedia {
            derived_url: request
                .derived
                .as_ref()
                .map(|spec| format!("{}-thumb.{}", url, spec.format)),
            duration_secs: match request.resource_kind {
                ResourceKind::Video => Some(12.5),
                ResourceKind::Image => None,
            },
            url,
        })
    }

    fn backend(&self) -> MediaBackend {
        MediaBackend::Local
    }
}
