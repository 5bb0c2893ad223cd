use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::channel::ChannelSummary;

/// Video record. The binary lives on the external media store; this row
/// carries the returned URLs. `duration` is string-encoded as the store
/// reports it, empty when unavailable. `position` is the insertion index
/// within the owning channel, assigned at upload time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub uploader_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    /// Empty string when the store returned no derived thumbnail.
    pub thumbnail_url: String,
    pub duration: String,
    pub views: i64,
    pub tags: Vec<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video as returned by the upload route (channel reference as a plain id).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "uploader")]
    pub uploader_id: Uuid,
    pub channel_id: Uuid,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub views: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        VideoResponse {
            id: video.id,
            title: video.title,
            description: video.description,
            uploader_id: video.uploader_id,
            channel_id: video.channel_id,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            duration: video.duration,
            views: video.views,
            tags: video.tags,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

/// Read model for video queries that join the owning channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoWithChannel {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub video: Video,
    pub channel_name: String,
    pub channel_avatar: String,
}

/// Video as returned by the list and get routes: the channel reference is
/// populated with a summary instead of a plain id.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoWithChannelResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "uploader")]
    pub uploader_id: Uuid,
    #[serde(rename = "channelId")]
    pub channel: ChannelSummary,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub views: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoWithChannel> for VideoWithChannelResponse {
    fn from(joined: VideoWithChannel) -> Self {
        let VideoWithChannel {
            video,
            channel_name,
            channel_avatar,
        } = joined;

        VideoWithChannelResponse {
            id: video.id,
            title: video.title,
            description: video.description,
            uploader_id: video.uploader_id,
            channel: ChannelSummary {
                id: video.channel_id,
                name: channel_name,
                avatar_url: channel_avatar,
            },
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            duration: video.duration,
            views: video.views,
            tags: video.tags,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

/// The fixed projection of a video embedded in the channel page, matching
/// the fields the channel read exposes for each child.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: Uuid,
    pub title: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub tags: Vec<String>,
}

impl From<&Video> for VideoSummary {
    fn from(video: &Video) -> Self {
        VideoSummary {
            id: video.id,
            title: video.title.clone(),
            thumbnail_url: video.thumbnail_url.clone(),
            duration: video.duration.clone(),
            views: video.views,
            created_at: video.created_at,
            description: video.description.clone(),
            tags: video.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_video() -> Video {
        Video {
            id: Uuid::new_v4(),
            channel_id: Uuid::new_v4(),
            uploader_id: Uuid::new_v4(),
            title: "sunrise timelapse".to_string(),
            description: "shot over the bay".to_string(),
            video_url: "https://media.example.com/videos/clip.mp4".to_string(),
            thumbnail_url: "https://media.example.com/videos/clip.jpg".to_string(),
            duration: "42.5".to_string(),
            views: 0,
            tags: vec!["timelapse".to_string(), "bay".to_string()],
            position: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_video_response_wire_field_names() {
        let video = test_video();
        let uploader_id = video.uploader_id;
        let channel_id = video.channel_id;
        let json = serde_json::to_value(VideoResponse::from(video)).unwrap();

        assert_eq!(json["uploader"], serde_json::json!(uploader_id));
        assert_eq!(json["channelId"], serde_json::json!(channel_id));
        assert!(json.get("videoUrl").is_some());
        assert!(json.get("thumbnailUrl").is_some());
        assert!(json.get("position").is_none());
    }

    #[test]
    fn test_video_with_channel_response_populates_summary() {
        let video = test_video();
        let channel_id = video.channel_id;
        let joined = VideoWithChannel {
            video,
            channel_name: "travel diaries".to_string(),
            channel_avatar: "https://media.example.com/channel_avatar/a.jpg".to_string(),
        };

        let json = serde_json::to_value(VideoWithChannelResponse::from(joined)).unwrap();
        assert_eq!(json["channelId"]["id"], serde_json::json!(channel_id));
        assert_eq!(
            json["channelId"]["channelName"],
            serde_json::json!("travel diaries")
        );
        assert_eq!(
            json["channelId"]["channelAvatar"],
            serde_json::json!("https://media.example.com/channel_avatar/a.jpg")
        );
    }

    #[test]
    fn test_video_summary_projection() {
        let video = test_video();
        let summary = VideoSummary::from(&video);
        assert_eq!(summary.id, video.id);
        assert_eq!(summary.title, video.title);
        assert_eq!(summary.duration, video.duration);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("thumbnailUrl").is_some());
        // The projection never exposes the media URL or uploader.
        assert!(json.get("videoUrl").is_none());
        assert!(json.get("uploader").is_none());
    }
}
