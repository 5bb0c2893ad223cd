use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::video::VideoSummary;

/// Channel owned by exactly one user. `name` is globally unique, enforced by
/// the database schema. `video_count` grows with every upload and doubles as
/// the next insertion position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Channel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    /// Empty string when no avatar has been uploaded.
    pub avatar_url: String,
    /// Empty string when no banner has been uploaded.
    pub banner_url: String,
    pub video_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Channel as returned by the create and edit routes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResponse {
    pub id: Uuid,
    #[serde(rename = "channelName")]
    pub name: String,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub description: String,
    #[serde(rename = "channelAvatar")]
    pub avatar_url: String,
    #[serde(rename = "channelBanner")]
    pub banner_url: String,
    pub video_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Channel> for ChannelResponse {
    fn from(channel: Channel) -> Self {
        ChannelResponse {
            id: channel.id,
            name: channel.name,
            owner_id: channel.owner_id,
            description: channel.description,
            avatar_url: channel.avatar_url,
            banner_url: channel.banner_url,
            video_count: channel.video_count,
            created_at: channel.created_at,
            updated_at: channel.updated_at,
        }
    }
}

/// Channel page response: the channel plus its videos, newest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDetailResponse {
    #[serde(flatten)]
    pub channel: ChannelResponse,
    pub videos: Vec<VideoSummary>,
}

impl ChannelDetailResponse {
    pub fn new(channel: Channel, videos: Vec<VideoSummary>) -> Self {
        ChannelDetailResponse {
            channel: ChannelResponse::from(channel),
            videos,
        }
    }
}

/// The slice of a channel embedded in video reads.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChannelSummary {
    pub id: Uuid,
    #[serde(rename = "channelName")]
    pub name: String,
    #[serde(rename = "channelAvatar")]
    pub avatar_url: String,
}

impl From<&Channel> for ChannelSummary {
    fn from(channel: &Channel) -> Self {
        ChannelSummary {
            id: channel.id,
            name: channel.name.clone(),
            avatar_url: channel.avatar_url.clone(),
        }
    }
}
