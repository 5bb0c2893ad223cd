//! Public channel page handler.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use cliphost_core::models::ChannelDetailResponse;
use cliphost_core::{parse_entity_id, AppError};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DbState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ChannelGetResponse {
    pub channel: ChannelDetailResponse,
}

/// Fetch one channel together with its videos, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/channels/{id}",
    tag = "channels",
    params(
        ("id" = String, Path, description = "Channel ID")
    ),
    responses(
        (status = 200, description = "Channel with its videos", body = ChannelGetResponse),
        (status = 400, description = "Malformed channel ID", body = ErrorResponse),
        (status = 404, description = "Channel not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db), fields(operation = "get_channel"))]
pub async fn get_channel(
    Path(id): Path<String>,
    State(db): State<DbState>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Parsed by hand so a malformed id gets the contract's message, not the
    // extractor's.
    let channel_id = parse_entity_id(&id, "Invalid Channel ID")?;

    let channel = db
        .channels
        .find_by_id(channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

    let videos = db.channels.list_videos(channel_id).await?;

    Ok(Json(ChannelGetResponse {
        channel: ChannelDetailResponse::new(channel, videos),
    }))
}
