//! Public video read handlers.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use cliphost_core::models::VideoWithChannelResponse;
use cliphost_core::{parse_entity_id, AppError};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DbState;

/// List every video, newest first, each with its channel summary.
#[utoipa::path(
    get,
    path = "/api/v1/videos",
    tag = "videos",
    responses(
        (status = 200, description = "All videos, newest first", body = [VideoWithChannelResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db), fields(operation = "list_videos"))]
pub async fn list_videos(State(db): State<DbState>) -> Result<impl IntoResponse, HttpAppError> {
    let videos = db.videos.list_with_channel().await?;

    let response: Vec<VideoWithChannelResponse> = videos.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// Fetch one video with its channel summary.
#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}",
    tag = "videos",
    params(
        ("id" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "The video", body = VideoWithChannelResponse),
        (status = 400, description = "Malformed video ID", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(db), fields(operation = "get_video"))]
pub async fn get_video(
    Path(id): Path<String>,
    State(db): State<DbState>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = parse_entity_id(&id, "Invalid video ID format")?;

    let video = db
        .videos
        .find_with_channel(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Unable to find the video".to_string()))?;

    Ok(Json(VideoWithChannelResponse::from(video)))
}
