//! Video upload handler.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cliphost_core::models::VideoResponse;
use cliphost_core::TagsInput;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::models::Identity;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{IngestionService, VideoUploadInput};
use crate::state::MediaState;
use crate::utils::upload::{collect_multipart, validate_file_size, CollectedMultipart};

#[derive(Debug, Serialize, ToSchema)]
pub struct VideoUploadResponse {
    pub video: VideoResponse,
}

/// Upload a video into the caller's channel: `video` file field, `title` and
/// `description` text fields, optional `tags`. The upload is awaited in
/// full, so the single response carries the final state.
#[utoipa::path(
    post,
    path = "/api/v1/videos/upload",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video uploaded and persisted", body = VideoUploadResponse),
        (status = 400, description = "Missing file, bad file type, missing identity, or missing fields", body = ErrorResponse),
        (status = 403, description = "Caller owns no channel", body = ErrorResponse),
        (status = 500, description = "Upload or persistence failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "upload_video"))]
pub async fn upload_video(
    State(media): State<MediaState>,
    State(ingestion): State<IngestionService>,
    Identity(caller): Identity,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut form = collect_multipart(&mut multipart).await?;

    let file = form.take_file("video");
    if let Some(file) = &file {
        validate_file_size(file.data.len(), media.max_video_size_bytes)?;
    }

    let tags = tags_input(&form);
    let input = VideoUploadInput {
        file,
        title: form.text("title").map(str::to_string),
        description: form.text("description").map(str::to_string),
        tags,
    };

    let video = ingestion.upload_video(caller, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(VideoUploadResponse {
            video: VideoResponse::from(video),
        }),
    ))
}

/// Tags arrive either as repeated `tags` fields or as one comma-delimited
/// value; a lone entry is treated as the delimited form.
fn tags_input(form: &CollectedMultipart) -> Option<TagsInput> {
    let mut entries = form.texts("tags");
    match entries.len() {
        0 => None,
        1 => entries.pop().map(TagsInput::Delimited),
        _ => Some(TagsInput::Sequence(entries)),
    }
}
