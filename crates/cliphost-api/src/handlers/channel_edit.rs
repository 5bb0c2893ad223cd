//! Channel edit handler.

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use cliphost_core::models::ChannelResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::models::Identity;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{ChannelEditInput, IngestionService};
use crate::state::MediaState;
use crate::utils::upload::{collect_multipart, validate_file_size};

#[derive(Debug, Serialize, ToSchema)]
pub struct ChannelEditResponse {
    pub message: String,
    pub channel: ChannelResponse,
}

/// Edit the caller's channel. All fields optional; only supplied ones
/// change. A new avatar also lands on the caller's profile.
#[utoipa::path(
    put,
    path = "/api/v1/channels/edit",
    tag = "channels",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Channel updated", body = ChannelEditResponse),
        (status = 400, description = "Missing identity, blank name, or name conflict", body = ErrorResponse),
        (status = 403, description = "Caller owns no channel", body = ErrorResponse),
        (status = 404, description = "Channel not found", body = ErrorResponse),
        (status = 500, description = "Upload or persistence failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "edit_channel"))]
pub async fn edit_channel(
    State(media): State<MediaState>,
    State(ingestion): State<IngestionService>,
    Identity(caller): Identity,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut form = collect_multipart(&mut multipart).await?;

    let avatar = form.take_file("channelAvatar");
    let banner = form.take_file("channelBanner");
    for file in [&avatar, &banner].into_iter().flatten() {
        validate_file_size(file.data.len(), media.max_image_size_bytes)?;
    }

    let input = ChannelEditInput {
        name: form.text("channelName").map(str::to_string),
        description: form.text("description").map(str::to_string),
        avatar,
        banner,
    };

    let channel = ingestion.edit_channel(caller, input).await?;

    Ok(Json(ChannelEditResponse {
        message: "Channel updated successfully".to_string(),
        channel: ChannelResponse::from(channel),
    }))
}
