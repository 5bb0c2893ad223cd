//! Channel creation handler.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cliphost_core::models::ChannelResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::models::Identity;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{ChannelCreateInput, IngestionService};
use crate::state::MediaState;
use crate::utils::upload::{collect_multipart, validate_file_size};

#[derive(Debug, Serialize, ToSchema)]
pub struct ChannelCreateResponse {
    pub channel: ChannelResponse,
}

/// Create the caller's channel from a multipart form: `channelName` and
/// `description` text fields, optional `channelAvatar` and `channelBanner`
/// image files.
#[utoipa::path(
    post,
    path = "/api/v1/channels/create",
    tag = "channels",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Channel created", body = ChannelCreateResponse),
        (status = 400, description = "Missing identity, missing fields, or name conflict", body = ErrorResponse),
        (status = 500, description = "Upload or persistence failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(operation = "create_channel"))]
pub async fn create_channel(
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

    let input = ChannelCreateInput {
        name: form.text("channelName").map(str::to_string),
        description: form.text("description").map(str::to_string),
        avatar,
        banner,
    };

    let channel = ingestion.create_channel(caller, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ChannelCreateResponse {
            channel: ChannelResponse::from(channel),
        }),
    ))
}
