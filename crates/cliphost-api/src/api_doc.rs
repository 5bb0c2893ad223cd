//! OpenAPI documentation, served at /api/openapi.json and rendered at /docs.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use cliphost_core::models;

/// The OpenAPI spec for this service.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cliphost API",
        version = "0.1.0",
        description = "Video hosting backend: channels, uploads, and public video reads. Binaries go to an external media store; only their URLs are persisted."
    ),
    paths(
        // Channels
        handlers::channel_create::create_channel,
        handlers::channel_edit::edit_channel,
        handlers::channel_get::get_channel,
        // Videos
        handlers::video_upload::upload_video,
        handlers::video_get::get_video,
        handlers::video_get::list_videos,
    ),
    components(
        schemas(
            models::ChannelResponse,
            models::ChannelDetailResponse,
            models::ChannelSummary,
            models::VideoResponse,
            models::VideoWithChannelResponse,
            models::VideoSummary,
            handlers::channel_create::ChannelCreateResponse,
            handlers::channel_edit::ChannelEditResponse,
            handlers::channel_get::ChannelGetResponse,
            handlers::video_upload::VideoUploadResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "channels", description = "Channel creation, editing, and public channel pages"),
        (name = "videos", description = "Video upload and public video reads")
    )
)]
pub struct ApiDoc;
