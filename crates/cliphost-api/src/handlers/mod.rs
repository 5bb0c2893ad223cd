//! HTTP request handlers.

pub mod channel_create;
pub mod channel_edit;
pub mod channel_get;
pub mod health;
pub mod video_get;
pub mod video_upload;
