//! Application services.

mod ingestion;

pub use ingestion::{ChannelCreateInput, ChannelEditInput, IngestionService, VideoUploadInput};
