//! Input validation helpers
//!
//! Small, side-effect-free checks shared by the handlers and the ingestion
//! service. Everything here runs before any store or database call.

use uuid::Uuid;

use crate::constants::MAX_TAGS_PER_VIDEO;
use crate::error::AppError;

/// Tags arrive in one of two request forms: a sequence of entries (repeated
/// multipart fields) or a single comma-delimited string.
#[derive(Debug, Clone)]
pub enum TagsInput {
    Sequence(Vec<String>),
    Delimited(String),
}

/// Normalize tags from either input form: trim each entry, drop entries that
/// are empty after trimming, and keep at most [`MAX_TAGS_PER_VIDEO`].
pub fn normalize_tags(input: TagsInput) -> Vec<String> {
    let entries = match input {
        TagsInput::Sequence(entries) => entries,
        TagsInput::Delimited(raw) => raw.split(',').map(str::to_string).collect(),
    };

    entries
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .take(MAX_TAGS_PER_VIDEO)
        .map(str::to_string)
        .collect()
}

/// Parse a path identifier, rejecting malformed values before any store
/// query. `error_message` is the exact client-facing message for this route.
pub fn parse_entity_id(value: &str, error_message: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|_| AppError::Validation(error_message.to_string()))
}

/// Trim a required text field, rejecting missing or blank values.
pub fn require_trimmed(value: Option<&str>, error_message: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(AppError::Validation(error_message.to_string())),
    }
}
