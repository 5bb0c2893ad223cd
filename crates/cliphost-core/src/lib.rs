//! Cliphost Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! input validation shared across all cliphost components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, MediaBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use validation::{normalize_tags, parse_entity_id, require_trimmed, TagsInput};
