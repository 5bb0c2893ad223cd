//! Cliphost API Library
//!
//! HTTP surface of the video hosting backend: handlers, identity middleware,
//! ingestion workflows, and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;
pub mod test_support;
pub mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
