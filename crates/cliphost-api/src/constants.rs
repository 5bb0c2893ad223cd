//! API constants
//!
//! Route registration and the OpenAPI annotations share this prefix; the
//! annotations spell it out literally, so bump both when the version changes.

/// API base path prefix, including version.
pub const API_PREFIX: &str = "/api/v1";
