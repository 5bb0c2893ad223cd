//! Data models for the application
//!
//! This module contains all data structures used throughout the application,
//! organized by entity. Each entity module carries the database-facing struct
//! plus its wire-facing response DTOs.

mod channel;
mod user;
mod video;

// Re-export all models for convenient imports
pub use channel::*;
pub use user::*;
pub use video::*;
