//! Cliphost Database Layer
//!
//! This crate provides database repositories and data access for users,
//! channels, and videos. Each repository exposes a trait so callers can
//! substitute in-memory implementations in tests, plus the Postgres
//! implementation used in production.

pub mod db;

pub use db::channels::{ChannelEdit, ChannelRepositoryTrait, NewChannel, PostgresChannelRepository};
pub use db::users::{PostgresUserRepository, UserRepositoryTrait};
pub use db::videos::{NewVideo, PostgresVideoRepository, VideoRepositoryTrait};

pub use db::transaction::TransactionGuard;
