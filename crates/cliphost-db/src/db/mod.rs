//! Database repositories for the data access layer
//!
//! Repositories are organized per entity. Each provides a trait for the
//! operations the service layer needs, and the Postgres implementation
//! scoped to a `PgPool`.

pub mod channels;
pub mod transaction;
pub mod users;
pub mod videos;

pub use channels::{ChannelRepositoryTrait, PostgresChannelRepository as ChannelRepository};
pub use users::{PostgresUserRepository as UserRepository, UserRepositoryTrait};
pub use videos::{PostgresVideoRepository as VideoRepository, VideoRepositoryTrait};
