//! Media storage backends.
//!
//! Uploaded binaries never live in Postgres; they are pushed to a media
//! store and only their public URLs are persisted. Two backends exist:
//! a remote hosting service (production) and the local filesystem
//! (development and tests), both behind the [`MediaStore`] trait.

pub mod factory;
pub mod local;
pub mod remote;
pub mod traits;

pub use factory::create_media_store;
pub use local::LocalMediaStore;
pub use remote::RemoteMediaStore;
pub use traits::{
    DerivedSpec, MediaFolder, MediaStore, MediaStoreError, MediaStoreResult, ResourceKind,
    StoredMedia, UploadRequest,
};
