//! Bearer-token authentication: claims, identity extraction, middleware.

pub mod middleware;
pub mod models;
