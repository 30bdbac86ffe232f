//! HTTP API layer for photogram.
//!
//! This crate provides the JSON REST API:
//!
//! - **Endpoints**: timeline, posts, comments, likes, users, auth
//! - **Extractors**: required and optional bearer-token authentication
//! - **Middleware**: token resolution, request tracing
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
