//! API endpoints.

mod auth;
mod comments;
mod likes;
mod posts;
mod timeline;
mod users;

use axum::Router;

use crate::middleware::AppState;

pub(crate) use posts::{AuthorResponse, PostResponse, build_post_responses};

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/timeline", timeline::router())
        .nest(
            "/posts",
            posts::router()
                .merge(likes::router())
                .merge(comments::router()),
        )
        .nest("/users", users::router())
}
