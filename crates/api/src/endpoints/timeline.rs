//! Timeline endpoints.

use axum::{Router, extract::State, routing::get};
use photogram_common::AppResult;

use crate::{
    endpoints::{PostResponse, build_post_responses},
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Get the home feed: recent posts from followed users and the viewer,
/// newest first.
async fn home(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let posts = state.post_service.home_feed(&user.id).await?;
    let responses = build_post_responses(&state, posts, Some(&user.id)).await?;

    Ok(ApiResponse::ok(responses))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/home", get(home))
}
