//! User endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use photogram_common::AppResult;
use serde::Serialize;

use crate::{
    endpoints::{AuthorResponse, PostResponse, build_post_responses},
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// User page response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPageResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub created_at: String,
    pub post_count: u64,
    pub is_follow: bool,
    pub posts: Vec<PostResponse>,
}

/// Get a user's page: profile, their posts newest first, post count and
/// whether the viewer follows them.
async fn page(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<UserPageResponse>> {
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());

    let page = state.user_service.page(&username, viewer_id).await?;
    let posts = build_post_responses(&state, page.posts, viewer_id).await?;

    Ok(ApiResponse::ok(UserPageResponse {
        id: page.user.id,
        username: page.user.username,
        name: page.user.name,
        created_at: page.user.created_at.to_rfc3339(),
        post_count: page.post_count,
        is_follow: page.is_follow,
        posts,
    }))
}

/// Get follow suggestions: up to three active users the viewer does not
/// already follow.
async fn suggestions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AuthorResponse>>> {
    let users = state.user_service.suggestions(&user.id).await?;

    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Follow a user by username.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let followee = state.user_service.get_active_by_username(&username).await?;
    state.following_service.follow(&user.id, &followee.id).await?;

    Ok(ApiResponse::ok(()))
}

/// Unfollow a user by username. Unfollowing a user who is not followed is a
/// no-op.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let followee = state.user_service.get_active_by_username(&username).await?;
    state
        .following_service
        .unfollow(&user.id, &followee.id)
        .await?;

    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suggestions", get(suggestions))
        .route("/{username}", get(page))
        .route("/{username}/follow", post(follow))
        .route("/{username}/unfollow", post(unfollow))
}
