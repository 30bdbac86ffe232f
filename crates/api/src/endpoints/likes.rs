//! Like endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};
use photogram_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Like a post. Liking an already-liked post is a no-op.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.like_service.like(&user.id, &id).await?;
    Ok(ApiResponse::ok(()))
}

/// Remove a like. Unliking a post that is not liked is a no-op.
async fn unlike(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.like_service.unlike(&user.id, &id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/like", post(like))
        .route("/{id}/unlike", post(unlike))
}
