//! Post endpoints.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use photogram_common::AppResult;
use photogram_core::CreatePostInput;
use photogram_db::entities::{post, user};
use serde::Serialize;
use tracing::debug;

use crate::{
    endpoints::comments::CommentResponse,
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Post author, embedded in post payloads.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
}

impl From<user::Model> for AuthorResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
        }
    }
}

/// Post response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub created_at: String,
    pub author: Option<AuthorResponse>,
    pub photo: String,
    pub caption: String,
    pub location: String,
    pub tags: Vec<String>,
    pub like_count: u64,
    pub is_liked: bool,
}

impl From<post::Model> for PostResponse {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            created_at: post.created_at.to_rfc3339(),
            author: None,
            photo: post.photo,
            caption: post.caption,
            location: post.location,
            tags: Vec::new(),
            like_count: 0,
            is_liked: false,
        }
    }
}

/// Post detail response: the post plus its comments, newest first.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

/// Enrich raw post models with author, tag names and like data.
pub(crate) async fn build_post_responses(
    state: &AppState,
    posts: Vec<post::Model>,
    viewer_id: Option<&str>,
) -> AppResult<Vec<PostResponse>> {
    let mut author_ids: Vec<String> = posts.iter().map(|p| p.author_id.clone()).collect();
    author_ids.sort();
    author_ids.dedup();

    let authors: HashMap<String, user::Model> = state
        .user_service
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let mut responses = Vec::with_capacity(posts.len());
    for post in posts {
        let tags = state.post_service.tag_names(&post.id).await?;
        let like_count = state.like_service.count(&post.id).await?;
        let is_liked = match viewer_id {
            Some(viewer) => state.like_service.is_liked(viewer, &post.id).await?,
            None => false,
        };

        let author = authors.get(&post.author_id).cloned().map(Into::into);

        let mut response: PostResponse = post.into();
        response.author = author;
        response.tags = tags;
        response.like_count = like_count;
        response.is_liked = is_liked;
        responses.push(response);
    }

    Ok(responses)
}

/// Create a new post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.create(&user.id, input).await?;
    debug!(post_id = %post.id, author = %user.username, "post created");

    let mut responses = build_post_responses(&state, vec![post], Some(&user.id)).await?;
    let response = responses.remove(0);

    Ok(ApiResponse::ok(response))
}

/// Get a single post with its comments.
async fn detail(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());

    let post = state.post_service.get(&id).await?;
    let mut responses = build_post_responses(&state, vec![post], viewer_id).await?;
    let post = responses.remove(0);

    let comments = crate::endpoints::comments::build_comment_responses(
        &state,
        state.comment_service.list_for_post(&id).await?,
    )
    .await?;

    Ok(ApiResponse::ok(PostDetailResponse { post, comments }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", axum::routing::post(create))
        .route("/{id}", get(detail))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_post() -> post::Model {
        post::Model {
            id: "01hzx5pq6k3tv8r2m9w4e7n0aa".to_string(),
            author_id: "01hzx5pq6k3tv8r2m9w4e7n0ab".to_string(),
            photo: "photos/sunset.jpg".to_string(),
            caption: "Evening #sunset".to_string(),
            location: "Lisbon".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_post_response_serialization() {
        let mut response: PostResponse = sample_post().into();
        response.tags = vec!["sunset".to_string()];
        response.like_count = 2;

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"likeCount\":2"));
        assert!(json.contains("\"isLiked\":false"));
        assert!(json.contains("\"tags\":[\"sunset\"]"));
        assert!(json.contains("\"createdAt\""));
    }

    #[test]
    fn test_post_detail_flattens_post_fields() {
        let detail = PostDetailResponse {
            post: sample_post().into(),
            comments: Vec::new(),
        };

        let json = serde_json::to_string(&detail).unwrap();
        // Flattened: post fields sit next to comments, not under a nested key
        assert!(json.contains("\"photo\":\"photos/sunset.jpg\""));
        assert!(json.contains("\"comments\":[]"));
        assert!(!json.contains("\"post\":"));
    }
}
