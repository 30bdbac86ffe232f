//! Comment endpoints.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use photogram_common::AppResult;
use photogram_core::CreateCommentInput;
use photogram_db::entities::{comment, user};
use serde::Serialize;

use crate::{
    endpoints::posts::AuthorResponse, extractors::AuthUser, middleware::AppState,
    response::ApiResponse,
};

/// Comment response.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author: Option<AuthorResponse>,
    pub message: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author: None,
            message: comment.message,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Enrich comment models with their authors.
pub(crate) async fn build_comment_responses(
    state: &AppState,
    comments: Vec<comment::Model>,
) -> AppResult<Vec<CommentResponse>> {
    let mut author_ids: Vec<String> = comments.iter().map(|c| c.author_id.clone()).collect();
    author_ids.sort();
    author_ids.dedup();

    let authors: HashMap<String, user::Model> = state
        .user_service
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    Ok(comments
        .into_iter()
        .map(|c| {
            let author = authors.get(&c.author_id).cloned().map(Into::into);
            let mut response: CommentResponse = c.into();
            response.author = author;
            response
        })
        .collect())
}

/// Comment on a post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state.comment_service.create(&id, &user.id, input).await?;

    let mut response: CommentResponse = comment.into();
    response.author = Some(user.into());

    Ok(ApiResponse::ok(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/comments/create", post(create))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_comment_response_serialization() {
        let model = comment::Model {
            id: "01hzx5pq6k3tv8r2m9w4e7n0ac".to_string(),
            author_id: "01hzx5pq6k3tv8r2m9w4e7n0ab".to_string(),
            post_id: "01hzx5pq6k3tv8r2m9w4e7n0aa".to_string(),
            message: "nice shot".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let response: CommentResponse = model.into();
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"postId\":\"01hzx5pq6k3tv8r2m9w4e7n0aa\""));
        assert!(json.contains("\"message\":\"nice shot\""));
        assert!(json.contains("\"createdAt\""));
    }
}
