//! Comment service.

use chrono::Utc;
use photogram_common::{AppResult, IdGenerator};
use photogram_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 3000))]
    pub message: String,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a comment on a post.
    pub async fn create(
        &self,
        post_id: &str,
        author_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        // The target post must exist
        let post = self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author_id.to_string()),
            post_id: Set(post.id),
            message: Set(input.message),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.comment_repo.create(model).await
    }

    /// Get all comments on a post, newest-first.
    pub async fn list_for_post(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_post(post_id).await
    }
}
