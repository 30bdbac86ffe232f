//! Like service.

use photogram_common::AppResult;
use photogram_db::repositories::{LikeRepository, PostRepository};

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(like_repo: LikeRepository, post_repo: PostRepository) -> Self {
        Self {
            like_repo,
            post_repo,
        }
    }

    /// Like a post. Idempotent: liking an already liked post is a no-op.
    pub async fn like(&self, user_id: &str, post_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;
        self.like_repo.like(user_id, &post.id).await
    }

    /// Unlike a post. Idempotent: unliking a non-liked post is a no-op.
    pub async fn unlike(&self, user_id: &str, post_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;
        self.like_repo.unlike(user_id, &post.id).await
    }

    /// Check whether a user has liked a post.
    pub async fn is_liked(&self, user_id: &str, post_id: &str) -> AppResult<bool> {
        self.like_repo.is_liked(user_id, post_id).await
    }

    /// Count likes on a post.
    pub async fn count(&self, post_id: &str) -> AppResult<u64> {
        self.like_repo.count_for_post(post_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use photogram_db::entities::{post, post_like};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_post(id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: "u9".to_string(),
            photo: "photos/x.jpg".to_string(),
            caption: String::new(),
            location: String::new(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> LikeService {
        LikeService::new(
            LikeRepository::new(Arc::clone(&db)),
            PostRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_like_missing_post_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let result = service(db).like("u1", "missing").await;
        assert!(matches!(
            result,
            Err(photogram_common::AppError::PostNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_like_already_liked_is_noop() {
        let post = create_test_post("p1");
        let existing = post_like::Model {
            id: "l1".to_string(),
            user_id: "u1".to_string(),
            post_id: "p1".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_query_results([[existing]])
                .into_connection(),
        );

        service(db).like("u1", "p1").await.unwrap();
    }

    #[tokio::test]
    async fn test_unlike_non_liked_is_noop() {
        let post = create_test_post("p1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_query_results([Vec::<post_like::Model>::new()])
                .into_connection(),
        );

        service(db).unlike("u1", "p1").await.unwrap();
    }
}
