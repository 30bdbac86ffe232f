//! Post like repository.

use std::sync::Arc;

use crate::entities::{PostLike, post_like};
use chrono::Utc;
use photogram_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set,
};

/// Post like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find a like by user and post.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        post_id: &str,
    ) -> AppResult<Option<post_like::Model>> {
        PostLike::find()
            .filter(post_like::Column::UserId.eq(user_id))
            .filter(post_like::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a user has liked a post.
    pub async fn is_liked(&self, user_id: &str, post_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, post_id).await?.is_some())
    }

    /// Add a user to a post's liked-by set. Idempotent: liking an already
    /// liked post is a no-op.
    ///
    /// The unique `(user_id, post_id)` constraint arbitrates concurrent
    /// duplicates; losing that race also counts as success.
    pub async fn like(&self, user_id: &str, post_id: &str) -> AppResult<()> {
        if self.is_liked(user_id, post_id).await? {
            return Ok(());
        }

        let model = post_like::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            post_id: Set(post_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        match model.insert(self.db.as_ref()).await {
            Ok(_) => Ok(()),
            Err(insert_err) => {
                if self.is_liked(user_id, post_id).await? {
                    return Ok(());
                }
                Err(AppError::Database(insert_err.to_string()))
            }
        }
    }

    /// Remove a user from a post's liked-by set. Idempotent: unliking a
    /// post that was never liked is a no-op.
    pub async fn unlike(&self, user_id: &str, post_id: &str) -> AppResult<()> {
        if let Some(like) = self.find_by_pair(user_id, post_id).await? {
            like.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Count likes on a post.
    pub async fn count_for_post(&self, post_id: &str) -> AppResult<u64> {
        PostLike::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_like(id: &str, user_id: &str, post_id: &str) -> post_like::Model {
        post_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            post_id: post_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_liked_true() {
        let like = create_test_like("l1", "u1", "p1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(repo.is_liked("u1", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_liked_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post_like::Model>::new()])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(!repo.is_liked("u1", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_like_already_present_is_noop() {
        let like = create_test_like("l1", "u1", "p1");

        // Single query result: the membership check finds the row and no
        // insert is attempted.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        repo.like("u1", "p1").await.unwrap();
    }

    #[tokio::test]
    async fn test_unlike_absent_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post_like::Model>::new()])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        repo.unlike("u1", "p1").await.unwrap();
    }
}
