//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, PostTag, post, post_tag};
use chrono::{DateTime, FixedOffset};
use photogram_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a post and its tag associations in one transaction.
    ///
    /// The post row must exist before the join rows can reference it; the
    /// transaction makes sure a failed association also rolls the post back.
    /// Duplicate tag IDs collapse to a single join row.
    pub async fn create_with_tags(
        &self,
        model: post::ActiveModel,
        tag_ids: &[String],
    ) -> AppResult<post::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let post = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut seen: Vec<&String> = Vec::new();
        for tag_id in tag_ids {
            if seen.contains(&tag_id) {
                continue;
            }
            seen.push(tag_id);

            let assoc = post_tag::ActiveModel {
                id: Set(self.id_gen.generate()),
                post_id: Set(post.id.clone()),
                tag_id: Set(tag_id.clone()),
            };
            assoc
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(post)
    }

    /// Get the home feed: posts by the given authors, no older than `since`,
    /// newest-first.
    pub async fn find_feed(
        &self,
        author_ids: &[String],
        since: DateTime<FixedOffset>,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::AuthorId.is_in(author_ids.to_vec()))
            .filter(post::Column::CreatedAt.gte(since))
            .order_by_desc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all posts by an author, newest-first.
    pub async fn find_by_author(&self, author_id: &str) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count posts by an author.
    pub async fn count_by_author(&self, author_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the tag IDs associated with a post.
    pub async fn find_tag_ids(&self, post_id: &str) -> AppResult<Vec<String>> {
        let rows = PostTag::find()
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.tag_id).collect())
    }
}
