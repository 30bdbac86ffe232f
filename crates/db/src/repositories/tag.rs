//! Tag repository.

use std::sync::Arc;

use crate::entities::{Tag, tag};
use chrono::Utc;
use photogram_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find a tag by its exact name.
    ///
    /// Tag names are case-sensitive: `cat` and `Cat` are distinct tags.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get or create a tag by name.
    ///
    /// A concurrent create can win the race between the lookup and the
    /// insert; the unique constraint on `name` rejects the loser, which
    /// re-fetches and returns the existing row.
    pub async fn get_or_create(&self, name: &str) -> AppResult<tag::Model> {
        if let Some(tag) = self.find_by_name(name).await? {
            return Ok(tag);
        }

        let model = tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        };

        match model.insert(self.db.as_ref()).await {
            Ok(tag) => Ok(tag),
            Err(insert_err) => {
                // Lost the race: the row should exist now
                if let Some(tag) = self.find_by_name(name).await? {
                    return Ok(tag);
                }
                Err(AppError::Database(insert_err.to_string()))
            }
        }
    }

    /// Find tags by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<tag::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Tag::find()
            .filter(tag::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
