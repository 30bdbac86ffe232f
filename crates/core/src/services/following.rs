//! Following service.

use chrono::Utc;
use photogram_common::{AppError, AppResult, IdGenerator};
use photogram_db::{
    entities::following,
    repositories::{FollowingRepository, UserRepository},
};
use sea_orm::Set;

/// Following service for business logic.
#[derive(Clone)]
pub struct FollowingService {
    following_repo: FollowingRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub fn new(following_repo: FollowingRepository, user_repo: UserRepository) -> Self {
        Self {
            following_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        // Can't follow yourself
        if follower_id == followee_id {
            return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
        }

        if self
            .following_repo
            .is_following(follower_id, followee_id)
            .await?
        {
            return Err(AppError::BadRequest("Already following".to_string()));
        }

        // Both users must exist
        let follower = self.user_repo.get_by_id(follower_id).await?;
        let followee = self.user_repo.get_by_id(followee_id).await?;

        let model = following::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower.id),
            followee_id: Set(followee.id),
            created_at: Set(Utc::now().into()),
        };

        self.following_repo.create(model).await?;
        Ok(())
    }

    /// Unfollow a user. A no-op when not following.
    pub async fn unfollow(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        self.following_repo
            .delete_by_pair(follower_id, followee_id)
            .await
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        self.following_repo
            .is_following(follower_id, followee_id)
            .await
    }
}
