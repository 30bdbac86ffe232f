//! User service.

use chrono::Utc;
use photogram_common::{AppError, AppResult, IdGenerator};
use photogram_db::{
    entities::{post, user},
    repositories::{FollowingRepository, PostRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// How many follow suggestions a user receives.
const SUGGESTION_LIMIT: u64 = 3;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    post_repo: PostRepository,
    following_repo: FollowingRepository,
    id_gen: IdGenerator,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 30))]
    pub username: String,

    #[validate(length(max = 100))]
    pub name: Option<String>,
}

/// A user's profile page: their posts, post count and whether the viewer
/// follows them.
pub struct UserPage {
    pub user: user::Model,
    pub posts: Vec<post::Model>,
    pub post_count: u64,
    pub is_follow: bool,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        post_repo: PostRepository,
        following_repo: FollowingRepository,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            following_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user and issue an access token.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Username already taken: {}",
                input.username
            )));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            name: Set(input.name),
            token: Set(Some(self.id_gen.generate_token())),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        match self.user_repo.create(model).await {
            Ok(user) => Ok(user),
            Err(create_err) => {
                // A concurrent registration can win the race between the
                // availability check and the insert; the unique index on
                // username rejects the loser, which is still a conflict,
                // not a storage failure
                if self
                    .user_repo
                    .find_by_username(&input.username)
                    .await?
                    .is_some()
                {
                    return Err(AppError::Conflict(format!(
                        "Username already taken: {}",
                        input.username
                    )));
                }
                Err(create_err)
            }
        }
    }

    /// Resolve a bearer token to an active user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Resolve an active user by username.
    pub async fn get_active_by_username(&self, username: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

        // Inactive users are indistinguishable from absent ones
        if !user.is_active {
            return Err(AppError::UserNotFound(username.to_string()));
        }

        Ok(user)
    }

    /// Build a user's profile page.
    ///
    /// `viewer_id` is the authenticated viewer, if any; `is_follow` is false
    /// for anonymous viewers.
    pub async fn page(&self, username: &str, viewer_id: Option<&str>) -> AppResult<UserPage> {
        let user = self.get_active_by_username(username).await?;

        let posts = self.post_repo.find_by_author(&user.id).await?;
        let post_count = self.post_repo.count_by_author(&user.id).await?;

        let is_follow = match viewer_id {
            Some(viewer) => self.following_repo.is_following(viewer, &user.id).await?,
            None => false,
        };

        Ok(UserPage {
            user,
            posts,
            post_count,
            is_follow,
        })
    }

    /// Suggest up to three active users the requester does not follow yet,
    /// excluding the requester.
    pub async fn suggestions(&self, user_id: &str) -> AppResult<Vec<user::Model>> {
        let mut exclude = self.following_repo.find_following_ids(user_id).await?;
        exclude.push(user_id.to_string());

        self.user_repo
            .find_active_excluding(&exclude, SUGGESTION_LIMIT)
            .await
    }

    /// Find users by IDs (for enriching post listings with author data).
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_by_ids(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photogram_db::entities::following;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str, is_active: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            name: None,
            token: Some(format!("token_{id}")),
            is_active,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> UserService {
        UserService::new(
            UserRepository::new(Arc::clone(&db)),
            PostRepository::new(Arc::clone(&db)),
            FollowingRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_page_unknown_username_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service(db).page("nobody", None).await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_page_inactive_user_is_not_found() {
        let inactive = create_test_user("u1", "ghost", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inactive]])
                .into_connection(),
        );

        let result = service(db).page("ghost", None).await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_page_empty_posts_and_zero_count() {
        let alice = create_test_user("u1", "alice", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[alice]])
                .append_query_results([Vec::<post::Model>::new()])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let page = service(db).page("alice", None).await.unwrap();

        assert!(page.posts.is_empty());
        assert_eq!(page.post_count, 0);
        assert!(!page.is_follow);
    }

    #[tokio::test]
    async fn test_authenticate_inactive_user_is_unauthorized() {
        let inactive = create_test_user("u1", "ghost", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inactive]])
                .into_connection(),
        );

        let result = service(db).authenticate_by_token("token_u1").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_register_taken_username_is_conflict() {
        let existing = create_test_user("u1", "alice", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let input = RegisterInput {
            username: "alice".to_string(),
            name: None,
        };

        let result = service(db).register(input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_lost_race_is_conflict() {
        let existing = create_test_user("u1", "alice", true);

        // Availability check sees nothing, the insert hits the unique
        // index, the re-check finds the winner's row
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .append_query_errors([sea_orm::DbErr::Custom(
                    "duplicate key value violates unique constraint \"idx_user_username\""
                        .to_string(),
                )])
                .append_query_results([[existing]])
                .into_connection(),
        );

        let input = RegisterInput {
            username: "alice".to_string(),
            name: None,
        };

        let result = service(db).register(input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_suggestions_exclude_followed_and_self() {
        let f1 = following::Model {
            id: "f1".to_string(),
            follower_id: "me".to_string(),
            followee_id: "a".to_string(),
            created_at: Utc::now().into(),
        };
        let b = create_test_user("b", "bob", true);
        let c = create_test_user("c", "carol", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1]])
                .append_query_results([[b, c]])
                .into_connection(),
        );

        let result = service(db).suggestions("me").await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|u| u.id != "me" && u.id != "a"));
    }
}
