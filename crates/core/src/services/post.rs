//! Post service.

use crate::services::tag::TagService;
use chrono::{Duration, Utc};
use photogram_common::{AppResult, IdGenerator};
use photogram_db::{
    entities::post,
    repositories::{FollowingRepository, PostRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// How far back the home feed reaches, in days.
const FEED_WINDOW_DAYS: i64 = 14;

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    following_repo: FollowingRepository,
    tag_service: TagService,
    id_gen: IdGenerator,
}

/// Input for creating a new post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    /// Reference to the uploaded photo.
    #[validate(length(min = 1, max = 1024))]
    pub photo: String,

    #[validate(length(min = 1, max = 500))]
    pub caption: String,

    #[validate(length(max = 100))]
    #[serde(default)]
    pub location: String,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        following_repo: FollowingRepository,
        tag_service: TagService,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            following_repo,
            tag_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post for an author, deriving tag associations from the
    /// caption.
    ///
    /// Tags are resolved (get-or-create) up front; the post row and its
    /// associations are then written in a single transaction, so a failed
    /// association leaves no orphaned post behind.
    pub async fn create(&self, author_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        // Author must exist and be loadable
        let author = self.user_repo.get_by_id(author_id).await?;

        let tags = self.tag_service.resolve(&input.caption).await?;
        let tag_ids: Vec<String> = tags.into_iter().map(|t| t.id).collect();

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author.id),
            photo: Set(input.photo),
            caption: Set(input.caption),
            location: Set(input.location),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let post = self.post_repo.create_with_tags(model, &tag_ids).await?;

        tracing::debug!(post_id = %post.id, tags = tag_ids.len(), "Created post");

        Ok(post)
    }

    /// Get a post by ID.
    pub async fn get(&self, id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// Get the home feed for a user: posts by followed users and the user
    /// themself, within the feed window, newest-first.
    pub async fn home_feed(&self, user_id: &str) -> AppResult<Vec<post::Model>> {
        let mut author_ids = self.following_repo.find_following_ids(user_id).await?;
        author_ids.push(user_id.to_string());

        let since = (Utc::now() - Duration::days(FEED_WINDOW_DAYS)).into();
        self.post_repo.find_feed(&author_ids, since).await
    }

    /// Get the names of the tags associated with a post.
    pub async fn tag_names(&self, post_id: &str) -> AppResult<Vec<String>> {
        let tag_ids = self.post_repo.find_tag_ids(post_id).await?;
        let tags = self.tag_service.get_by_ids(&tag_ids).await?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photogram_db::entities::{following, user};
    use photogram_db::repositories::TagRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_post(id: &str, author_id: &str, caption: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            photo: format!("photos/{id}.jpg"),
            caption: caption.to_string(),
            location: String::new(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> PostService {
        PostService::new(
            PostRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            FollowingRepository::new(Arc::clone(&db)),
            TagService::new(TagRepository::new(db)),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_caption() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let input = CreatePostInput {
            photo: "photos/x.jpg".to_string(),
            caption: "a".repeat(501),
            location: String::new(),
        };

        let result = service(db).create("u1", input).await;
        assert!(matches!(
            result,
            Err(photogram_common::AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_caption() {
        // A request body without a caption must not deserialize
        let result: Result<CreatePostInput, _> =
            serde_json::from_str(r#"{"photo":"photos/x.jpg"}"#);
        assert!(result.is_err());

        // And an empty caption fails validation
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let input = CreatePostInput {
            photo: "photos/x.jpg".to_string(),
            caption: String::new(),
            location: String::new(),
        };

        let result = service(db).create("u1", input).await;
        assert!(matches!(
            result,
            Err(photogram_common::AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_photo() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let input = CreatePostInput {
            photo: String::new(),
            caption: "hello".to_string(),
            location: String::new(),
        };

        let result = service(db).create("u1", input).await;
        assert!(matches!(
            result,
            Err(photogram_common::AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_home_feed_includes_self() {
        let f1 = following::Model {
            id: "f1".to_string(),
            follower_id: "me".to_string(),
            followee_id: "a".to_string(),
            created_at: Utc::now().into(),
        };
        let p1 = create_test_post("p2", "me", "mine");
        let p2 = create_test_post("p1", "a", "theirs");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1]])
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let result = service(db).home_feed("me").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "p2");
    }

    #[tokio::test]
    async fn test_get_missing_post_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let result = service(db).get("missing").await;
        assert!(matches!(
            result,
            Err(photogram_common::AppError::PostNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_author_must_exist() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let input = CreatePostInput {
            photo: "photos/x.jpg".to_string(),
            caption: "hello".to_string(),
            location: String::new(),
        };

        let result = service(db).create("ghost", input).await;
        assert!(matches!(
            result,
            Err(photogram_common::AppError::UserNotFound(_))
        ));
    }
}
