//! Hashtag extraction and resolution.

use once_cell::sync::Lazy;
use photogram_common::AppResult;
use photogram_db::{entities::tag, repositories::TagRepository};
use regex::Regex;

/// Pattern matching a hashtag in caption text.
///
/// `\w` is Unicode-aware in the regex crate, so this covers Latin
/// alphanumerics as well as Hangul, CJK and other word scripts.
pub const HASHTAG_PATTERN: &str = r"#(\w+)";

#[allow(clippy::expect_used)]
static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(HASHTAG_PATTERN).expect("hashtag pattern must compile"));

/// Extract hashtag names from caption text, in order of appearance.
///
/// Repeated hashtags yield repeated occurrences; resolution collapses them
/// because the post-tag association is a set.
#[must_use]
pub fn extract_hashtags(caption: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(caption)
        .map(|c| c[1].to_string())
        .collect()
}

/// Tag service for business logic.
#[derive(Clone)]
pub struct TagService {
    tag_repo: TagRepository,
}

impl TagService {
    /// Create a new tag service.
    #[must_use]
    pub const fn new(tag_repo: TagRepository) -> Self {
        Self { tag_repo }
    }

    /// Extract hashtags from a caption and resolve each to a tag entity,
    /// creating tags that do not exist yet.
    ///
    /// The returned sequence preserves extraction order and may contain the
    /// same tag more than once.
    pub async fn resolve(&self, caption: &str) -> AppResult<Vec<tag::Model>> {
        let mut tags = Vec::new();
        for name in extract_hashtags(caption) {
            tags.push(self.tag_repo.get_or_create(&name).await?);
        }
        Ok(tags)
    }

    /// Get tags by IDs.
    pub async fn get_by_ids(&self, ids: &[String]) -> AppResult<Vec<tag::Model>> {
        self.tag_repo.find_by_ids(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[test]
    fn test_extract_basic() {
        let tags = extract_hashtags("#cat and #Dog123 and plain text");
        assert_eq!(tags, vec!["cat".to_string(), "Dog123".to_string()]);
    }

    #[test]
    fn test_extract_no_hashtags() {
        assert!(extract_hashtags("nothing to see here").is_empty());
    }

    #[test]
    fn test_extract_preserves_duplicates() {
        let tags = extract_hashtags("#cat #cat");
        assert_eq!(tags, vec!["cat".to_string(), "cat".to_string()]);
    }

    #[test]
    fn test_extract_preserves_case() {
        let tags = extract_hashtags("#Cat #cat");
        assert_eq!(tags, vec!["Cat".to_string(), "cat".to_string()]);
    }

    #[test]
    fn test_extract_korean() {
        let tags = extract_hashtags("오늘의 #고양이 사진 #멍멍이123");
        assert_eq!(tags, vec!["고양이".to_string(), "멍멍이123".to_string()]);
    }

    #[test]
    fn test_extract_stops_at_punctuation() {
        let tags = extract_hashtags("#sunset! #beach, done");
        assert_eq!(tags, vec!["sunset".to_string(), "beach".to_string()]);
    }

    #[test]
    fn test_bare_hash_is_not_a_tag() {
        assert!(extract_hashtags("# no tag here").is_empty());
    }

    fn create_test_tag(id: &str, name: &str) -> tag::Model {
        tag::Model {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_resolve_repeated_tag_resolves_to_same_entity() {
        let cat = create_test_tag("t1", "cat");

        // Two lookups, both finding the same existing row
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[cat.clone()]])
                .append_query_results([[cat.clone()]])
                .into_connection(),
        );

        let service = TagService::new(TagRepository::new(db));
        let resolved = service.resolve("#cat #cat").await.unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].id, "t1");
        assert_eq!(resolved[1].id, "t1");
    }

    #[tokio::test]
    async fn test_resolve_empty_caption() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let service = TagService::new(TagRepository::new(db));
        let resolved = service.resolve("no tags").await.unwrap();

        assert!(resolved.is_empty());
    }
}
