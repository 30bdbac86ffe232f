//! Database entities.

#![allow(missing_docs)]

pub mod comment;
pub mod following;
pub mod post;
pub mod post_like;
pub mod post_tag;
pub mod tag;
pub mod user;

pub use comment::Entity as Comment;
pub use following::Entity as Following;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use post_tag::Entity as PostTag;
pub use tag::Entity as Tag;
pub use user::Entity as User;
