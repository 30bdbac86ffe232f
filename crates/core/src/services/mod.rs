//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod following;
pub mod like;
pub mod post;
pub mod tag;
pub mod user;

pub use comment::{CommentService, CreateCommentInput};
pub use following::FollowingService;
pub use like::LikeService;
pub use post::{CreatePostInput, PostService};
pub use tag::{TagService, extract_hashtags};
pub use user::{RegisterInput, UserPage, UserService};
