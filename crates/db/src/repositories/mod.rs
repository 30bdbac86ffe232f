//! Repository layer over the database connection.

mod comment;
mod following;
mod like;
mod post;
mod tag;
mod user;

pub use comment::CommentRepository;
pub use following::FollowingRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
