mod user_repository;
mod post_repository;
mod comment_repository;
mod like_repository;
mod follow_repository;
mod engagement_repository;

pub use user_repository::UserRepository;
pub use post_repository::PostRepository;
pub use comment_repository::CommentRepository;
pub use like_repository::LikeRepository;
pub use follow_repository::FollowRepository;
pub use engagement_repository::{DiscoverFilter, EngagementRepository};
