use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{datetime_format, AuthorSummary, CommentView};

/// Discover feed row: a post with its counts, the viewer's like state and
/// its full comment thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverPost {
    pub post_id: i64,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub user_liked: bool,
    pub comments: Vec<CommentView>,
    pub author: AuthorSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPost {
    pub post_id: i64,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub likes_count: i64,
    pub comments_count: i64,
    /// likes_count + comments_count
    pub engagement_score: i64,
}

/// Engagement on one user's posts created on a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEngagement {
    pub date: NaiveDate,
    pub posts_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_posts: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub average_likes_per_post: f64,
    pub average_comments_per_post: f64,
}

impl UserStats {
    /// Build stats from raw totals. Averages are zero when there are no posts.
    pub fn from_totals(total_posts: i64, total_likes: i64, total_comments: i64) -> Self {
        let average = |total: i64| {
            if total_posts == 0 {
                0.0
            } else {
                total as f64 / total_posts as f64
            }
        };

        Self {
            total_posts,
            total_likes,
            total_comments,
            average_likes_per_post: average(total_likes),
            average_comments_per_post: average(total_comments),
        }
    }
}

/// Public profile of any user with received-engagement totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub user_id: i64,
    pub username: String,
    pub name: String,
    pub posts_count: i64,
    pub total_likes_received: i64,
    pub total_comments_received: i64,
    pub followers_count: i64,
    pub following_count: i64,
}

/// The caller's own profile, including private fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnProfile {
    pub user_id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub posts_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscoverResponse {
    pub posts: Vec<DiscoverPost>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopPostsResponse {
    pub top_posts: Vec<TopPost>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EngagementByDateResponse {
    pub engagement_by_date: Vec<DailyEngagement>,
}
