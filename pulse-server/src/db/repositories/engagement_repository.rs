//! Engagement aggregation.
//!
//! Every figure here is recomputed from the base tables on each call: there
//! are no denormalized counters, so results always match the current rows.
//! Likes and comments are both left-joined onto posts, which multiplies rows
//! per post; all counts therefore use `COUNT(DISTINCT ...)`.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use pulse_types::{
    AuthorSummary, DailyEngagement, DiscoverPost, OwnPost, OwnProfile, PostPreview,
    ProfileSummary, TopPost, UserStats,
};

use super::{CommentRepository, FollowRepository, LikeRepository, PostRepository, UserRepository};
use crate::db::timestamps;

pub const DISCOVER_LIMIT: i64 = 20;
pub const ENGAGEMENT_DAYS_LIMIT: i64 = 30;
pub const TOP_POSTS_LIMIT: i64 = 10;
pub const PROFILE_POSTS_LIMIT: i64 = 5;

/// Optional filters for the discover feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverFilter {
    /// Inclusive lower bound, from the start of this day
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound, through the end of this day
    pub date_to: Option<NaiveDate>,
    /// Minimum number of likes, applied after aggregation
    pub min_likes: Option<i64>,
    /// Case-insensitive substring of the author's username
    pub author: Option<String>,
}

impl DiscoverFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Values that cannot be interpreted are ignored rather than rejected.
    pub fn from_params(
        date_from: Option<&str>,
        date_to: Option<&str>,
        min_likes: Option<&str>,
        author: Option<&str>,
    ) -> Self {
        Self {
            date_from: date_from.and_then(parse_day),
            date_to: date_to.and_then(parse_day),
            min_likes: min_likes.and_then(parse_min_likes),
            author: author.filter(|a| !a.is_empty()).map(str::to_string),
        }
    }
}

/// Accepts `YYYY-MM-DD` or an ISO 8601 datetime; only the date part is kept
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(day);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    match chrono::DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.date_naive()),
        Err(_) => {
            tracing::debug!("Ignoring unparseable date filter: {}", value);
            None
        }
    }
}

/// Only plain non-negative integers count as a likes threshold; values past
/// `i64::MAX` saturate so they still exclude every post
fn parse_min_likes(value: &str) -> Option<i64> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        tracing::debug!("Ignoring non-numeric min_likes filter: {}", value);
        return None;
    }
    Some(value.parse().unwrap_or(i64::MAX))
}

/// Escape LIKE wildcards so user input matches literally (ESCAPE '\')
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub struct EngagementRepository<'a> {
    conn: &'a Connection,
}

impl<'a> EngagementRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Recent posts from everyone, with counts, the viewer's like state and comments
    pub fn discover(&self, filter: &DiscoverFilter, viewer_id: i64) -> Result<Vec<DiscoverPost>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(day) = filter.date_from {
            conditions.push("p.created_at >= ?");
            params.push(Value::Text(timestamps::start_of_day(day)));
        }
        if let Some(day) = filter.date_to {
            conditions.push("p.created_at <= ?");
            params.push(Value::Text(timestamps::end_of_day(day)));
        }
        if let Some(author) = &filter.author {
            // Both sides go through SQLite's LOWER so the folding matches
            conditions.push("LOWER(u.username) LIKE LOWER(?) ESCAPE '\\'");
            params.push(Value::Text(format!("%{}%", escape_like(author))));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let having_clause = match filter.min_likes {
            Some(min_likes) => {
                params.push(Value::Integer(min_likes));
                "HAVING COUNT(DISTINCT l.like_id) >= ?"
            }
            None => "",
        };
        params.push(Value::Integer(DISCOVER_LIMIT));

        let query = format!(
            "SELECT p.post_id, p.content, p.created_at, u.user_id, u.username, u.name,
                    COUNT(DISTINCT l.like_id) AS likes_count,
                    COUNT(DISTINCT c.comment_id) AS comments_count
             FROM posts p
             JOIN users u ON u.user_id = p.user_id
             LEFT JOIN likes l ON l.post_id = p.post_id
             LEFT JOIN comments c ON c.post_id = p.post_id
             {}
             GROUP BY p.post_id, u.user_id
             {}
             ORDER BY p.created_at DESC, p.post_id DESC
             LIMIT ?",
            where_clause, having_clause
        );

        let mut stmt = self.conn.prepare(&query)?;
        let mut posts = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                Ok(DiscoverPost {
                    post_id: row.get(0)?,
                    content: row.get(1)?,
                    created_at: timestamps::from_db(2, row.get(2)?)?,
                    author: AuthorSummary {
                        user_id: row.get(3)?,
                        username: row.get(4)?,
                        name: row.get(5)?,
                    },
                    likes_count: row.get(6)?,
                    comments_count: row.get(7)?,
                    user_liked: false, // Populated per row below
                    comments: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let likes = LikeRepository::new(self.conn);
        let comments = CommentRepository::new(self.conn);
        for post in &mut posts {
            post.user_liked = likes.has_liked(post.post_id, viewer_id)?;
            post.comments = comments.list_for_post(post.post_id)?;
        }

        Ok(posts)
    }

    /// Posts, likes and comments on one user's posts, grouped by creation day
    pub fn engagement_by_date(&self, user_id: i64) -> Result<Vec<DailyEngagement>> {
        let mut stmt = self.conn.prepare(
            "SELECT date(p.created_at) AS day,
                    COUNT(DISTINCT p.post_id),
                    COUNT(DISTINCT l.like_id),
                    COUNT(DISTINCT c.comment_id)
             FROM posts p
             LEFT JOIN likes l ON l.post_id = p.post_id
             LEFT JOIN comments c ON c.post_id = p.post_id
             WHERE p.user_id = ?
             GROUP BY day
             ORDER BY day DESC
             LIMIT ?",
        )?;

        let rows = stmt
            .query_map((user_id, ENGAGEMENT_DAYS_LIMIT), |row| {
                Ok(DailyEngagement {
                    date: timestamps::date_from_db(0, row.get(0)?)?,
                    posts_count: row.get(1)?,
                    likes_count: row.get(2)?,
                    comments_count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Posts with the highest likes + comments across all users
    pub fn top_posts(&self) -> Result<Vec<TopPost>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.post_id, p.content, p.created_at, u.user_id, u.username, u.name,
                    COUNT(DISTINCT l.like_id) AS likes_count,
                    COUNT(DISTINCT c.comment_id) AS comments_count,
                    COUNT(DISTINCT l.like_id) + COUNT(DISTINCT c.comment_id) AS engagement_score
             FROM posts p
             JOIN users u ON u.user_id = p.user_id
             LEFT JOIN likes l ON l.post_id = p.post_id
             LEFT JOIN comments c ON c.post_id = p.post_id
             GROUP BY p.post_id, u.user_id
             ORDER BY engagement_score DESC, p.created_at DESC, p.post_id DESC
             LIMIT ?",
        )?;

        let posts = stmt
            .query_map([TOP_POSTS_LIMIT], |row| {
                Ok(TopPost {
                    post_id: row.get(0)?,
                    content: row.get(1)?,
                    created_at: timestamps::from_db(2, row.get(2)?)?,
                    author: AuthorSummary {
                        user_id: row.get(3)?,
                        username: row.get(4)?,
                        name: row.get(5)?,
                    },
                    likes_count: row.get(6)?,
                    comments_count: row.get(7)?,
                    engagement_score: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Totals and per-post averages of engagement received by a user
    pub fn user_stats(&self, user_id: i64) -> Result<UserStats> {
        let (total_posts, total_likes, total_comments): (i64, i64, i64) = self.conn.query_row(
            "SELECT COUNT(DISTINCT p.post_id),
                    COUNT(DISTINCT l.like_id),
                    COUNT(DISTINCT c.comment_id)
             FROM posts p
             LEFT JOIN likes l ON l.post_id = p.post_id
             LEFT JOIN comments c ON c.post_id = p.post_id
             WHERE p.user_id = ?",
            [user_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(UserStats::from_totals(total_posts, total_likes, total_comments))
    }

    /// Public profile with engagement received, or `None` for an unknown user
    pub fn profile_summary(&self, user_id: i64) -> Result<Option<ProfileSummary>> {
        let Some(user) = UserRepository::new(self.conn).get_by_id(user_id)? else {
            return Ok(None);
        };

        // Per-post counts, summed below
        let mut stmt = self.conn.prepare(
            "SELECT p.post_id,
                    COUNT(DISTINCT c.comment_id),
                    COUNT(DISTINCT l.like_id)
             FROM posts p
             LEFT JOIN comments c ON c.post_id = p.post_id
             LEFT JOIN likes l ON l.post_id = p.post_id
             WHERE p.user_id = ?
             GROUP BY p.post_id",
        )?;
        let per_post = stmt
            .query_map([user_id], |row| Ok((row.get::<_, i64>(1)?, row.get::<_, i64>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let total_comments_received = per_post.iter().map(|(comments, _)| comments).sum();
        let total_likes_received = per_post.iter().map(|(_, likes)| likes).sum();

        let follows = FollowRepository::new(self.conn);
        Ok(Some(ProfileSummary {
            user_id: user.user_id,
            username: user.username,
            name: user.name,
            posts_count: per_post.len() as i64,
            total_likes_received,
            total_comments_received,
            followers_count: follows.get_follower_count(user_id)?,
            following_count: follows.get_following_count(user_id)?,
        }))
    }

    /// The caller's own profile with post and follow counts
    pub fn own_profile(&self, user_id: i64) -> Result<Option<OwnProfile>> {
        let Some(user) = UserRepository::new(self.conn).get_by_id(user_id)? else {
            return Ok(None);
        };
        let follows = FollowRepository::new(self.conn);

        Ok(Some(OwnProfile {
            posts_count: PostRepository::new(self.conn).get_post_count(user_id)?,
            followers_count: follows.get_follower_count(user_id)?,
            following_count: follows.get_following_count(user_id)?,
            user_id: user.user_id,
            username: user.username,
            name: user.name,
            email: user.email,
        }))
    }

    /// All of a user's posts, newest first, with like counts and comment threads
    pub fn user_timeline(&self, user_id: i64) -> Result<Vec<OwnPost>> {
        let likes = LikeRepository::new(self.conn);
        let comments = CommentRepository::new(self.conn);

        PostRepository::new(self.conn)
            .get_by_user(user_id, None)?
            .into_iter()
            .map(|post| {
                Ok(OwnPost {
                    likes_count: likes.count_for_post(post.post_id)?,
                    comments: comments.list_for_post(post.post_id)?,
                    post_id: post.post_id,
                    content: post.content,
                    created_at: post.created_at,
                })
            })
            .collect()
    }

    /// A user's most recent posts as seen by `viewer_id`
    pub fn recent_posts(&self, user_id: i64, viewer_id: i64) -> Result<Vec<PostPreview>> {
        let likes = LikeRepository::new(self.conn);

        PostRepository::new(self.conn)
            .get_by_user(user_id, Some(PROFILE_POSTS_LIMIT))?
            .into_iter()
            .map(|post| {
                Ok(PostPreview {
                    likes_count: likes.count_for_post(post.post_id)?,
                    user_liked: likes.has_liked(post.post_id, viewer_id)?,
                    post_id: post.post_id,
                    content: post.content,
                    created_at: post.created_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{at, setup_test_db};
    use crate::db::Database;
    use chrono::Utc;
    use proptest::prelude::*;

    struct Fixture {
        alice: i64,
        bob: i64,
        carol: i64,
    }

    fn create_users(conn: &Connection) -> Fixture {
        let users = UserRepository::new(conn);
        let create = |username: &str, name: &str| {
            users
                .create(
                    username,
                    name,
                    &format!("{}@example.com", username),
                    "hash",
                    Utc::now(),
                )
                .unwrap()
        };
        Fixture {
            alice: create("alice", "Alice"),
            bob: create("BobTheBuilder", "Bob"),
            carol: create("carol_x", "Carol"),
        }
    }

    fn like(conn: &Connection, post_id: i64, user_id: i64) {
        LikeRepository::new(conn).toggle(post_id, user_id).unwrap();
    }

    fn comment(conn: &Connection, post_id: i64, user_id: i64, text: &str, when: &str) {
        CommentRepository::new(conn)
            .create(post_id, user_id, text, at(when))
            .unwrap();
    }

    #[test]
    fn test_discover_counts_without_join_inflation() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);

        let post = posts.create(f.alice, "popular", at("2024-01-10T09:00:00Z")).unwrap();
        like(&conn, post.post_id, f.bob);
        like(&conn, post.post_id, f.carol);
        comment(&conn, post.post_id, f.bob, "one", "2024-01-10T10:00:00Z");
        comment(&conn, post.post_id, f.carol, "two", "2024-01-10T11:00:00Z");
        comment(&conn, post.post_id, f.bob, "three", "2024-01-10T12:00:00Z");

        let feed = EngagementRepository::new(&conn)
            .discover(&DiscoverFilter::default(), f.bob)
            .unwrap();

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].likes_count, 2);
        assert_eq!(feed[0].comments_count, 3);
        assert!(feed[0].user_liked);
        assert_eq!(feed[0].author.username, "alice");
        let texts: Vec<&str> = feed[0].comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_discover_orders_by_recency_and_caps_rows() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);

        for day in 1..=25 {
            posts
                .create(f.alice, &format!("day {}", day), at(&format!("2024-01-{:02}T08:00:00Z", day)))
                .unwrap();
        }

        let feed = EngagementRepository::new(&conn)
            .discover(&DiscoverFilter::default(), f.bob)
            .unwrap();
        assert_eq!(feed.len(), DISCOVER_LIMIT as usize);
        assert_eq!(feed[0].content, "day 25");
        assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_discover_date_bounds_are_inclusive_days() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);

        posts.create(f.alice, "before", at("2024-01-09T23:59:59Z")).unwrap();
        posts.create(f.alice, "start", at("2024-01-10T00:00:00Z")).unwrap();
        posts.create(f.alice, "end", at("2024-01-12T23:59:59.999Z")).unwrap();
        posts.create(f.alice, "after", at("2024-01-13T00:00:00Z")).unwrap();

        let filter = DiscoverFilter::from_params(Some("2024-01-10"), Some("2024-01-12"), None, None);
        let feed = EngagementRepository::new(&conn).discover(&filter, f.bob).unwrap();

        let texts: Vec<&str> = feed.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(texts, vec!["end", "start"]);
    }

    #[test]
    fn test_discover_min_likes_and_author_filters() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);

        let liked = posts.create(f.bob, "liked", at("2024-01-10T09:00:00Z")).unwrap();
        posts.create(f.bob, "ignored", at("2024-01-10T10:00:00Z")).unwrap();
        let other = posts.create(f.carol, "carol liked", at("2024-01-10T11:00:00Z")).unwrap();
        like(&conn, liked.post_id, f.alice);
        like(&conn, liked.post_id, f.carol);
        like(&conn, other.post_id, f.alice);
        like(&conn, other.post_id, f.bob);

        let repo = EngagementRepository::new(&conn);

        let filter = DiscoverFilter::from_params(None, None, Some("2"), None);
        let feed = repo.discover(&filter, f.alice).unwrap();
        assert_eq!(feed.len(), 2);
        assert!(feed.iter().all(|p| p.likes_count >= 2));

        // Case-insensitive substring match on the author
        let filter = DiscoverFilter::from_params(None, None, Some("1"), Some("bobthe"));
        let feed = repo.discover(&filter, f.alice).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].content, "liked");

        // Wildcards in the author filter match literally
        let filter = DiscoverFilter::from_params(None, None, None, Some("_"));
        let feed = repo.discover(&filter, f.alice).unwrap();
        assert!(feed.iter().all(|p| p.author.username == "carol_x"));
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_filter_params_ignore_garbage() {
        let filter = DiscoverFilter::from_params(Some("yesterday"), Some(""), Some("-3"), Some(""));
        assert_eq!(filter, DiscoverFilter::default());

        let filter = DiscoverFilter::from_params(
            Some("2024-02-01T15:30:00"),
            Some("2024-02-03T01:00:00+02:00"),
            Some("007"),
            Some("Al"),
        );
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(filter.date_to, NaiveDate::from_ymd_opt(2024, 2, 3));
        assert_eq!(filter.min_likes, Some(7));
        assert_eq!(filter.author.as_deref(), Some("Al"));
    }

    #[test]
    fn test_oversized_min_likes_excludes_everything() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        PostRepository::new(&conn)
            .create(f.alice, "no likes yet", at("2024-01-10T09:00:00Z"))
            .unwrap();

        let filter = DiscoverFilter::from_params(None, None, Some("99999999999999999999"), None);
        assert_eq!(filter.min_likes, Some(i64::MAX));

        let feed = EngagementRepository::new(&conn).discover(&filter, f.bob).unwrap();
        assert!(feed.is_empty());
    }

    #[test]
    fn test_author_filter_matches_non_ascii_username() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let emile = UserRepository::new(&conn)
            .create("ÉMILE", "Émile", "emile@example.com", "hash", Utc::now())
            .unwrap();
        let posts = PostRepository::new(&conn);
        posts.create(emile, "bonjour", at("2024-01-10T09:00:00Z")).unwrap();
        posts.create(f.alice, "hello", at("2024-01-10T10:00:00Z")).unwrap();

        let repo = EngagementRepository::new(&conn);
        for author in ["ÉMILE", "Émile", "MILE"] {
            let filter = DiscoverFilter::from_params(None, None, None, Some(author));
            let feed = repo.discover(&filter, f.bob).unwrap();
            assert_eq!(feed.len(), 1, "author filter {:?}", author);
            assert_eq!(feed[0].author.username, "ÉMILE");
        }
    }

    #[test]
    fn test_engagement_by_date_groups_per_day() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);

        let a = posts.create(f.alice, "a", at("2024-01-10T08:00:00Z")).unwrap();
        let b = posts.create(f.alice, "b", at("2024-01-10T20:00:00Z")).unwrap();
        let c = posts.create(f.alice, "c", at("2024-01-12T08:00:00Z")).unwrap();
        posts.create(f.bob, "not alice", at("2024-01-12T09:00:00Z")).unwrap();
        like(&conn, a.post_id, f.bob);
        like(&conn, b.post_id, f.bob);
        like(&conn, b.post_id, f.carol);
        comment(&conn, a.post_id, f.carol, "x", "2024-01-15T00:00:00Z");
        comment(&conn, c.post_id, f.bob, "y", "2024-01-15T00:00:00Z");

        let days = EngagementRepository::new(&conn)
            .engagement_by_date(f.alice)
            .unwrap();

        assert_eq!(
            days,
            vec![
                DailyEngagement {
                    date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
                    posts_count: 1,
                    likes_count: 0,
                    comments_count: 1,
                },
                DailyEngagement {
                    date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                    posts_count: 2,
                    likes_count: 3,
                    comments_count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_top_posts_by_engagement_score() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);

        let quiet = posts.create(f.alice, "quiet", at("2024-01-10T08:00:00Z")).unwrap();
        let busy = posts.create(f.bob, "busy", at("2024-01-09T08:00:00Z")).unwrap();
        like(&conn, busy.post_id, f.alice);
        like(&conn, busy.post_id, f.carol);
        comment(&conn, busy.post_id, f.alice, "wow", "2024-01-09T09:00:00Z");
        like(&conn, quiet.post_id, f.bob);

        let top = EngagementRepository::new(&conn).top_posts().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].post_id, busy.post_id);
        assert_eq!(top[0].engagement_score, 3);
        assert_eq!(top[0].author.name, "Bob");
        assert_eq!(top[1].engagement_score, 1);
    }

    #[test]
    fn test_user_stats() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);
        let repo = EngagementRepository::new(&conn);

        let empty = repo.user_stats(f.carol).unwrap();
        assert_eq!(empty.total_posts, 0);
        assert_eq!(empty.average_likes_per_post, 0.0);
        assert_eq!(empty.average_comments_per_post, 0.0);

        let a = posts.create(f.alice, "a", Utc::now()).unwrap();
        posts.create(f.alice, "b", Utc::now()).unwrap();
        like(&conn, a.post_id, f.bob);
        like(&conn, a.post_id, f.carol);
        like(&conn, a.post_id, f.alice);
        comment(&conn, a.post_id, f.bob, "hi", "2024-01-10T08:00:00Z");

        let stats = repo.user_stats(f.alice).unwrap();
        assert_eq!(stats.total_posts, 2);
        assert_eq!(stats.total_likes, 3);
        assert_eq!(stats.total_comments, 1);
        assert_eq!(stats.average_likes_per_post, 1.5);
        assert_eq!(stats.average_comments_per_post, 0.5);
    }

    #[test]
    fn test_profile_summary_and_own_profile() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);
        let follows = FollowRepository::new(&conn);

        let a = posts.create(f.alice, "a", Utc::now()).unwrap();
        let b = posts.create(f.alice, "b", Utc::now()).unwrap();
        like(&conn, a.post_id, f.bob);
        like(&conn, b.post_id, f.bob);
        like(&conn, b.post_id, f.carol);
        comment(&conn, b.post_id, f.carol, "nice", "2024-01-10T08:00:00Z");
        follows.toggle(f.bob, f.alice).unwrap();
        follows.toggle(f.carol, f.alice).unwrap();
        follows.toggle(f.alice, f.bob).unwrap();

        let repo = EngagementRepository::new(&conn);
        let summary = repo.profile_summary(f.alice).unwrap().unwrap();
        assert_eq!(summary.posts_count, 2);
        assert_eq!(summary.total_likes_received, 3);
        assert_eq!(summary.total_comments_received, 1);
        assert_eq!(summary.followers_count, 2);
        assert_eq!(summary.following_count, 1);

        let own = repo.own_profile(f.alice).unwrap().unwrap();
        assert_eq!(own.email, "alice@example.com");
        assert_eq!(own.posts_count, 2);
        assert_eq!(own.followers_count, 2);

        assert!(repo.profile_summary(9999).unwrap().is_none());
        assert!(repo.own_profile(9999).unwrap().is_none());
    }

    #[test]
    fn test_timelines() {
        let db = setup_test_db();
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);

        for i in 0..7 {
            posts
                .create(f.alice, &format!("post {}", i), at(&format!("2024-01-{:02}T08:00:00Z", i + 1)))
                .unwrap();
        }
        let newest = posts.get_by_user(f.alice, Some(1)).unwrap().remove(0);
        like(&conn, newest.post_id, f.bob);
        comment(&conn, newest.post_id, f.bob, "first!", "2024-01-08T00:00:00Z");

        let repo = EngagementRepository::new(&conn);
        let timeline = repo.user_timeline(f.alice).unwrap();
        assert_eq!(timeline.len(), 7);
        assert_eq!(timeline[0].likes_count, 1);
        assert_eq!(timeline[0].comments[0].author.username, "BobTheBuilder");

        let previews = repo.recent_posts(f.alice, f.bob).unwrap();
        assert_eq!(previews.len(), PROFILE_POSTS_LIMIT as usize);
        assert!(previews[0].user_liked);
        assert!(!previews[1].user_liked);
    }

    fn seed_random_engagement(db: &Database, likes_per_post: &[(u8, u8)]) -> Fixture {
        let conn = db.connection().unwrap();
        let f = create_users(&conn);
        let posts = PostRepository::new(&conn);
        let likers = [f.alice, f.bob, f.carol];

        for (i, (likes, comments)) in likes_per_post.iter().enumerate() {
            let post = posts
                .create(f.alice, "p", at(&format!("2024-01-{:02}T12:00:00Z", i % 28 + 1)))
                .unwrap();
            for liker in likers.iter().take(*likes as usize) {
                like(&conn, post.post_id, *liker);
            }
            for _ in 0..*comments {
                comment(&conn, post.post_id, f.bob, "c", "2024-02-01T00:00:00Z");
            }
        }
        f
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_top_posts_non_increasing(
            engagement in prop::collection::vec((0u8..=3, 0u8..4), 1..15)
        ) {
            let db = setup_test_db();
            seed_random_engagement(&db, &engagement);
            let conn = db.connection().unwrap();

            let top = EngagementRepository::new(&conn).top_posts().unwrap();
            prop_assert!(top.len() <= TOP_POSTS_LIMIT as usize);
            for post in &top {
                prop_assert_eq!(post.engagement_score, post.likes_count + post.comments_count);
            }
            prop_assert!(top.windows(2).all(|w| w[0].engagement_score >= w[1].engagement_score));
        }

        #[test]
        fn prop_discover_respects_filters(
            engagement in prop::collection::vec((0u8..=3, 0u8..2), 1..20),
            from_day in 1u32..=28,
            span in 0u32..10,
            min_likes in 0i64..=3,
        ) {
            let db = setup_test_db();
            let f = seed_random_engagement(&db, &engagement);
            let conn = db.connection().unwrap();

            let date_from = NaiveDate::from_ymd_opt(2024, 1, from_day).unwrap();
            let date_to = date_from + chrono::Duration::days(span as i64);
            let filter = DiscoverFilter {
                date_from: Some(date_from),
                date_to: Some(date_to),
                min_likes: Some(min_likes),
                author: None,
            };

            let feed = EngagementRepository::new(&conn).discover(&filter, f.bob).unwrap();
            for post in &feed {
                let day = post.created_at.date_naive();
                prop_assert!(day >= date_from && day <= date_to);
                prop_assert!(post.likes_count >= min_likes);
            }
        }
    }
}
