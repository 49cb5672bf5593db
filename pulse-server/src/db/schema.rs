/// SQL schema for the Pulse database
/// Creates all tables with proper constraints, foreign keys, and indexes
pub const SCHEMA: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Posts table
CREATE TABLE IF NOT EXISTS posts (
    post_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(user_id)
);

-- Create index on created_at for efficient recency sorting and date filters
CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts(user_id);

-- Comments table
CREATE TABLE IF NOT EXISTS comments (
    comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (post_id) REFERENCES posts(post_id),
    FOREIGN KEY (user_id) REFERENCES users(user_id)
);

CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id);
CREATE INDEX IF NOT EXISTS idx_comments_user_id ON comments(user_id);

-- Likes table (at most one like per post/user pair)
CREATE TABLE IF NOT EXISTS likes (
    like_id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (post_id) REFERENCES posts(post_id),
    FOREIGN KEY (user_id) REFERENCES users(user_id)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_post_user ON likes(post_id, user_id);
CREATE INDEX IF NOT EXISTS idx_likes_user_id ON likes(user_id);

-- Followers table (one-way relationships)
CREATE TABLE IF NOT EXISTS followers (
    follower_id INTEGER PRIMARY KEY AUTOINCREMENT,
    follower_user_id INTEGER NOT NULL,
    followed_user_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (follower_user_id) REFERENCES users(user_id),
    FOREIGN KEY (followed_user_id) REFERENCES users(user_id)
);

-- Indexes for efficient follow lookups
CREATE UNIQUE INDEX IF NOT EXISTS idx_followers_pair ON followers(follower_user_id, followed_user_id);
CREATE INDEX IF NOT EXISTS idx_followers_followed ON followers(followed_user_id);
"#;

/// Demo content for development databases.
/// Users are inserted by `seed::seed_demo_data` (their passwords need hashing);
/// everything else refers to them by username.
pub const DEMO_CONTENT: &str = r#"
-- ============================================================================
-- POSTS
-- ============================================================================
INSERT INTO posts (user_id, content, created_at) VALUES
    ((SELECT user_id FROM users WHERE username = 'alice'), 'Just shipped a new release of my side project!', '2024-01-10T09:15:00.000000Z'),
    ((SELECT user_id FROM users WHERE username = 'alice'), 'Coffee first, code second.', '2024-01-10T17:40:00.000000Z'),
    ((SELECT user_id FROM users WHERE username = 'bob'), 'Anyone else think SQL window functions are underrated?', '2024-01-11T12:00:00.000000Z'),
    ((SELECT user_id FROM users WHERE username = 'charlie'), 'Went hiking this weekend, photos soon.', '2024-01-12T08:30:00.000000Z'),
    ((SELECT user_id FROM users WHERE username = 'diana'), 'Reading list for February is up on my blog.', '2024-01-13T20:05:00.000000Z');

-- ============================================================================
-- LIKES
-- ============================================================================
INSERT INTO likes (post_id, user_id, created_at)
SELECT p.post_id, u.user_id, '2024-01-14T10:00:00.000000Z'
FROM posts p, users u
WHERE p.content = 'Just shipped a new release of my side project!'
  AND u.username IN ('bob', 'charlie', 'diana');

INSERT INTO likes (post_id, user_id, created_at)
SELECT p.post_id, u.user_id, '2024-01-14T11:00:00.000000Z'
FROM posts p, users u
WHERE p.content = 'Anyone else think SQL window functions are underrated?'
  AND u.username IN ('alice', 'diana');

-- ============================================================================
-- COMMENTS
-- ============================================================================
INSERT INTO comments (post_id, user_id, content, created_at)
SELECT p.post_id, u.user_id, 'Congrats! Link?', '2024-01-10T09:30:00.000000Z'
FROM posts p, users u
WHERE p.content = 'Just shipped a new release of my side project!' AND u.username = 'bob';

INSERT INTO comments (post_id, user_id, content, created_at)
SELECT p.post_id, u.user_id, 'Absolutely, LAG and LEAD changed my life.', '2024-01-11T12:20:00.000000Z'
FROM posts p, users u
WHERE p.content = 'Anyone else think SQL window functions are underrated?' AND u.username = 'charlie';

-- ============================================================================
-- FOLLOWS
-- ============================================================================
INSERT OR IGNORE INTO followers (follower_user_id, followed_user_id, created_at)
SELECT a.user_id, b.user_id, '2024-01-09T00:00:00.000000Z'
FROM users a, users b
WHERE (a.username, b.username) IN (
    VALUES ('bob', 'alice'), ('charlie', 'alice'), ('diana', 'alice'), ('alice', 'bob'), ('alice', 'diana')
);
"#;
