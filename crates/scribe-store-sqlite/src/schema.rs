//! SQL schema for the Scribe SQLite store.

use rusqlite::{Connection, functions::FunctionFlags};

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Edge tables use composite primary keys so that duplicate edges are
/// impossible and `INSERT OR IGNORE` makes insertion idempotent.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    bio           TEXT,
    image         TEXT,
    created_at    TEXT NOT NULL,   -- RFC 3339 UTC, microseconds
    updated_at    TEXT NOT NULL
);

-- Bearer tokens are never stored; only their SHA-256 digest.
CREATE TABLE IF NOT EXISTS sessions (
    token_digest TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL
);

-- Slugs are derived from titles and are not unique.
CREATE TABLE IF NOT EXISTS articles (
    article_id  TEXT PRIMARY KEY,
    author_id   TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    slug        TEXT NOT NULL,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    body        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    tag_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name   TEXT NOT NULL UNIQUE   -- lowercased, trimmed, non-empty
);

CREATE TABLE IF NOT EXISTS article_tags (
    article_id TEXT    NOT NULL REFERENCES articles(article_id) ON DELETE CASCADE,
    tag_id     INTEGER NOT NULL REFERENCES tags(tag_id),
    PRIMARY KEY (article_id, tag_id)
);

CREATE TABLE IF NOT EXISTS follows (
    follower_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    followee_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    PRIMARY KEY (follower_id, followee_id)
);

CREATE TABLE IF NOT EXISTS favorites (
    user_id    TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    article_id TEXT NOT NULL REFERENCES articles(article_id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, article_id)
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    article_id TEXT NOT NULL REFERENCES articles(article_id) ON DELETE CASCADE,
    author_id  TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    body       TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS articles_slug_idx    ON articles(slug);
CREATE INDEX IF NOT EXISTS articles_created_idx ON articles(created_at);
CREATE INDEX IF NOT EXISTS articles_author_idx  ON articles(author_id);
CREATE INDEX IF NOT EXISTS comments_article_idx ON comments(article_id);

PRAGMA user_version = 1;
";

/// Register the SQL functions the queries rely on.
///
/// `unicode_lower(text)` folds case with Rust's Unicode rules; the built-in
/// `lower()` and `LIKE` only fold ASCII.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "unicode_lower",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
  )
}
