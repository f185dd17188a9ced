//! [`SqliteStore`]: the SQLite implementation of [`BlogStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use scribe_core::{
  article::{Article, ArticleChanges, ArticleRow, NewArticle, TagRow},
  comment::{Comment, CommentQuery, CommentRow, NewComment},
  query::ArticleQuery,
  store::BlogStore,
  user::{NewUser, Profile, User},
};

use crate::{
  Error, Result,
  encode::{
    RawArticle, RawArticleRow, RawComment, RawCommentRow, RawTagRow, RawUser, at_rest,
    encode_dt, encode_uuid, like_pattern,
  },
  schema::{SCHEMA, register_functions},
  tags::resolve_tags,
};

const USER_COLUMNS: &str =
  "u.user_id, u.username, u.email, u.password_hash, u.bio, u.image, u.created_at, u.updated_at";

const ARTICLE_COLUMNS: &str =
  "article_id, author_id, slug, title, description, body, created_at, updated_at";

/// The article a slug resolves to: the most recently created one.
const SLUG_TARGET: &str = "SELECT article_id FROM articles WHERE slug = ?1
   ORDER BY created_at DESC, article_id DESC LIMIT 1";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Scribe graph store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_user_where(&self, column: &'static str, value: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.{column} = ?1");
        Ok(conn.query_row(&sql, rusqlite::params![value], RawUser::from_row).optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn set_edge(&self, sql: &'static str, a: Uuid, b: Uuid) -> Result<()> {
    let a_str = encode_uuid(a);
    let b_str = encode_uuid(b);

    self
      .conn
      .call(move |conn| {
        conn.execute(sql, rusqlite::params![a_str, b_str])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── BlogStore impl ──────────────────────────────────────────────────────────

impl BlogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let now = at_rest(Utc::now());
    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      email:         input.email,
      password_hash: input.password_hash,
      bio:           None,
      image:         None,
      created_at:    now,
      updated_at:    now,
    };

    let id_str   = encode_uuid(user.user_id);
    let at_str   = encode_dt(now);
    let username = user.username.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, username, email, password_hash, bio, image, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, NULL, NULL, ?5, ?5)",
          rusqlite::params![id_str, username, email, hash, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    self.find_user_where("user_id", encode_uuid(user_id)).await
  }

  async fn find_user_by_email(&self, email: String) -> Result<Option<User>> {
    self.find_user_where("email", email).await
  }

  async fn find_user_by_username(&self, username: String) -> Result<Option<User>> {
    self.find_user_where("username", username).await
  }

  async fn update_user(&self, user: User) -> Result<User> {
    let user = User { updated_at: at_rest(Utc::now()), ..user };

    let id_str   = encode_uuid(user.user_id);
    let at_str   = encode_dt(user.updated_at);
    let username = user.username.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();
    let bio      = user.bio.clone();
    let image    = user.image.clone();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users
           SET username = ?2, email = ?3, password_hash = ?4, bio = ?5, image = ?6,
               updated_at = ?7
           WHERE user_id = ?1",
          rusqlite::params![id_str, username, email, hash, bio, image, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::Vanished("user"));
    }
    Ok(user)
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(&self, user_id: Uuid, token_digest: String) -> Result<()> {
    let id_str = encode_uuid(user_id);
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_digest, user_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![token_digest, id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_session_user(&self, token_digest: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {USER_COLUMNS} FROM sessions s
           JOIN users u ON u.user_id = s.user_id
           WHERE s.token_digest = ?1"
        );
        Ok(conn.query_row(&sql, rusqlite::params![token_digest], RawUser::from_row).optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn delete_session(&self, token_digest: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_digest = ?1",
          rusqlite::params![token_digest],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Follow graph ──────────────────────────────────────────────────────────

  async fn get_profile(&self, viewer_id: Option<Uuid>, username: String) -> Result<Option<Profile>> {
    let viewer_str = viewer_id.map(encode_uuid);

    let profile = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT u.username, u.bio, u.image,
               EXISTS (SELECT 1 FROM follows f
                       WHERE f.follower_id = ?1 AND f.followee_id = u.user_id)
             FROM users u WHERE u.username = ?2",
            rusqlite::params![viewer_str, username],
            |row| {
              Ok(Profile {
                username:  row.get(0)?,
                bio:       row.get(1)?,
                image:     row.get(2)?,
                following: row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    Ok(profile)
  }

  async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
    self
      .set_edge(
        "INSERT OR IGNORE INTO follows (follower_id, followee_id) VALUES (?1, ?2)",
        follower_id,
        followee_id,
      )
      .await
  }

  async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<()> {
    self
      .set_edge(
        "DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2",
        follower_id,
        followee_id,
      )
      .await
  }

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn create_article(&self, input: NewArticle) -> Result<Article> {
    let created_at = at_rest(input.created_at);
    let article = Article {
      article_id:  Uuid::new_v4(),
      author_id:   input.author_id,
      slug:        input.slug,
      title:       input.title,
      description: input.description,
      body:        input.body,
      created_at,
      updated_at:  created_at,
    };

    let id_str      = encode_uuid(article.article_id);
    let author_str  = encode_uuid(article.author_id);
    let at_str      = encode_dt(article.created_at);
    let slug        = article.slug.clone();
    let title       = article.title.clone();
    let description = article.description.clone();
    let body        = article.body.clone();
    let tag_list    = input.tag_list;

    let tag_ids = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO articles (
             article_id, author_id, slug, title, description, body, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![id_str, author_str, slug, title, description, body, at_str],
        )?;
        let tag_ids = resolve_tags(&tx, &id_str, &tag_list)?;
        tx.commit()?;
        Ok(tag_ids)
      })
      .await?;

    debug!(article = %article.article_id, tags = tag_ids.len(), "inserted article");
    Ok(article)
  }

  async fn find_article_by_slug(&self, slug: String) -> Result<Option<Article>> {
    let raw: Option<RawArticle> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = ({SLUG_TARGET})");
        Ok(conn.query_row(&sql, rusqlite::params![slug], RawArticle::from_row).optional()?)
      })
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }

  async fn update_article(&self, article_id: Uuid, changes: ArticleChanges) -> Result<bool> {
    let id_str = encode_uuid(article_id);
    let at_str = encode_dt(changes.updated_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE articles
           SET slug = ?2, title = ?3, description = ?4, body = ?5, updated_at = ?6
           WHERE article_id = ?1",
          rusqlite::params![
            id_str,
            changes.slug,
            changes.title,
            changes.description,
            changes.body,
            at_str,
          ],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_article_by_slug(&self, slug: String) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        // Tag links, favorites and comments go with it via ON DELETE CASCADE.
        let sql = format!("DELETE FROM articles WHERE article_id = ({SLUG_TARGET})");
        Ok(conn.execute(&sql, rusqlite::params![slug])?)
      })
      .await?;

    Ok(removed > 0)
  }

  async fn query_articles(
    &self,
    viewer_id: Option<Uuid>,
    query: &ArticleQuery,
  ) -> Result<Vec<ArticleRow>> {
    let viewer_str     = viewer_id.map(encode_uuid);
    let article_str    = query.article_id.map(encode_uuid);
    let followed_str   = query.followed_by.map(encode_uuid);
    let tag_pattern    = query.filter.tag.as_deref().map(like_pattern);
    let author_pattern = query.filter.author.as_deref().map(like_pattern);
    let fav_pattern    = query.filter.favorited_by.as_deref().map(like_pattern);
    let limit_val      = query.page.limit();
    let offset_val     = query.page.offset();

    let raws: Vec<RawArticleRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT
             a.article_id, a.slug, a.title, a.description, a.body,
             a.created_at, a.updated_at,
             u.username, u.bio, u.image,
             EXISTS (SELECT 1 FROM follows f
                     WHERE f.follower_id = ?1 AND f.followee_id = a.author_id) AS following,
             EXISTS (SELECT 1 FROM favorites fv
                     WHERE fv.user_id = ?1 AND fv.article_id = a.article_id)   AS favorited,
             (SELECT COUNT(*) FROM favorites fc
              WHERE fc.article_id = a.article_id)                               AS favorites_count
           FROM articles a
           JOIN users u ON u.user_id = a.author_id
           WHERE (?2 IS NULL OR a.article_id = ?2)
             AND (?3 IS NULL OR EXISTS (
                   SELECT 1 FROM follows ff
                   WHERE ff.follower_id = ?3 AND ff.followee_id = a.author_id))
             AND (?4 IS NULL OR EXISTS (
                   SELECT 1 FROM article_tags atg
                   JOIN tags t ON t.tag_id = atg.tag_id
                   WHERE atg.article_id = a.article_id AND unicode_lower(t.name) LIKE ?4 ESCAPE '\\'))
             AND (?5 IS NULL OR unicode_lower(u.username) LIKE ?5 ESCAPE '\\')
             AND (?6 IS NULL OR EXISTS (
                   SELECT 1 FROM favorites fb
                   JOIN users fu ON fu.user_id = fb.user_id
                   WHERE fb.article_id = a.article_id AND unicode_lower(fu.username) LIKE ?6 ESCAPE '\\'))
           ORDER BY a.created_at DESC, a.article_id DESC
           LIMIT ?7 OFFSET ?8",
        )?;

        let rows = stmt
          .query_map(
            rusqlite::params![
              viewer_str,
              article_str,
              followed_str,
              tag_pattern,
              author_pattern,
              fav_pattern,
              limit_val,
              offset_val,
            ],
            RawArticleRow::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArticleRow::into_row).collect()
  }

  async fn article_tags(&self, article_ids: Vec<Uuid>) -> Result<Vec<TagRow>> {
    if article_ids.is_empty() {
      return Ok(Vec::new());
    }
    let ids: Vec<String> = article_ids.into_iter().map(encode_uuid).collect();

    let raws: Vec<RawTagRow> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
          "SELECT atg.article_id, t.name
           FROM article_tags atg
           JOIN tags t ON t.tag_id = atg.tag_id
           WHERE atg.article_id IN ({placeholders})
           ORDER BY atg.article_id, t.name"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            Ok(RawTagRow { article_id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTagRow::into_row).collect()
  }

  async fn favorite(&self, user_id: Uuid, article_id: Uuid) -> Result<()> {
    self
      .set_edge(
        "INSERT OR IGNORE INTO favorites (user_id, article_id) VALUES (?1, ?2)",
        user_id,
        article_id,
      )
      .await
  }

  async fn unfavorite(&self, user_id: Uuid, article_id: Uuid) -> Result<()> {
    self
      .set_edge(
        "DELETE FROM favorites WHERE user_id = ?1 AND article_id = ?2",
        user_id,
        article_id,
      )
      .await
  }

  async fn list_tags(&self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT name FROM tags ORDER BY name")?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await?;

    Ok(names)
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn create_comment(&self, input: NewComment) -> Result<Comment> {
    let article_str = encode_uuid(input.article_id);
    let author_str  = encode_uuid(input.author_id);
    let created_at  = at_rest(input.created_at);
    let at_str      = encode_dt(created_at);
    let body        = input.body.clone();

    let comment_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (article_id, author_id, body, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![article_str, author_str, body, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Comment {
      comment_id,
      article_id: input.article_id,
      author_id:  input.author_id,
      body:       input.body,
      created_at,
      updated_at: created_at,
    })
  }

  async fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT comment_id, article_id, author_id, body, created_at, updated_at
             FROM comments WHERE comment_id = ?1",
            rusqlite::params![comment_id],
            |row| {
              Ok(RawComment {
                comment_id: row.get(0)?,
                article_id: row.get(1)?,
                author_id:  row.get(2)?,
                body:       row.get(3)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn query_comments(
    &self,
    viewer_id: Option<Uuid>,
    query: CommentQuery,
  ) -> Result<Vec<CommentRow>> {
    let viewer_str = viewer_id.map(encode_uuid);
    let (article_str, comment_id) = match query {
      CommentQuery::ForArticle(id) => (Some(encode_uuid(id)), None),
      CommentQuery::Single(id) => (None, Some(id)),
    };

    let raws: Vec<RawCommentRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT
             c.comment_id, c.body, c.created_at, c.updated_at,
             u.username, u.bio, u.image,
             EXISTS (SELECT 1 FROM follows f
                     WHERE f.follower_id = ?1 AND f.followee_id = c.author_id)
           FROM comments c
           JOIN users u ON u.user_id = c.author_id
           WHERE (?2 IS NULL OR c.article_id = ?2)
             AND (?3 IS NULL OR c.comment_id = ?3)
           ORDER BY c.created_at ASC, c.comment_id ASC",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![viewer_str, article_str, comment_id], |row| {
            Ok(RawCommentRow {
              comment_id: row.get(0)?,
              body:       row.get(1)?,
              created_at: row.get(2)?,
              updated_at: row.get(3)?,
              username:   row.get(4)?,
              bio:        row.get(5)?,
              image:      row.get(6)?,
              following:  row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCommentRow::into_row).collect()
  }

  async fn delete_comment(&self, comment_id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM comments WHERE comment_id = ?1", rusqlite::params![comment_id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
