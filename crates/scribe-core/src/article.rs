//! Article records, store inputs, joined rows, and the article view-model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  ValidationErrors,
  user::{AuthorRow, Profile},
};

// ─── Persisted form ──────────────────────────────────────────────────────────

/// An article as stored; no derived social facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
  pub article_id:  Uuid,
  pub author_id:   Uuid,
  pub slug:        String,
  pub title:       String,
  pub description: String,
  pub body:        String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::store::BlogStore::create_article`].
///
/// `tag_list` is raw user input; the store's tag resolver normalizes it.
#[derive(Debug, Clone)]
pub struct NewArticle {
  pub author_id:   Uuid,
  pub slug:        String,
  pub title:       String,
  pub description: String,
  pub body:        String,
  pub tag_list:    Vec<String>,
  pub created_at:  DateTime<Utc>,
}

/// Final column values written by
/// [`crate::store::BlogStore::update_article`].
#[derive(Debug, Clone)]
pub struct ArticleChanges {
  pub slug:        String,
  pub title:       String,
  pub description: String,
  pub body:        String,
  pub updated_at:  DateTime<Utc>,
}

// ─── Service inputs ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CreateArticle {
  pub title:       String,
  pub description: String,
  pub body:        String,
  pub tag_list:    Vec<String>,
}

impl CreateArticle {
  pub fn validate(&self) -> crate::Result<()> {
    let mut errors = ValidationErrors::default();
    errors.require("title", &self.title);
    errors.require("description", &self.description);
    errors.require("body", &self.body);
    errors.into_result()
  }
}

/// A partial update. `None` and blank strings both leave the stored value
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticle {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub body:        Option<String>,
}

impl UpdateArticle {
  /// Merge onto `article`, recomputing the slug when the title changes.
  pub fn apply(self, article: &Article, now: DateTime<Utc>) -> ArticleChanges {
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let (title, slug) = match present(self.title) {
      Some(title) => {
        let slug = crate::slug::generate_slug(&title);
        (title, slug)
      }
      None => (article.title.clone(), article.slug.clone()),
    };

    ArticleChanges {
      slug,
      title,
      description: present(self.description).unwrap_or_else(|| article.description.clone()),
      body: present(self.body).unwrap_or_else(|| article.body.clone()),
      updated_at: now,
    }
  }
}

// ─── Joined rows ─────────────────────────────────────────────────────────────

/// One article with its author and per-viewer social facts, as produced by
/// phase one of [`crate::store::BlogStore::query_articles`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRow {
  pub article_id:      Uuid,
  pub slug:            String,
  pub title:           String,
  pub description:     String,
  pub body:            String,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  pub author:          AuthorRow,
  /// A follow edge exists from the viewer to the author.
  pub following:       bool,
  /// A favorite edge exists from the viewer to this article.
  pub favorited:       bool,
  pub favorites_count: i64,
}

/// A `(article, tag name)` membership fact from phase two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRow {
  pub article_id: Uuid,
  pub name:       String,
}

// ─── View-model ──────────────────────────────────────────────────────────────

/// The denormalized article returned across the system boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
  pub slug:            String,
  pub title:           String,
  pub description:     String,
  pub body:            String,
  /// Distinct, lexicographically sorted.
  pub tag_list:        Vec<String>,
  #[serde(serialize_with = "crate::timestamp::serialize")]
  pub created_at:      DateTime<Utc>,
  #[serde(serialize_with = "crate::timestamp::serialize")]
  pub updated_at:      DateTime<Utc>,
  pub favorited:       bool,
  pub favorites_count: i64,
  pub author:          Profile,
}

/// A page of articles. `articles_count` is the size of this page, not a
/// global total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleList {
  pub articles:       Vec<ArticleView>,
  pub articles_count: usize,
}

impl From<Vec<ArticleView>> for ArticleList {
  fn from(articles: Vec<ArticleView>) -> Self {
    let articles_count = articles.len();
    Self { articles, articles_count }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  fn stored() -> Article {
    let at = Utc::now();
    Article {
      article_id:  Uuid::new_v4(),
      author_id:   Uuid::new_v4(),
      slug:        "how-to-train-your-dragon".into(),
      title:       "How to train your dragon".into(),
      description: "Ever wonder how?".into(),
      body:        "You have to believe".into(),
      created_at:  at,
      updated_at:  at,
    }
  }

  #[test]
  fn body_only_update_keeps_title_and_slug() {
    let article = stored();
    let now = article.updated_at + Duration::seconds(5);
    let changes = UpdateArticle { body: Some("New body".into()), ..Default::default() }
      .apply(&article, now);

    assert_eq!(changes.title, article.title);
    assert_eq!(changes.slug, article.slug);
    assert_eq!(changes.description, article.description);
    assert_eq!(changes.body, "New body");
    assert_eq!(changes.updated_at, now);
  }

  #[test]
  fn title_update_recomputes_slug() {
    let article = stored();
    let changes = UpdateArticle { title: Some("Did you  train it?".into()), ..Default::default() }
      .apply(&article, Utc::now());
    assert_eq!(changes.slug, "did-you-train-it?");
  }

  #[test]
  fn blank_fields_are_ignored() {
    let article = stored();
    let changes = UpdateArticle {
      title:       Some("   ".into()),
      description: Some(String::new()),
      body:        None,
    }
    .apply(&article, Utc::now());
    assert_eq!(changes.title, article.title);
    assert_eq!(changes.description, article.description);
  }

  #[test]
  fn create_requires_all_text_fields() {
    let input = CreateArticle { title: "t".into(), ..Default::default() };
    match input.validate() {
      Err(crate::Error::Validation(errors)) => {
        assert!(errors.messages("title").is_empty());
        assert_eq!(errors.messages("description"), ["can't be blank"]);
        assert_eq!(errors.messages("body"), ["can't be blank"]);
      }
      other => panic!("expected validation failure, got {other:?}"),
    }
  }
}
