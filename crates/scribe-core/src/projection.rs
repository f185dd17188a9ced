//! The social projector: folds joined article rows and tag facts into
//! per-viewer view-models.
//!
//! Inputs may repeat an article (fan-out from a join); output never does.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::{
  article::{ArticleRow, ArticleView, TagRow},
  comment::{CommentRow, CommentView},
  user::Viewer,
};

struct Group {
  row:  ArticleRow,
  tags: BTreeSet<String>,
}

/// Group `rows` by article, attach the distinct tag names from `tags`, and
/// order newest first (ties broken by article id, descending).
///
/// `following` and `favorited` are forced to `false` without a viewer.
/// Tags for articles not present in `rows` are ignored.
pub fn project_articles<R, T>(viewer: Option<&Viewer>, rows: R, tags: T) -> Vec<ArticleView>
where
  R: IntoIterator<Item = ArticleRow>,
  T: IntoIterator<Item = TagRow>,
{
  let mut index: HashMap<Uuid, usize> = HashMap::new();
  let mut groups: Vec<Group> = Vec::new();

  for row in rows {
    if index.contains_key(&row.article_id) {
      continue;
    }
    index.insert(row.article_id, groups.len());
    groups.push(Group { row, tags: BTreeSet::new() });
  }

  for tag in tags {
    if let Some(&i) = index.get(&tag.article_id) {
      groups[i].tags.insert(tag.name);
    }
  }

  groups.sort_by(|a, b| {
    b.row
      .created_at
      .cmp(&a.row.created_at)
      .then_with(|| b.row.article_id.cmp(&a.row.article_id))
  });

  let anonymous = viewer.is_none();
  groups
    .into_iter()
    .map(|Group { row, tags }| ArticleView {
      slug:            row.slug,
      title:           row.title,
      description:     row.description,
      body:            row.body,
      tag_list:        tags.into_iter().collect(),
      created_at:      row.created_at,
      updated_at:      row.updated_at,
      favorited:       !anonymous && row.favorited,
      favorites_count: row.favorites_count,
      author:          row.author.into_profile(!anonymous && row.following),
    })
    .collect()
}

/// Project comment rows, oldest first (ties broken by id, ascending).
pub fn project_comments<R>(viewer: Option<&Viewer>, rows: R) -> Vec<CommentView>
where
  R: IntoIterator<Item = CommentRow>,
{
  let anonymous = viewer.is_none();
  let mut rows: Vec<CommentRow> = rows.into_iter().collect();
  rows.sort_by(|a, b| {
    a.created_at
      .cmp(&b.created_at)
      .then_with(|| a.comment_id.cmp(&b.comment_id))
  });
  rows.dedup_by_key(|r| r.comment_id);

  rows
    .into_iter()
    .map(|row| CommentView {
      id:         row.comment_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
      body:       row.body,
      author:     row.author.into_profile(!anonymous && row.following),
    })
    .collect()
}
