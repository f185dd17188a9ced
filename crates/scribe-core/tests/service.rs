//! End-to-end tests for `BlogService` over an in-memory SQLite store.

use std::{sync::Arc, time::Duration};

use scribe_core::{
  BlogService, BlogStore, Error,
  article::{CreateArticle, UpdateArticle},
  query::{ArticleFilter, Pagination},
  user::{NewUser, Viewer},
};
use scribe_store_sqlite::SqliteStore;

type Service = BlogService<SqliteStore>;

async fn service() -> Service {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  BlogService::new(Arc::new(store))
}

async fn viewer(svc: &Service, name: &str) -> Viewer {
  svc
    .store()
    .create_user(NewUser {
      username:      name.into(),
      email:         format!("{name}@example.com"),
      password_hash: "hash".into(),
    })
    .await
    .unwrap()
    .viewer()
}

fn draft(title: &str, tags: &[&str]) -> CreateArticle {
  CreateArticle {
    title:       title.into(),
    description: format!("about {title}"),
    body:        format!("all of {title}"),
    tag_list:    tags.iter().map(|t| t.to_string()).collect(),
  }
}

async fn tick() { tokio::time::sleep(Duration::from_millis(3)).await; }

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_derives_slug_and_normalizes_tags() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;

  let view = svc
    .create_article(&jake, draft("My Title Here", &["Go", " go ", "Backend"]))
    .await
    .unwrap();

  assert_eq!(view.slug, "my-title-here");
  assert_eq!(view.tag_list, ["backend", "go"]);
  assert_eq!(view.author.username, "jake");
  assert!(!view.favorited);
  assert_eq!(view.favorites_count, 0);
  assert_eq!(svc.tags().await.unwrap(), ["backend", "go"]);
}

#[tokio::test]
async fn create_rejects_blank_fields() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;

  let err = svc
    .create_article(&jake, CreateArticle { title: "  ".into(), ..draft("x", &[]) })
    .await
    .unwrap_err();
  match err {
    Error::Validation(errors) => assert_eq!(errors.messages("title"), ["can't be blank"]),
    other => panic!("expected validation error, got {other:?}"),
  }
}

#[tokio::test]
async fn create_without_tags_has_empty_tag_list() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  let view = svc.create_article(&jake, draft("Bare", &[])).await.unwrap();
  assert!(view.tag_list.is_empty());
}

#[tokio::test]
async fn get_missing_slug_is_not_found() {
  let svc = service().await;
  let err = svc.get_article(None, "nope").await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

// ─── Favorites ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn favorite_twice_counts_once() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  let fan = viewer(&svc, "fan").await;
  svc.create_article(&jake, draft("Popular", &[])).await.unwrap();

  svc.favorite(&fan, "popular").await.unwrap();
  let view = svc.favorite(&fan, "popular").await.unwrap();
  assert!(view.favorited);
  assert_eq!(view.favorites_count, 1);
}

#[tokio::test]
async fn favorite_unfavorite_favorite_ends_favorited() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  svc.create_article(&jake, draft("Cycle", &[])).await.unwrap();

  assert!(svc.favorite(&jake, "cycle").await.unwrap().favorited);
  assert!(!svc.unfavorite(&jake, "cycle").await.unwrap().favorited);
  let view = svc.favorite(&jake, "cycle").await.unwrap();
  assert!(view.favorited);
  assert_eq!(view.favorites_count, 1);
}

#[tokio::test]
async fn unfavorite_never_favorited_is_a_no_op() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  svc.create_article(&jake, draft("Quiet", &[])).await.unwrap();

  let view = svc.unfavorite(&jake, "quiet").await.unwrap();
  assert!(!view.favorited);
  assert_eq!(view.favorites_count, 0);
}

#[tokio::test]
async fn favorite_missing_article_is_not_found() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  assert!(matches!(svc.favorite(&jake, "ghost").await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn flags_track_edges_per_viewer() {
  let svc = service().await;
  let author = viewer(&svc, "author").await;
  let fan = viewer(&svc, "fan").await;
  let stranger = viewer(&svc, "stranger").await;
  svc.create_article(&author, draft("Seen", &[])).await.unwrap();

  svc.favorite(&fan, "seen").await.unwrap();
  svc.follow(&fan, "author").await.unwrap();

  let as_fan = svc.get_article(Some(&fan), "seen").await.unwrap();
  assert!(as_fan.favorited);
  assert!(as_fan.author.following);

  let as_stranger = svc.get_article(Some(&stranger), "seen").await.unwrap();
  assert!(!as_stranger.favorited);
  assert!(!as_stranger.author.following);
  assert_eq!(as_stranger.favorites_count, 1);

  let anonymous = svc.get_article(None, "seen").await.unwrap();
  assert!(!anonymous.favorited);
  assert!(!anonymous.author.following);
}

// ─── List / feed ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_newest_first() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  for title in ["First", "Second", "Third"] {
    svc.create_article(&jake, draft(title, &[])).await.unwrap();
    tick().await;
  }

  let list = svc
    .list_articles(None, ArticleFilter::default(), Pagination::new(Some(1), Some(10)))
    .await
    .unwrap();
  let slugs: Vec<_> = list.articles.iter().map(|a| a.slug.as_str()).collect();
  assert_eq!(slugs, ["third", "second", "first"]);
  assert_eq!(list.articles_count, 3);
}

#[tokio::test]
async fn list_count_reflects_returned_page() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  for title in ["a", "b", "c"] {
    svc.create_article(&jake, draft(title, &[])).await.unwrap();
    tick().await;
  }

  let list = svc
    .list_articles(None, ArticleFilter::default(), Pagination::new(Some(2), Some(2)))
    .await
    .unwrap();
  assert_eq!(list.articles_count, 1);
  assert_eq!(list.articles[0].slug, "a");
}

#[tokio::test]
async fn list_filters_by_tag_author_and_favoriter() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  let celeb = viewer(&svc, "celeb").await;

  svc.create_article(&jake, draft("Rusty", &["rust"])).await.unwrap();
  svc.create_article(&celeb, draft("Gopher", &["go"])).await.unwrap();
  svc.favorite(&celeb, "rusty").await.unwrap();

  let by_tag = svc
    .list_articles(
      None,
      ArticleFilter { tag: Some("Rust".into()), ..Default::default() },
      Pagination::default(),
    )
    .await
    .unwrap();
  assert_eq!(by_tag.articles.len(), 1);
  assert_eq!(by_tag.articles[0].slug, "rusty");

  let by_author = svc
    .list_articles(
      None,
      ArticleFilter { author: Some("CELEB".into()), ..Default::default() },
      Pagination::default(),
    )
    .await
    .unwrap();
  assert_eq!(by_author.articles.len(), 1);
  assert_eq!(by_author.articles[0].slug, "gopher");

  let by_fav = svc
    .list_articles(
      None,
      ArticleFilter { favorited_by: Some("celeb".into()), ..Default::default() },
      Pagination::default(),
    )
    .await
    .unwrap();
  assert_eq!(by_fav.articles.len(), 1);
  assert_eq!(by_fav.articles[0].slug, "rusty");

  let blank = svc
    .list_articles(
      None,
      ArticleFilter { tag: Some("".into()), ..Default::default() },
      Pagination::default(),
    )
    .await
    .unwrap();
  assert_eq!(blank.articles.len(), 2);
}

#[tokio::test]
async fn feed_without_followees_is_empty() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  let other = viewer(&svc, "other").await;
  svc.create_article(&other, draft("Elsewhere", &[])).await.unwrap();

  let feed = svc.feed(&jake, Pagination::default()).await.unwrap();
  assert!(feed.articles.is_empty());
  assert_eq!(feed.articles_count, 0);
}

#[tokio::test]
async fn feed_shows_followed_authors_only() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  let celeb = viewer(&svc, "celeb").await;
  let other = viewer(&svc, "other").await;
  svc.create_article(&celeb, draft("Followed", &[])).await.unwrap();
  svc.create_article(&other, draft("Unfollowed", &[])).await.unwrap();

  svc.follow(&jake, "celeb").await.unwrap();
  let feed = svc.feed(&jake, Pagination::default()).await.unwrap();
  assert_eq!(feed.articles.len(), 1);
  assert_eq!(feed.articles[0].slug, "followed");
  assert!(feed.articles[0].author.following);
}

// ─── Update / delete ─────────────────────────────────────────────────────────

#[tokio::test]
async fn update_body_only_keeps_title_and_slug() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  let created = svc.create_article(&jake, draft("Stable Title", &["x"])).await.unwrap();
  tick().await;

  let updated = svc
    .update_article(&jake, "stable-title", UpdateArticle {
      body: Some("rewritten".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.title, "Stable Title");
  assert_eq!(updated.slug, "stable-title");
  assert_eq!(updated.body, "rewritten");
  assert_eq!(updated.tag_list, ["x"]);
  assert!(updated.updated_at > created.updated_at);
  assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_title_changes_slug() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  svc.create_article(&jake, draft("Old Name", &[])).await.unwrap();

  let updated = svc
    .update_article(&jake, "old-name", UpdateArticle {
      title: Some("New  Name".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.slug, "new-name");
  assert!(matches!(svc.get_article(None, "old-name").await, Err(Error::NotFound(_))));
  assert!(svc.get_article(None, "new-name").await.is_ok());
}

#[tokio::test]
async fn update_missing_article_is_not_found() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  let err = svc
    .update_article(&jake, "ghost", UpdateArticle::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn delete_is_unconditional() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  svc.create_article(&jake, draft("Gone Soon", &[])).await.unwrap();

  svc.delete_article("gone-soon").await.unwrap();
  svc.delete_article("gone-soon").await.unwrap();
  assert!(matches!(svc.get_article(None, "gone-soon").await, Err(Error::NotFound(_))));
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn comments_list_oldest_first_with_follow_flag() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  let celeb = viewer(&svc, "celeb").await;
  svc.create_article(&jake, draft("Talk", &[])).await.unwrap();
  svc.follow(&jake, "celeb").await.unwrap();

  let first = svc.add_comment(&celeb, "talk", "first!".into()).await.unwrap();
  assert!(!first.author.following);
  tick().await;
  svc.add_comment(&jake, "talk", "second".into()).await.unwrap();

  let comments = svc.list_comments(Some(&jake), "talk").await.unwrap();
  let bodies: Vec<_> = comments.iter().map(|c| c.body.as_str()).collect();
  assert_eq!(bodies, ["first!", "second"]);
  assert!(comments[0].author.following);
  assert_eq!(comments[0].id, first.id);

  let anonymous = svc.list_comments(None, "talk").await.unwrap();
  assert!(anonymous.iter().all(|c| !c.author.following));
}

#[tokio::test]
async fn comment_on_missing_article_is_not_found() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  assert!(matches!(
    svc.add_comment(&jake, "ghost", "hi".into()).await,
    Err(Error::NotFound(_))
  ));
  assert!(matches!(svc.list_comments(None, "ghost").await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn blank_comment_is_rejected() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  svc.create_article(&jake, draft("Talk", &[])).await.unwrap();
  assert!(matches!(
    svc.add_comment(&jake, "talk", " ".into()).await,
    Err(Error::Validation(_))
  ));
}

#[tokio::test]
async fn delete_missing_comment_succeeds() {
  let svc = service().await;
  svc.delete_comment(42).await.unwrap();
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn follow_and_unfollow_profile() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  viewer(&svc, "celeb").await;

  assert!(svc.follow(&jake, "celeb").await.unwrap().following);
  assert!(svc.follow(&jake, "celeb").await.unwrap().following);
  assert!(svc.profile(Some(&jake), "celeb").await.unwrap().following);
  assert!(!svc.profile(None, "celeb").await.unwrap().following);
  assert!(!svc.unfollow(&jake, "celeb").await.unwrap().following);
}

#[tokio::test]
async fn missing_profile_is_not_found() {
  let svc = service().await;
  let jake = viewer(&svc, "jake").await;
  assert!(matches!(svc.profile(None, "nobody").await, Err(Error::NotFound(_))));
  assert!(matches!(svc.follow(&jake, "nobody").await, Err(Error::NotFound(_))));
}
