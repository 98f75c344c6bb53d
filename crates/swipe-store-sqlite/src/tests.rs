//! Integration tests for `SqliteStore` against an in-memory database.

use swipe_core::{
  RepositoryError,
  matches::{MatchType, NewMatch},
  repository::MatchRepository,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Match pairs ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_pair_writes_both_directions() {
  let s = store().await;
  let (ab, ba) = NewMatch::pair(1, 2);

  let (r1, r2) = s.insert_match_pair(ab, ba).await.unwrap();
  assert_eq!((r1.user_id, r1.matched_user_id), (1, 2));
  assert_eq!((r2.user_id, r2.matched_user_id), (2, 1));
  assert_eq!(r1.chat_id, r2.chat_id);
  assert_ne!(r1.id, r2.id);

  let fetched = s.find_match_between(1, 2).await.unwrap().unwrap();
  assert_eq!(fetched, r1);
  let fetched = s.find_match_between(2, 1).await.unwrap().unwrap();
  assert_eq!(fetched.match_type, MatchType::Mutual);
  assert_eq!(fetched.chat_id, "1_2");
}

#[tokio::test]
async fn find_match_between_missing_returns_none() {
  let s = store().await;
  assert!(s.find_match_between(1, 2).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_pair_is_already_matched() {
  let s = store().await;
  let (ab, ba) = NewMatch::pair(1, 2);
  s.insert_match_pair(ab, ba).await.unwrap();

  // The racing side builds the pair from its own perspective.
  let (ba, ab) = NewMatch::pair(2, 1);
  let err = s.insert_match_pair(ba, ab).await.unwrap_err();
  assert!(matches!(err, RepositoryError::AlreadyMatched { user_id: 2, matched_user_id: 1 }));

  assert_eq!(s.find_matches_for_user(1).await.unwrap().len(), 1);
  assert_eq!(s.find_matches_for_user(2).await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_second_row_leaves_no_orphan() {
  let s = store().await;
  let (ab, _) = NewMatch::pair(1, 2);
  // A self-match violates the CHECK constraint on the second insert.
  let broken = NewMatch {
    user_id:         2,
    matched_user_id: 2,
    match_type:      MatchType::Mutual,
    chat_id:         ab.chat_id.clone(),
  };

  let err = s.insert_match_pair(ab, broken).await.unwrap_err();
  assert!(matches!(err, RepositoryError::Rejected(_)), "got {err:?}");

  assert!(s.find_match_between(1, 2).await.unwrap().is_none());
  assert!(s.find_match_between(2, 1).await.unwrap().is_none());
  assert!(s.find_matches_for_user(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn matches_for_user_only_returns_own_rows() {
  let s = store().await;
  let (a, b) = NewMatch::pair(1, 2);
  s.insert_match_pair(a, b).await.unwrap();
  let (a, b) = NewMatch::pair(1, 3);
  s.insert_match_pair(a, b).await.unwrap();
  let (a, b) = NewMatch::pair(2, 3);
  s.insert_match_pair(a, b).await.unwrap();

  let mine = s.find_matches_for_user(1).await.unwrap();
  assert_eq!(mine.len(), 2);
  assert!(mine.iter().all(|m| m.user_id == 1));
  assert_eq!(
    mine.iter().map(|m| m.matched_user_id).collect::<Vec<_>>(),
    vec![2, 3]
  );
}

#[tokio::test]
async fn delete_pair_removes_both_directions() {
  let s = store().await;
  let (a, b) = NewMatch::pair(1, 2);
  s.insert_match_pair(a, b).await.unwrap();

  assert!(s.delete_match_pair(2, 1).await.unwrap());
  assert!(s.find_match_between(1, 2).await.unwrap().is_none());
  assert!(s.find_match_between(2, 1).await.unwrap().is_none());

  assert!(!s.delete_match_pair(1, 2).await.unwrap());
}

#[tokio::test]
async fn pair_can_be_recreated_after_delete() {
  let s = store().await;
  let (a, b) = NewMatch::pair(1, 2);
  s.insert_match_pair(a, b).await.unwrap();
  s.delete_match_pair(1, 2).await.unwrap();

  let (a, b) = NewMatch::pair(1, 2);
  assert!(s.insert_match_pair(a, b).await.is_ok());
}

// ─── Media ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_media_picks_display_slot() {
  let s = store().await;
  s.add_media(1, "https://bucket/1/a.webp", 1).await.unwrap();
  s.add_media(1, "https://bucket/1/b.webp", 2).await.unwrap();
  s.add_media(2, "https://bucket/2/a.webp", 2).await.unwrap();

  let media = s.first_media_for_users(&[1, 2]).await.unwrap();
  assert_eq!(media.len(), 1);
  assert_eq!(media[0].user_id, 1);
  assert_eq!(media[0].url, "https://bucket/1/a.webp");
}

#[tokio::test]
async fn first_media_skips_deleted_rows() {
  let s = store().await;
  let old = s.add_media(1, "https://bucket/1/old.webp", 1).await.unwrap();
  assert!(s.remove_media(old.id).await.unwrap());
  assert!(!s.remove_media(old.id).await.unwrap());

  assert!(s.first_media_for_users(&[1]).await.unwrap().is_empty());

  s.add_media(1, "https://bucket/1/new.webp", 1).await.unwrap();
  let media = s.first_media_for_users(&[1]).await.unwrap();
  assert_eq!(media.len(), 1);
  assert_eq!(media[0].url, "https://bucket/1/new.webp");
}

#[tokio::test]
async fn first_media_newest_row_wins() {
  let s = store().await;
  s.add_media(5, "https://bucket/5/first.webp", 1).await.unwrap();
  s.add_media(5, "https://bucket/5/second.webp", 1).await.unwrap();

  let media = s.first_media_for_users(&[5]).await.unwrap();
  assert_eq!(media.len(), 1);
  assert_eq!(media[0].url, "https://bucket/5/second.webp");
}

#[tokio::test]
async fn first_media_for_no_users_is_empty() {
  let s = store().await;
  s.add_media(1, "https://bucket/1/a.webp", 1).await.unwrap();
  assert!(s.first_media_for_users(&[]).await.unwrap().is_empty());
}
