//! The `MatchRepository` port.
//!
//! The durable tier. Match rows are the sole authority on whether two users
//! are matched. The repository also serves the profile media used to
//! decorate read results.

use std::future::Future;

use crate::{
  decision::UserId,
  error::RepositoryError,
  matches::{MatchRecord, NewMatch},
  media::ProfileMedia,
};

pub type RepoResult<T> = std::result::Result<T, RepositoryError>;

/// Abstraction over a relational match store.
pub trait MatchRepository: Send + Sync {
  // ── Matches ───────────────────────────────────────────────────────────

  /// Insert both directions of a match in one transaction: either both rows
  /// are written or neither is.
  ///
  /// Returns [`RepositoryError::AlreadyMatched`] when a row for either
  /// direction already exists.
  fn insert_match_pair(
    &self,
    a: NewMatch,
    b: NewMatch,
  ) -> impl Future<Output = RepoResult<(MatchRecord, MatchRecord)>> + Send + '_;

  /// All match rows owned by `user_id`, oldest first.
  fn find_matches_for_user(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = RepoResult<Vec<MatchRecord>>> + Send + '_;

  /// The row `(user_id → other_id)`, if present.
  fn find_match_between(
    &self,
    user_id: UserId,
    other_id: UserId,
  ) -> impl Future<Output = RepoResult<Option<MatchRecord>>> + Send + '_;

  /// Delete both directions of the match. Returns `false` when there was
  /// nothing to delete.
  fn delete_match_pair(
    &self,
    user_id: UserId,
    other_id: UserId,
  ) -> impl Future<Output = RepoResult<bool>> + Send + '_;

  // ── Media ─────────────────────────────────────────────────────────────

  /// The live display media (see [`DISPLAY_ORDER`](crate::media::DISPLAY_ORDER))
  /// for each of `user_ids` that has one. Order is unspecified.
  fn first_media_for_users<'a>(
    &'a self,
    user_ids: &'a [UserId],
  ) -> impl Future<Output = RepoResult<Vec<ProfileMedia>>> + Send + 'a;
}
