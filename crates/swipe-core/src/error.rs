//! Error types for `swipe-core`.
//!
//! Each port has its own error type so that the engine can tell a transient
//! infrastructure failure from a meaningful outcome such as
//! [`RepositoryError::AlreadyMatched`]. Adapters convert their native errors
//! into these at the trait boundary.

use thiserror::Error;

use crate::decision::UserId;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a [`DecisionCache`](crate::cache::DecisionCache) call.
#[derive(Debug, Error)]
pub enum CacheError {
  #[error("cache unavailable: {0}")]
  Unavailable(#[source] BoxError),

  #[error("cache call timed out: {0}")]
  Timeout(&'static str),

  #[error("malformed cache value: {0}")]
  Malformed(String),
}

/// Failure of a [`MatchRepository`](crate::repository::MatchRepository) call.
#[derive(Debug, Error)]
pub enum RepositoryError {
  /// A match row for this pair already exists.
  #[error("users {user_id} and {matched_user_id} are already matched")]
  AlreadyMatched {
    user_id:         UserId,
    matched_user_id: UserId,
  },

  /// The store refused the write for a reason other than a duplicate pair.
  #[error("write rejected: {0}")]
  Rejected(String),

  #[error("repository unavailable: {0}")]
  Unavailable(#[source] BoxError),

  #[error("repository call timed out: {0}")]
  Timeout(&'static str),
}

/// Failure of a [`MediaSigner`](crate::enrich::MediaSigner) call.
#[derive(Debug, Error)]
pub enum EnrichmentError {
  #[error("cannot sign media url {0:?}")]
  InvalidUrl(String),

  #[error("signing service unavailable: {0}")]
  Unavailable(#[source] BoxError),

  #[error("signing call timed out")]
  Timeout,
}

/// Errors surfaced by the swipe engine to its callers.
#[derive(Debug, Error)]
pub enum Error {
  #[error("user {actor} has already liked user {target}")]
  DuplicateLike { actor: UserId, target: UserId },

  #[error("user {0} cannot swipe on themselves")]
  SelfSwipe(UserId),

  #[error("users {user_id} and {other_id} are not matched")]
  NotMatched { user_id: UserId, other_id: UserId },

  #[error(transparent)]
  CacheUnavailable(#[from] CacheError),

  #[error(transparent)]
  RepositoryUnavailable(#[from] RepositoryError),

  #[error(transparent)]
  Enrichment(#[from] EnrichmentError),
}

impl Error {
  /// Infrastructure failures the caller may retry later.
  pub fn is_transient(&self) -> bool {
    match self {
      Self::CacheUnavailable(_) | Self::RepositoryUnavailable(_) => true,
      Self::Enrichment(e) => !matches!(e, EnrichmentError::InvalidUrl(_)),
      _ => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn infrastructure_errors_are_transient() {
    assert!(Error::from(CacheError::Timeout("get_decision")).is_transient());
    assert!(Error::from(RepositoryError::Timeout("insert_match_pair")).is_transient());
    assert!(!Error::DuplicateLike { actor: 1, target: 2 }.is_transient());
    assert!(!Error::SelfSwipe(1).is_transient());
  }

  #[test]
  fn duplicate_like_message_names_both_users() {
    let msg = Error::DuplicateLike { actor: 3, target: 8 }.to_string();
    assert_eq!(msg, "user 3 has already liked user 8");
  }
}
