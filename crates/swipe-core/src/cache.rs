//! The `DecisionCache` port.
//!
//! The decision cache is the fast, ephemeral tier: it holds the current
//! decision for each ordered pair and the per-user "pending likers" queue.
//! Every method is an independent, non-transactional call; sequencing is the
//! engine's job.

use std::{future::Future, time::Duration};

use crate::{
  decision::{Decision, PairKey, UserId},
  error::CacheError,
};

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Abstraction over a decision cache backend.
///
/// A missing key is a normal `Ok(None)`, never an error.
pub trait DecisionCache: Send + Sync {
  /// The current decision for `key`, if any and not expired.
  fn get_decision(
    &self,
    key: PairKey,
  ) -> impl Future<Output = CacheResult<Option<Decision>>> + Send + '_;

  /// Overwrite the decision for `key`; it expires after `ttl`.
  fn put_decision(
    &self,
    key: PairKey,
    decision: Decision,
    ttl: Duration,
  ) -> impl Future<Output = CacheResult<()>> + Send + '_;

  /// Forget the decision for `key`. Succeeds when nothing is stored.
  fn delete_decision(
    &self,
    key: PairKey,
  ) -> impl Future<Output = CacheResult<()>> + Send + '_;

  /// Add `actor` to the tail of `target`'s pending likers. An existing entry
  /// for `actor` is moved rather than duplicated.
  fn append_pending_liker(
    &self,
    target: UserId,
    actor: UserId,
  ) -> impl Future<Output = CacheResult<()>> + Send + '_;

  /// Remove every occurrence of `actor` from `target`'s pending likers.
  fn remove_pending_liker(
    &self,
    target: UserId,
    actor: UserId,
  ) -> impl Future<Output = CacheResult<()>> + Send + '_;

  /// `target`'s pending likers, oldest first.
  fn list_pending_likers(
    &self,
    target: UserId,
  ) -> impl Future<Output = CacheResult<Vec<UserId>>> + Send + '_;
}
