//! [`MemoryCache`]: an in-process [`DecisionCache`].

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
  time::Duration,
};

use swipe_core::{
  Decision, PairKey, UserId,
  cache::{CacheResult, DecisionCache},
};
use tokio::time::Instant;

/// Expired decisions are swept after this many writes.
pub(crate) const PURGE_EVERY: u64 = 1024;

/// Expiry used when `now + ttl` is not representable.
const FOREVER: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

struct Entry {
  decision:   Decision,
  expires_at: Instant,
}

#[derive(Default)]
struct Inner {
  decisions: HashMap<PairKey, Entry>,
  likers:    HashMap<UserId, Vec<UserId>>,
  writes:    u64,
}

impl Inner {
  /// Take `key.actor` out of `key.target`'s queue.
  fn drop_liker(&mut self, key: PairKey) {
    if let Some(queue) = self.likers.get_mut(&key.target) {
      queue.retain(|id| *id != key.actor);
      if queue.is_empty() {
        self.likers.remove(&key.target);
      }
    }
  }

  /// Drop expired decisions, and the queue entries of expired likes.
  fn purge_expired(&mut self, now: Instant) {
    let mut lapsed_likes = Vec::new();
    self.decisions.retain(|key, e| {
      let live = e.expires_at > now;
      if !live && e.decision.is_like() {
        lapsed_likes.push(*key);
      }
      live
    });

    for key in &lapsed_likes {
      self.drop_liker(*key);
    }
    if !lapsed_likes.is_empty() {
      tracing::debug!(lapsed = lapsed_likes.len(), "purged expired likes");
    }
  }
}

/// Decision cache held in process memory.
///
/// Expiry is lazy: an expired decision reads as absent and is dropped on
/// access or during the periodic sweep. An expired like also leaves the
/// target's pending-liker queue. Cloning is cheap and clones share
/// state.
#[derive(Clone, Default)]
pub struct MemoryCache {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryCache {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl DecisionCache for MemoryCache {
  async fn get_decision(&self, key: PairKey) -> CacheResult<Option<Decision>> {
    let now = Instant::now();
    let mut guard = self.lock();
    let inner = &mut *guard;
    let current = inner.decisions.get(&key).map(|e| (e.decision, e.expires_at));
    match current {
      Some((decision, expires_at)) if expires_at > now => Ok(Some(decision)),
      Some((decision, _)) => {
        inner.decisions.remove(&key);
        if decision.is_like() {
          inner.drop_liker(key);
        }
        Ok(None)
      }
      None => Ok(None),
    }
  }

  async fn put_decision(&self, key: PairKey, decision: Decision, ttl: Duration) -> CacheResult<()> {
    let mut inner = self.lock();
    let now = Instant::now();
    let expires_at = now
      .checked_add(ttl)
      .unwrap_or_else(|| now + FOREVER);
    inner.decisions.insert(key, Entry {
      decision,
      expires_at,
    });
    inner.writes += 1;
    if inner.writes % PURGE_EVERY == 0 {
      inner.purge_expired(now);
    }
    Ok(())
  }

  async fn delete_decision(&self, key: PairKey) -> CacheResult<()> {
    self.lock().decisions.remove(&key);
    Ok(())
  }

  async fn append_pending_liker(&self, target: UserId, actor: UserId) -> CacheResult<()> {
    let mut inner = self.lock();
    let queue = inner.likers.entry(target).or_default();
    queue.retain(|id| *id != actor);
    queue.push(actor);
    Ok(())
  }

  async fn remove_pending_liker(&self, target: UserId, actor: UserId) -> CacheResult<()> {
    self.lock().drop_liker(PairKey::new(actor, target));
    Ok(())
  }

  async fn list_pending_likers(&self, target: UserId) -> CacheResult<Vec<UserId>> {
    Ok(self.lock().likers.get(&target).cloned().unwrap_or_default())
  }
}
