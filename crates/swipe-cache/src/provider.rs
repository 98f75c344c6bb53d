//! [`CacheProvider`]: runtime choice of cache backend.

use std::time::Duration;

use swipe_core::{
  Decision, PairKey, UserId,
  cache::{CacheResult, DecisionCache},
};

use crate::{MemoryCache, RedisCache};

/// Either backend behind one concrete type, so the engine stays generic
/// over a single `DecisionCache` without trait objects.
#[derive(Clone)]
pub enum CacheProvider {
  Memory(MemoryCache),
  Redis(RedisCache),
}

impl CacheProvider {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Memory(_) => "memory",
      Self::Redis(_) => "redis",
    }
  }
}

impl From<MemoryCache> for CacheProvider {
  fn from(c: MemoryCache) -> Self { Self::Memory(c) }
}

impl From<RedisCache> for CacheProvider {
  fn from(c: RedisCache) -> Self { Self::Redis(c) }
}

impl DecisionCache for CacheProvider {
  async fn get_decision(&self, key: PairKey) -> CacheResult<Option<Decision>> {
    match self {
      Self::Memory(c) => c.get_decision(key).await,
      Self::Redis(c) => c.get_decision(key).await,
    }
  }

  async fn put_decision(&self, key: PairKey, decision: Decision, ttl: Duration) -> CacheResult<()> {
    match self {
      Self::Memory(c) => c.put_decision(key, decision, ttl).await,
      Self::Redis(c) => c.put_decision(key, decision, ttl).await,
    }
  }

  async fn delete_decision(&self, key: PairKey) -> CacheResult<()> {
    match self {
      Self::Memory(c) => c.delete_decision(key).await,
      Self::Redis(c) => c.delete_decision(key).await,
    }
  }

  async fn append_pending_liker(&self, target: UserId, actor: UserId) -> CacheResult<()> {
    match self {
      Self::Memory(c) => c.append_pending_liker(target, actor).await,
      Self::Redis(c) => c.append_pending_liker(target, actor).await,
    }
  }

  async fn remove_pending_liker(&self, target: UserId, actor: UserId) -> CacheResult<()> {
    match self {
      Self::Memory(c) => c.remove_pending_liker(target, actor).await,
      Self::Redis(c) => c.remove_pending_liker(target, actor).await,
    }
  }

  async fn list_pending_likers(&self, target: UserId) -> CacheResult<Vec<UserId>> {
    match self {
      Self::Memory(c) => c.list_pending_likers(target).await,
      Self::Redis(c) => c.list_pending_likers(target).await,
    }
  }
}
