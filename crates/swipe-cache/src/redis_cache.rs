//! [`RedisCache`]: a [`DecisionCache`] backed by Redis.
//!
//! Key layout, with `{p}` the configured prefix:
//!
//! | Key | Type | Contents |
//! |-----|------|----------|
//! | `{p}:decision:{actor}:{target}` | string, `EX ttl` | `like` / `dislike` |
//! | `{p}:likers:{target}` | list | pending liker ids, oldest at the head |

use std::time::Duration;

use redis::{AsyncCommands as _, Client, aio::ConnectionManager};
use swipe_core::{
  Decision, PairKey, UserId,
  cache::{CacheResult, DecisionCache},
};

use crate::{Error, Result};

/// Decision cache stored in Redis.
///
/// Cloning is cheap: the connection manager is shared and reconnects on
/// its own.
#[derive(Clone)]
pub struct RedisCache {
  conn:   ConnectionManager,
  prefix: String,
}

impl RedisCache {
  /// Connect to `url` (e.g. `redis://127.0.0.1/`) and namespace every key
  /// under `prefix`.
  pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self> {
    let client = Client::open(url)?;
    let conn   = client.get_connection_manager().await?;
    Ok(Self {
      conn,
      prefix: prefix.into(),
    })
  }

  fn decision_key(&self, key: PairKey) -> String { decision_key(&self.prefix, key) }

  fn likers_key(&self, target: UserId) -> String { likers_key(&self.prefix, target) }

  async fn get(&self, key: PairKey) -> Result<Option<Decision>> {
    let mut conn = self.conn.clone();
    let raw: Option<String> = conn.get(self.decision_key(key)).await?;
    raw
      .map(|s| s.parse::<Decision>().map_err(|_| Error::Malformed(s)))
      .transpose()
  }

  async fn put(&self, key: PairKey, decision: Decision, ttl: Duration) -> Result<()> {
    let mut conn = self.conn.clone();
    // Redis rejects EX 0.
    let seconds = ttl.as_secs().max(1);
    let _: () = conn
      .set_ex(self.decision_key(key), decision.to_string(), seconds)
      .await?;
    Ok(())
  }

  async fn delete(&self, key: PairKey) -> Result<()> {
    let mut conn = self.conn.clone();
    let _: () = conn.del(self.decision_key(key)).await?;
    Ok(())
  }

  async fn append(&self, target: UserId, actor: UserId) -> Result<()> {
    let mut conn = self.conn.clone();
    let key = self.likers_key(target);
    // LREM + RPUSH in one MULTI so the actor is never listed twice.
    let _: () = redis::pipe()
      .atomic()
      .lrem(&key, 0, actor)
      .ignore()
      .rpush(&key, actor)
      .ignore()
      .query_async(&mut conn)
      .await?;
    Ok(())
  }

  async fn remove(&self, target: UserId, actor: UserId) -> Result<()> {
    let mut conn = self.conn.clone();
    let _: () = conn.lrem(self.likers_key(target), 0, actor).await?;
    Ok(())
  }

  async fn list(&self, target: UserId) -> Result<Vec<UserId>> {
    let mut conn = self.conn.clone();
    Ok(conn.lrange(self.likers_key(target), 0, -1).await?)
  }
}

pub(crate) fn decision_key(prefix: &str, key: PairKey) -> String {
  format!("{prefix}:decision:{key}")
}

pub(crate) fn likers_key(prefix: &str, target: UserId) -> String {
  format!("{prefix}:likers:{target}")
}

// ─── DecisionCache impl ──────────────────────────────────────────────────────

impl DecisionCache for RedisCache {
  async fn get_decision(&self, key: PairKey) -> CacheResult<Option<Decision>> {
    Ok(self.get(key).await?)
  }

  async fn put_decision(&self, key: PairKey, decision: Decision, ttl: Duration) -> CacheResult<()> {
    Ok(self.put(key, decision, ttl).await?)
  }

  async fn delete_decision(&self, key: PairKey) -> CacheResult<()> {
    Ok(self.delete(key).await?)
  }

  async fn append_pending_liker(&self, target: UserId, actor: UserId) -> CacheResult<()> {
    Ok(self.append(target, actor).await?)
  }

  async fn remove_pending_liker(&self, target: UserId, actor: UserId) -> CacheResult<()> {
    Ok(self.remove(target, actor).await?)
  }

  async fn list_pending_likers(&self, target: UserId) -> CacheResult<Vec<UserId>> {
    Ok(self.list(target).await?)
  }
}
