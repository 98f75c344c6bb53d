//! [`SwipeEngine`]: swipe, likers, matches and unmatch.

use std::{
  collections::{HashMap, HashSet},
  future::Future,
};

use serde::{Deserialize, Serialize};
use swipe_core::{
  CacheError, Decision, EnrichmentError, Error, PairKey, RepositoryError, Result, UserId,
  cache::{CacheResult, DecisionCache},
  enrich::MediaSigner,
  matches::{MatchView, NewMatch},
  media::{DisplayMedia, Liker},
  repository::{MatchRepository, RepoResult},
};
use tracing::{debug, info, warn};

use crate::{EngineConfig, lock::PairLocks};

/// Result of a single swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeOutcome {
  pub is_match: bool,
}

/// Orchestrates the decision cache and the match repository.
///
/// Swipes and unmatches on the same unordered pair are serialised within one
/// engine. Across engines sharing a cache, a read-after-write re-check (see
/// [`EngineConfig::recheck_reciprocal`]) catches likes that crossed in flight,
/// and the repository's uniqueness guarantee keeps the pair single.
pub struct SwipeEngine<C, R, S> {
  cache:  C,
  repo:   R,
  signer: S,
  config: EngineConfig,
  locks:  PairLocks,
}

impl<C, R, S> SwipeEngine<C, R, S>
where
  C: DecisionCache,
  R: MatchRepository,
  S: MediaSigner,
{
  pub fn new(cache: C, repo: R, signer: S, config: EngineConfig) -> Self {
    Self {
      cache,
      repo,
      signer,
      config,
      locks: PairLocks::default(),
    }
  }

  pub fn config(&self) -> &EngineConfig { &self.config }

  // ─── Swipe ─────────────────────────────────────────────────────────────────

  /// Record `actor`'s verdict on `target` and report whether it completed a
  /// mutual like.
  ///
  /// A repeated like is rejected with [`Error::DuplicateLike`] before
  /// anything is written. Any cache or repository failure aborts the swipe
  /// and is returned as is.
  #[tracing::instrument(skip(self))]
  pub async fn swipe(&self, actor: UserId, target: UserId, action: Decision) -> Result<SwipeOutcome> {
    if actor == target {
      return Err(Error::SelfSwipe(actor));
    }

    let key = PairKey::new(actor, target);
    let _pair = self.locks.acquire(key.unordered()).await;

    let previous = self.cached("get_decision", self.cache.get_decision(key)).await?;
    if action.is_like() && previous == Some(Decision::Like) {
      debug!("duplicate like rejected");
      return Err(Error::DuplicateLike { actor, target });
    }

    let reciprocal = self.cached("get_decision", self.cache.get_decision(key.reversed())).await?;

    let is_match = match action {
      Decision::Like if reciprocal == Some(Decision::Like) => self.form_match(key).await?,
      Decision::Like => self.like_one_sided(key).await?,
      Decision::Dislike => {
        self.dislike(key, previous, reciprocal).await?;
        false
      }
    };

    Ok(SwipeOutcome { is_match })
  }

  /// Record a like the other side has not returned yet. Returns `true` if
  /// the re-check found that it has, after all.
  async fn like_one_sided(&self, key: PairKey) -> Result<bool> {
    self.put(key, Decision::Like).await?;
    self
      .cached(
        "append_pending_liker",
        self.cache.append_pending_liker(key.target, key.actor),
      )
      .await?;
    debug!("like pending");

    if !self.config.recheck_reciprocal {
      return Ok(false);
    }
    let now = self.cached("get_decision", self.cache.get_decision(key.reversed())).await?;
    if now != Some(Decision::Like) {
      return Ok(false);
    }

    debug!("reciprocal like appeared during swipe");
    self.form_match(key).await
  }

  /// Persist the match for a mutual like. Returns `false` when the pair was
  /// already matched before this swipe, so a renewed like on an existing
  /// match is not announced twice.
  async fn form_match(&self, key: PairKey) -> Result<bool> {
    let existing = self
      .stored(
        "find_match_between",
        self.repo.find_match_between(key.actor, key.target),
      )
      .await?;

    let is_new = match existing {
      Some(_) => {
        debug!("pair already matched");
        false
      }
      None => {
        let (ours, theirs) = NewMatch::pair(key.actor, key.target);
        match self
          .stored("insert_match_pair", self.repo.insert_match_pair(ours, theirs))
          .await
        {
          Ok((row, _)) => info!(chat_id = %row.chat_id, "match formed"),
          // Another instance closed the same loop between our read and write.
          Err(RepositoryError::AlreadyMatched { .. }) => {
            warn!("pair matched concurrently, keeping existing rows");
          }
          Err(e) => return Err(e.into()),
        }
        true
      }
    };

    self.put(key, Decision::Like).await?;
    self.clear_pending(key).await?;
    Ok(is_new)
  }

  async fn dislike(
    &self,
    key: PairKey,
    previous: Option<Decision>,
    reciprocal: Option<Decision>,
  ) -> Result<()> {
    self.put(key, Decision::Dislike).await?;
    if previous == Some(Decision::Like) {
      debug!("like withdrawn");
      self
        .cached(
          "remove_pending_liker",
          self.cache.remove_pending_liker(key.target, key.actor),
        )
        .await?;
    }
    if reciprocal == Some(Decision::Like) {
      debug!("incoming like rejected");
      self
        .cached(
          "remove_pending_liker",
          self.cache.remove_pending_liker(key.actor, key.target),
        )
        .await?;
    }
    Ok(())
  }

  // ─── Likers ────────────────────────────────────────────────────────────────

  /// Users with an unanswered like toward `user_id`, oldest first, each with
  /// their display media.
  #[tracing::instrument(skip(self))]
  pub async fn likers(&self, user_id: UserId) -> Result<Vec<Liker>> {
    let queued = self
      .cached("list_pending_likers", self.cache.list_pending_likers(user_id))
      .await?;

    let mut seen = HashSet::with_capacity(queued.len());
    let mut ids = Vec::with_capacity(queued.len());
    for id in queued {
      if id == user_id || !seen.insert(id) {
        continue;
      }
      if self.still_likes(id, user_id).await? {
        ids.push(id);
      }
    }
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    // A crash between the match insert and the cache cleanup can leave
    // matched users queued here.
    let matched: HashSet<UserId> = self
      .stored("find_matches_for_user", self.repo.find_matches_for_user(user_id))
      .await?
      .into_iter()
      .map(|m| m.matched_user_id)
      .collect();
    ids.retain(|id| {
      let dangling = matched.contains(id);
      if dangling {
        warn!(liker = *id, "skipping pending liker that is already matched");
      }
      !dangling
    });

    let mut media = self.display_media(&ids).await?;
    Ok(
      ids
        .into_iter()
        .map(|id| Liker {
          user_id:       id,
          display_media: media.remove(&id),
        })
        .collect(),
    )
  }

  /// Whether `liker`'s like toward `user_id` is still live. An entry whose
  /// decision expired or changed is dropped from the queue.
  async fn still_likes(&self, liker: UserId, user_id: UserId) -> Result<bool> {
    let decision = self
      .cached("get_decision", self.cache.get_decision(PairKey::new(liker, user_id)))
      .await?;
    if decision == Some(Decision::Like) {
      return Ok(true);
    }
    debug!(liker, "pruning stale pending liker");
    self
      .cached(
        "remove_pending_liker",
        self.cache.remove_pending_liker(user_id, liker),
      )
      .await?;
    Ok(false)
  }

  // ─── Matches ───────────────────────────────────────────────────────────────

  /// Confirmed matches of `user_id`, read from the repository.
  #[tracing::instrument(skip(self))]
  pub async fn matches(&self, user_id: UserId) -> Result<Vec<MatchView>> {
    let records = self
      .stored("find_matches_for_user", self.repo.find_matches_for_user(user_id))
      .await?;
    let others: Vec<UserId> = records.iter().map(|r| r.matched_user_id).collect();
    let media = self.display_media(&others).await?;

    Ok(
      records
        .into_iter()
        .map(|record| MatchView {
          display_media: media.get(&record.matched_user_id).cloned(),
          record,
        })
        .collect(),
    )
  }

  // ─── Unmatch ───────────────────────────────────────────────────────────────

  /// Dissolve the match between `user_id` and `other_id` and forget both
  /// decisions, so the two can swipe on each other afresh.
  #[tracing::instrument(skip(self))]
  pub async fn unmatch(&self, user_id: UserId, other_id: UserId) -> Result<()> {
    let key = PairKey::new(user_id, other_id);
    let _pair = self.locks.acquire(key.unordered()).await;

    let existing = self
      .stored("find_match_between", self.repo.find_match_between(user_id, other_id))
      .await?;
    if existing.is_none() {
      return Err(Error::NotMatched { user_id, other_id });
    }

    self
      .stored("delete_match_pair", self.repo.delete_match_pair(user_id, other_id))
      .await?;
    self.cached("delete_decision", self.cache.delete_decision(key)).await?;
    self
      .cached("delete_decision", self.cache.delete_decision(key.reversed()))
      .await?;
    self.clear_pending(key).await?;

    info!("match dissolved");
    Ok(())
  }

  // ─── Helpers ───────────────────────────────────────────────────────────────

  async fn put(&self, key: PairKey, decision: Decision) -> Result<()> {
    self
      .cached(
        "put_decision",
        self.cache.put_decision(key, decision, self.config.decision_ttl),
      )
      .await
  }

  /// Drop both users from each other's pending likers.
  async fn clear_pending(&self, key: PairKey) -> Result<()> {
    self
      .cached(
        "remove_pending_liker",
        self.cache.remove_pending_liker(key.target, key.actor),
      )
      .await?;
    self
      .cached(
        "remove_pending_liker",
        self.cache.remove_pending_liker(key.actor, key.target),
      )
      .await
  }

  /// Signed display media keyed by owner. Users without media are absent.
  async fn display_media(&self, user_ids: &[UserId]) -> Result<HashMap<UserId, DisplayMedia>> {
    if user_ids.is_empty() {
      return Ok(HashMap::new());
    }

    let rows = self
      .stored("first_media_for_users", self.repo.first_media_for_users(user_ids))
      .await?;

    let mut media = HashMap::with_capacity(rows.len());
    for row in rows {
      let url = self.signed(&row.url).await?;
      media.insert(row.user_id, DisplayMedia {
        media_id: row.id,
        order_id: row.order_id,
        url,
      });
    }
    Ok(media)
  }

  async fn cached<T>(
    &self,
    op: &'static str,
    call: impl Future<Output = CacheResult<T>>,
  ) -> Result<T> {
    let outcome = tokio::time::timeout(self.config.call_timeout, call)
      .await
      .unwrap_or_else(|_| Err(CacheError::Timeout(op)));
    Ok(outcome?)
  }

  /// Repository errors are returned unconverted so that callers can react
  /// to [`RepositoryError::AlreadyMatched`].
  async fn stored<T>(
    &self,
    op: &'static str,
    call: impl Future<Output = RepoResult<T>>,
  ) -> RepoResult<T> {
    tokio::time::timeout(self.config.call_timeout, call)
      .await
      .unwrap_or_else(|_| Err(RepositoryError::Timeout(op)))
  }

  async fn signed(&self, raw_url: &str) -> Result<String> {
    let outcome = tokio::time::timeout(self.config.call_timeout, self.signer.sign(raw_url))
      .await
      .unwrap_or(Err(EnrichmentError::Timeout));
    Ok(outcome?)
  }
}
