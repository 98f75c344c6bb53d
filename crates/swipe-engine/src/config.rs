use std::time::Duration;

/// Tunables for [`SwipeEngine`](crate::SwipeEngine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
  /// Lifetime of a cached decision.
  pub decision_ttl:       Duration,
  /// Upper bound on every individual cache, repository and signer call.
  pub call_timeout:       Duration,
  /// Re-read the reciprocal decision after recording a one-sided like, so
  /// that a like written concurrently by another engine instance still
  /// forms a match.
  pub recheck_reciprocal: bool,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      decision_ttl:       Duration::from_secs(48 * 60 * 60),
      call_timeout:       Duration::from_secs(5),
      recheck_reciprocal: true,
    }
  }
}
