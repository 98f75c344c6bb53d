//! Per-pair single-flight locks.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError, Weak},
};

use swipe_core::UserId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Dead slots are swept once the table grows past this size.
const PRUNE_AT: usize = 256;

type Slot = AsyncMutex<()>;

/// One async mutex per unordered user pair, created on demand.
///
/// The table only holds weak references; a slot lives as long as somebody
/// holds or waits on it.
#[derive(Default)]
pub(crate) struct PairLocks {
  slots: Mutex<HashMap<(UserId, UserId), Weak<Slot>>>,
}

impl PairLocks {
  /// Wait for exclusive access to `pair`. `pair` must already be ordered
  /// `(min, max)`.
  pub(crate) async fn acquire(&self, pair: (UserId, UserId)) -> OwnedMutexGuard<()> {
    let slot = self.slot(pair);
    slot.lock_owned().await
  }

  fn slot(&self, pair: (UserId, UserId)) -> Arc<Slot> {
    let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(live) = slots.get(&pair).and_then(Weak::upgrade) {
      return live;
    }
    if slots.len() >= PRUNE_AT {
      slots.retain(|_, w| w.strong_count() > 0);
    }
    let fresh = Arc::new(AsyncMutex::new(()));
    slots.insert(pair, Arc::downgrade(&fresh));
    fresh
  }

  #[cfg(test)]
  fn live(&self) -> usize {
    let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
    slots.values().filter(|w| w.strong_count() > 0).count()
  }
}
