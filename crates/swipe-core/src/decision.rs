//! Decisions: the latest like/dislike verdict one user holds about another.
//!
//! A decision is keyed by the *ordered* pair of users: `(A, B)` and `(B, A)`
//! are independent entries. Only the current value is kept; a new swipe
//! overwrites the previous one.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of a user, as issued by the (external) account service.
pub type UserId = i64;

/// A directional verdict. Also used as the action of a swipe.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
  Like,
  Dislike,
}

impl Decision {
  pub fn is_like(self) -> bool { matches!(self, Self::Like) }
}

/// An ordered `(actor, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
  pub actor:  UserId,
  pub target: UserId,
}

impl PairKey {
  pub fn new(actor: UserId, target: UserId) -> Self { Self { actor, target } }

  /// The same pair seen from the other side.
  pub fn reversed(self) -> Self {
    Self {
      actor:  self.target,
      target: self.actor,
    }
  }

  /// The pair with direction erased: `(min, max)`.
  pub fn unordered(self) -> (UserId, UserId) {
    if self.actor <= self.target {
      (self.actor, self.target)
    } else {
      (self.target, self.actor)
    }
  }
}

impl fmt::Display for PairKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.actor, self.target)
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn reversed_swaps_direction() {
    let key = PairKey::new(1, 2);
    assert_eq!(key.reversed(), PairKey::new(2, 1));
    assert_eq!(key.reversed().reversed(), key);
  }

  #[test]
  fn unordered_is_direction_independent() {
    assert_eq!(PairKey::new(9, 3).unordered(), (3, 9));
    assert_eq!(PairKey::new(3, 9).unordered(), (3, 9));
  }

  #[test]
  fn pair_display_keeps_order() {
    assert_eq!(PairKey::new(12, 7).to_string(), "12:7");
    assert_ne!(PairKey::new(1, 23).to_string(), PairKey::new(12, 3).to_string());
  }

  #[test]
  fn decision_text_form() {
    assert_eq!(Decision::Like.to_string(), "like");
    assert_eq!(Decision::from_str("dislike").unwrap(), Decision::Dislike);
    assert!(Decision::from_str("maybe").is_err());
    assert_eq!(serde_json::to_string(&Decision::Like).unwrap(), "\"like\"");
  }
}
