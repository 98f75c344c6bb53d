//! Match records, the durable, authoritative side of a mutual like.
//!
//! A confirmed match between A and B is stored as exactly two rows, one per
//! direction, sharing a single chat id. Once the pair exists the cache no
//! longer needs to agree with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{decision::UserId, media::DisplayMedia};

/// How a match came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
  /// Both users liked each other.
  #[default]
  Mutual,
}

/// One persisted direction of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
  pub id:              i64,
  pub user_id:         UserId,
  pub matched_user_id: UserId,
  pub match_type:      MatchType,
  pub chat_id:         String,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      Option<DateTime<Utc>>,
}

/// Input for one direction of [`MatchRepository::insert_match_pair`](crate::repository::MatchRepository::insert_match_pair).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
  pub user_id:         UserId,
  pub matched_user_id: UserId,
  pub match_type:      MatchType,
  pub chat_id:         String,
}

impl NewMatch {
  /// Both directions of a mutual match between `a` and `b`.
  pub fn pair(a: UserId, b: UserId) -> (Self, Self) {
    let chat_id = chat_id_for(a, b);
    (
      Self {
        user_id:         a,
        matched_user_id: b,
        match_type:      MatchType::Mutual,
        chat_id:         chat_id.clone(),
      },
      Self {
        user_id:         b,
        matched_user_id: a,
        match_type:      MatchType::Mutual,
        chat_id,
      },
    )
  }
}

/// Chat id shared by both rows of a match. Independent of which side closed
/// the loop, so concurrent inserts for the same pair always agree.
pub fn chat_id_for(a: UserId, b: UserId) -> String {
  let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
  format!("{lo}_{hi}")
}

/// A match as shown to `user_id`, decorated with the other user's media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
  #[serde(flatten)]
  pub record:        MatchRecord,
  pub display_media: Option<DisplayMedia>,
}
