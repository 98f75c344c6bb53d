//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; match types as small integers.

use chrono::{DateTime, Utc};
use swipe_core::{
  matches::{MatchRecord, MatchType},
  media::ProfileMedia,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── MatchType ────────────────────────────────────────────────────────────────

pub fn encode_match_type(t: MatchType) -> i64 {
  match t {
    MatchType::Mutual => 1,
  }
}

pub fn decode_match_type(code: i64) -> Result<MatchType> {
  match code {
    1 => Ok(MatchType::Mutual),
    other => Err(Error::UnknownMatchType(other)),
  }
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// Column order used by every `user_match` SELECT in this crate.
pub const MATCH_COLUMNS: &str =
  "id, user_id, matched_user_id, match_type, chat_id, created_at, updated_at";

/// A `user_match` row as read from SQLite, before decoding.
pub struct RawMatch {
  pub id:              i64,
  pub user_id:         i64,
  pub matched_user_id: i64,
  pub match_type:      i64,
  pub chat_id:         String,
  pub created_at:      String,
  pub updated_at:      Option<String>,
}

impl RawMatch {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      user_id:         row.get(1)?,
      matched_user_id: row.get(2)?,
      match_type:      row.get(3)?,
      chat_id:         row.get(4)?,
      created_at:      row.get(5)?,
      updated_at:      row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<MatchRecord> {
    Ok(MatchRecord {
      id:              self.id,
      user_id:         self.user_id,
      matched_user_id: self.matched_user_id,
      match_type:      decode_match_type(self.match_type)?,
      chat_id:         self.chat_id,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      self.updated_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// A `profile_media` row as read from SQLite, before decoding.
pub struct RawMedia {
  pub id:         i64,
  pub user_id:    i64,
  pub url:        String,
  pub order_id:   i64,
  pub created_at: String,
}

impl RawMedia {
  pub fn into_media(self) -> Result<ProfileMedia> {
    Ok(ProfileMedia {
      id:         self.id,
      user_id:    self.user_id,
      url:        self.url,
      order_id:   self.order_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dt_roundtrip_keeps_instant() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }

  #[test]
  fn unknown_match_type_is_an_error() {
    assert!(matches!(decode_match_type(7), Err(Error::UnknownMatchType(7))));
    assert_eq!(decode_match_type(encode_match_type(MatchType::Mutual)).unwrap(), MatchType::Mutual);
  }
}
