//! Profile media used to decorate likers and matches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decision::UserId;

/// Position of the media item shown in likers and match lists.
pub const DISPLAY_ORDER: i64 = 1;

/// A stored media row. `url` points at private object storage and must be
/// signed before it is handed to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMedia {
  pub id:         i64,
  pub user_id:    UserId,
  pub url:        String,
  pub order_id:   i64,
  pub created_at: DateTime<Utc>,
}

/// A media item with a time-limited, client-usable URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMedia {
  pub media_id: i64,
  pub order_id: i64,
  pub url:      String,
}

/// A user who liked the viewer and has not been answered yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liker {
  pub user_id:       UserId,
  pub display_media: Option<DisplayMedia>,
}
