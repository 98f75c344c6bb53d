//! Error type for `swipe-store-sqlite`.

use swipe_core::{RepositoryError, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown match type code: {0}")]
  UnknownMatchType(i64),

  #[error("users {user_id} and {matched_user_id} are already matched")]
  AlreadyMatched {
    user_id:         UserId,
    matched_user_id: UserId,
  },

  #[error("constraint violation: {0}")]
  Constraint(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for RepositoryError {
  fn from(e: Error) -> Self {
    match e {
      Error::AlreadyMatched { user_id, matched_user_id } => {
        RepositoryError::AlreadyMatched { user_id, matched_user_id }
      }
      Error::Constraint(msg) => RepositoryError::Rejected(msg),
      other => RepositoryError::Unavailable(Box::new(other)),
    }
  }
}
