//! Error type for `swipe-cache`.

use swipe_core::CacheError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("redis error: {0}")]
  Redis(#[from] redis::RedisError),

  #[error("unreadable decision value: {0:?}")]
  Malformed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for CacheError {
  fn from(e: Error) -> Self {
    match e {
      Error::Malformed(raw) => CacheError::Malformed(raw),
      other => CacheError::Unavailable(Box::new(other)),
    }
  }
}
