//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use swipe_core::{Error, UserId};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Engine(#[from] Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Engine(e) => match e {
        Error::DuplicateLike { .. } => StatusCode::CONFLICT,
        Error::SelfSwipe(_) => StatusCode::BAD_REQUEST,
        Error::NotMatched { .. } => StatusCode::NOT_FOUND,
        Error::CacheUnavailable(_) | Error::RepositoryUnavailable(_) => {
          StatusCode::SERVICE_UNAVAILABLE
        }
        Error::Enrichment(_) => StatusCode::BAD_GATEWAY,
      },
    }
  }
}

/// Reject ids that can never name a user.
pub(crate) fn check_id(field: &str, id: UserId) -> Result<UserId, ApiError> {
  if id <= 0 {
    return Err(ApiError::BadRequest(format!("invalid {field} {id}")));
  }
  Ok(id)
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
