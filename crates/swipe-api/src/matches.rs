//! Handlers for `/users/{user_id}/matches` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/users/{user_id}/matches` | Oldest match first |
//! | `DELETE` | `/users/{user_id}/matches/{other_id}` | `204`, or `404` if not matched |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use swipe_core::{
  UserId, cache::DecisionCache, enrich::MediaSigner, matches::MatchView,
  repository::MatchRepository,
};
use swipe_engine::SwipeEngine;

use crate::error::{ApiError, check_id};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users/{user_id}/matches`
pub async fn list<C, R, S>(
  State(engine): State<Arc<SwipeEngine<C, R, S>>>,
  Path(user_id): Path<UserId>,
) -> Result<Json<Vec<MatchView>>, ApiError>
where
  C: DecisionCache,
  R: MatchRepository,
  S: MediaSigner,
{
  let user_id = check_id("user_id", user_id)?;
  Ok(Json(engine.matches(user_id).await?))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{user_id}/matches/{other_id}`
pub async fn remove<C, R, S>(
  State(engine): State<Arc<SwipeEngine<C, R, S>>>,
  Path((user_id, other_id)): Path<(UserId, UserId)>,
) -> Result<StatusCode, ApiError>
where
  C: DecisionCache,
  R: MatchRepository,
  S: MediaSigner,
{
  let user_id  = check_id("user_id", user_id)?;
  let other_id = check_id("other_id", other_id)?;
  engine.unmatch(user_id, other_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
