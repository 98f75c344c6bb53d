//! Handler for `GET /users/{user_id}/likers`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use swipe_core::{
  UserId, cache::DecisionCache, enrich::MediaSigner, media::Liker, repository::MatchRepository,
};
use swipe_engine::SwipeEngine;

use crate::error::{ApiError, check_id};

/// `GET /users/{user_id}/likers`, oldest pending like first.
pub async fn list<C, R, S>(
  State(engine): State<Arc<SwipeEngine<C, R, S>>>,
  Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Liker>>, ApiError>
where
  C: DecisionCache,
  R: MatchRepository,
  S: MediaSigner,
{
  let user_id = check_id("user_id", user_id)?;
  Ok(Json(engine.likers(user_id).await?))
}
