//! Handler for `POST /users/{user_id}/swipes`.
//!
//! Body: `{"target_id": 2, "action": "like"}`. Responds with
//! `{"is_match": bool}`; `409` on a repeated like.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use swipe_core::{
  Decision, UserId, cache::DecisionCache, enrich::MediaSigner, repository::MatchRepository,
};
use swipe_engine::{SwipeEngine, SwipeOutcome};

use crate::error::{ApiError, check_id};

#[derive(Debug, Deserialize)]
pub struct SwipeBody {
  pub target_id: UserId,
  pub action:    Decision,
}

/// `POST /users/{user_id}/swipes`
pub async fn create<C, R, S>(
  State(engine): State<Arc<SwipeEngine<C, R, S>>>,
  Path(user_id): Path<UserId>,
  Json(body): Json<SwipeBody>,
) -> Result<Json<SwipeOutcome>, ApiError>
where
  C: DecisionCache,
  R: MatchRepository,
  S: MediaSigner,
{
  let user_id   = check_id("user_id", user_id)?;
  let target_id = check_id("target_id", body.target_id)?;
  let outcome = engine.swipe(user_id, target_id, body.action).await?;
  Ok(Json(outcome))
}
