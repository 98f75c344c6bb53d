//! JSON REST API for the swipe engine.
//!
//! Exposes an axum [`Router`] backed by a [`SwipeEngine`]. The acting user is
//! taken from the path; authentication belongs to whatever sits in front.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", swipe_api::api_router(engine.clone()))
//! ```

pub mod error;
pub mod likers;
pub mod matches;
pub mod swipes;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use swipe_core::{cache::DecisionCache, enrich::MediaSigner, repository::MatchRepository};
use swipe_engine::SwipeEngine;

pub use error::ApiError;

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<C, R, S>(engine: Arc<SwipeEngine<C, R, S>>) -> Router<()>
where
  C: DecisionCache + 'static,
  R: MatchRepository + 'static,
  S: MediaSigner + 'static,
{
  Router::new()
    .route("/users/{user_id}/swipes", post(swipes::create::<C, R, S>))
    .route("/users/{user_id}/likers", get(likers::list::<C, R, S>))
    .route("/users/{user_id}/matches", get(matches::list::<C, R, S>))
    .route(
      "/users/{user_id}/matches/{other_id}",
      delete(matches::remove::<C, R, S>),
    )
    .with_state(engine)
}

#[cfg(test)]
mod tests;
