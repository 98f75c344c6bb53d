//! The swipe & match state machine.
//!
//! [`SwipeEngine`] sequences calls to a [`DecisionCache`] and a
//! [`MatchRepository`] to turn directed like/dislike actions into confirmed
//! matches, and decorates read results through a [`MediaSigner`]. It holds
//! no durable state of its own.
//!
//! [`DecisionCache`]: swipe_core::cache::DecisionCache
//! [`MatchRepository`]: swipe_core::repository::MatchRepository
//! [`MediaSigner`]: swipe_core::enrich::MediaSigner

mod config;
mod engine;
mod lock;

pub use config::EngineConfig;
pub use engine::{SwipeEngine, SwipeOutcome};
