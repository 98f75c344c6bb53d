//! Core types and port definitions for the swipe & match engine.
//!
//! This crate is deliberately free of cache, database and HTTP dependencies.
//! Adapters (`swipe-cache`, `swipe-store-sqlite`) implement the ports defined
//! here; `swipe-engine` orchestrates them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cache;
pub mod decision;
pub mod enrich;
pub mod error;
pub mod matches;
pub mod media;
pub mod repository;

pub use decision::{Decision, PairKey, UserId};
pub use error::{CacheError, EnrichmentError, Error, RepositoryError, Result};
