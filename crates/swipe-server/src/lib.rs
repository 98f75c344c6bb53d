//! HTTP server wiring for the swipe engine.
//!
//! Holds the deserialised configuration, the media URL signer and the
//! top-level router. `main.rs` is the composition root.

pub mod signing;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use serde::Deserialize;
use swipe_core::{cache::DecisionCache, enrich::MediaSigner, repository::MatchRepository};
use swipe_engine::{EngineConfig, SwipeEngine};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// In-memory decision cache when unset.
  #[serde(default)]
  pub redis_url:          Option<String>,
  #[serde(default = "default_cache_prefix")]
  pub cache_prefix:       String,
  #[serde(default = "default_decision_ttl_secs")]
  pub decision_ttl_secs:  u64,
  #[serde(default = "default_call_timeout_ms")]
  pub call_timeout_ms:    u64,
  #[serde(default = "default_true")]
  pub recheck_reciprocal: bool,
  pub media:              MediaConfig,
}

/// The `[media]` table.
#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
  /// Prefix of stored media URLs, removed to obtain the object key.
  pub storage_prefix:  String,
  pub public_base_url: String,
  pub signing_secret:  String,
  #[serde(default = "default_link_ttl_secs")]
  pub link_ttl_secs:   u64,
}

fn default_cache_prefix() -> String { "swipe".to_string() }
fn default_decision_ttl_secs() -> u64 { 48 * 60 * 60 }
fn default_call_timeout_ms() -> u64 { 5_000 }
fn default_link_ttl_secs() -> u64 { 15 * 60 }
fn default_true() -> bool { true }

impl ServerConfig {
  pub fn engine_config(&self) -> EngineConfig {
    EngineConfig {
      decision_ttl:       Duration::from_secs(self.decision_ttl_secs),
      call_timeout:       Duration::from_millis(self.call_timeout_ms),
      recheck_reciprocal: self.recheck_reciprocal,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: `/health` plus the JSON API under `/api`, with
/// request tracing.
pub fn router<C, R, S>(engine: Arc<SwipeEngine<C, R, S>>) -> Router
where
  C: DecisionCache + 'static,
  R: MatchRepository + 'static,
  S: MediaSigner + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", swipe_api::api_router(engine))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "OK" }

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use swipe_cache::{CacheProvider, MemoryCache};
  use swipe_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;
  use crate::signing::UrlSigner;

  const CONFIG: &str = r#"
    host = "127.0.0.1"
    port = 8080
    store_path = "/tmp/matches.db"

    [media]
    storage_prefix = "https://bucket.s3.amazonaws.com/"
    public_base_url = "https://media.example.com"
    signing_secret = "s3cret"
  "#;

  fn parse(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn optional_settings_take_defaults() {
    let cfg = parse(CONFIG);
    assert!(cfg.redis_url.is_none());
    assert_eq!(cfg.cache_prefix, "swipe");
    assert_eq!(cfg.media.link_ttl_secs, 900);

    let engine = cfg.engine_config();
    assert_eq!(engine.decision_ttl, Duration::from_secs(172_800));
    assert_eq!(engine.call_timeout, Duration::from_secs(5));
    assert!(engine.recheck_reciprocal);
  }

  #[test]
  fn explicit_settings_override_defaults() {
    let cfg = parse(&format!(
      "redis_url = \"redis://cache:6379/\"\ncall_timeout_ms = 250\nrecheck_reciprocal = false\n{CONFIG}"
    ));
    assert_eq!(cfg.redis_url.as_deref(), Some("redis://cache:6379/"));
    let engine = cfg.engine_config();
    assert_eq!(engine.call_timeout, Duration::from_millis(250));
    assert!(!engine.recheck_reciprocal);
  }

  async fn app() -> Router {
    let cfg = parse(CONFIG);
    let engine = SwipeEngine::new(
      CacheProvider::from(MemoryCache::new()),
      SqliteStore::open_in_memory().await.unwrap(),
      UrlSigner::new(&cfg.media),
      cfg.engine_config(),
    );
    router(Arc::new(engine))
  }

  #[tokio::test]
  async fn health_is_ok() {
    let resp = app()
      .await
      .oneshot(Request::get("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
  }

  #[tokio::test]
  async fn api_is_nested() {
    let req = Request::post("/api/users/1/swipes")
      .header("content-type", "application/json")
      .body(Body::from(r#"{"target_id": 2, "action": "like"}"#))
      .unwrap();
    let resp = app().await.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["is_match"], false);
  }
}
