//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode},
};
use serde_json::{Value, json};
use swipe_cache::MemoryCache;
use swipe_core::{
  CacheError, EnrichmentError, Error, PairKey, UserId, cache::DecisionCache, enrich::MediaSigner,
  repository::MatchRepository,
};
use swipe_engine::{EngineConfig, SwipeEngine};
use swipe_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{ApiError, api_router};

struct EchoSigner;

impl MediaSigner for EchoSigner {
  async fn sign<'a>(&'a self, raw_url: &'a str) -> Result<String, EnrichmentError> {
    Ok(format!("{raw_url}?sig=test"))
  }
}

struct App {
  router: Router,
  store:  SqliteStore,
  cache:  MemoryCache,
}

async fn app() -> App {
  let cache = MemoryCache::new();
  let store = SqliteStore::open_in_memory().await.unwrap();
  let engine = SwipeEngine::new(
    cache.clone(),
    store.clone(),
    EchoSigner,
    EngineConfig::default(),
  );
  App {
    router: api_router(Arc::new(engine)),
    store,
    cache,
  }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut req = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      req = req.header("content-type", "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = router
    .clone()
    .oneshot(req.body(body).unwrap())
    .await
    .unwrap();

  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn swipe(router: &Router, actor: UserId, target: UserId, action: &str) -> (StatusCode, Value) {
  send(
    router,
    "POST",
    &format!("/users/{actor}/swipes"),
    Some(json!({ "target_id": target, "action": action })),
  )
  .await
}

// ─── Swipes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn one_sided_like_then_match() {
  let app = app().await;

  let (status, body) = swipe(&app.router, 1, 2, "like").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "is_match": false }));

  let (status, body) = swipe(&app.router, 2, 1, "like").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "is_match": true }));
}

#[tokio::test]
async fn duplicate_like_is_conflict() {
  let app = app().await;
  swipe(&app.router, 1, 2, "like").await;

  let (status, body) = swipe(&app.router, 1, 2, "like").await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["error"], "user 1 has already liked user 2");
}

#[tokio::test]
async fn self_swipe_is_bad_request() {
  let app = app().await;
  let (status, _) = swipe(&app.router, 3, 3, "like").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_target_is_bad_request() {
  let app = app().await;
  let (status, body) = swipe(&app.router, 3, 0, "dislike").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("target_id"));
}

#[tokio::test]
async fn invalid_path_user_is_bad_request() {
  let app = app().await;
  let (status, body) = swipe(&app.router, 0, 2, "like").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("user_id"));
  assert!(app.cache.list_pending_likers(2).await.unwrap().is_empty());

  let (status, _) = send(&app.router, "GET", "/users/-1/likers", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let (status, _) = send(&app.router, "GET", "/users/0/matches", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, body) = send(&app.router, "DELETE", "/users/1/matches/-4", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("other_id"));
}

#[tokio::test]
async fn unknown_action_is_rejected() {
  let app = app().await;
  let (status, _) = swipe(&app.router, 1, 2, "superlike").await;
  assert!(status.is_client_error());
  assert!(app.cache.list_pending_likers(2).await.unwrap().is_empty());
}

// ─── Likers & matches ────────────────────────────────────────────────────────

#[tokio::test]
async fn likers_lists_pending_likes_with_media() {
  let app = app().await;
  app.store.add_media(1, "s3://media/1.webp", 1).await.unwrap();
  swipe(&app.router, 1, 5, "like").await;
  swipe(&app.router, 2, 5, "like").await;

  let (status, body) = send(&app.router, "GET", "/users/5/likers", None).await;
  assert_eq!(status, StatusCode::OK);
  let likers = body.as_array().unwrap();
  assert_eq!(likers.len(), 2);
  assert_eq!(likers[0]["user_id"], 1);
  assert_eq!(likers[0]["display_media"]["url"], "s3://media/1.webp?sig=test");
  assert_eq!(likers[1]["user_id"], 2);
  assert!(likers[1]["display_media"].is_null());
}

#[tokio::test]
async fn matches_lists_both_sides() {
  let app = app().await;
  swipe(&app.router, 1, 2, "like").await;
  swipe(&app.router, 2, 1, "like").await;

  let (status, body) = send(&app.router, "GET", "/users/2/matches", None).await;
  assert_eq!(status, StatusCode::OK);
  let matches = body.as_array().unwrap();
  assert_eq!(matches.len(), 1);
  assert_eq!(matches[0]["user_id"], 2);
  assert_eq!(matches[0]["matched_user_id"], 1);
  assert_eq!(matches[0]["chat_id"], "1_2");
  assert_eq!(matches[0]["match_type"], "mutual");
}

#[tokio::test]
async fn unmatch_then_not_found() {
  let app = app().await;
  swipe(&app.router, 1, 2, "like").await;
  swipe(&app.router, 2, 1, "like").await;

  let (status, _) = send(&app.router, "DELETE", "/users/1/matches/2", None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert!(app.store.find_match_between(2, 1).await.unwrap().is_none());
  assert_eq!(app.cache.get_decision(PairKey::new(1, 2)).await.unwrap(), None);

  let (status, body) = send(&app.router, "DELETE", "/users/1/matches/2", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "users 1 and 2 are not matched");
}

// ─── Status mapping ──────────────────────────────────────────────────────────

#[test]
fn infrastructure_errors_map_to_gateway_statuses() {
  let cache = ApiError::from(Error::from(CacheError::Timeout("get_decision")));
  assert_eq!(cache.status(), StatusCode::SERVICE_UNAVAILABLE);

  let enrich = ApiError::from(Error::from(EnrichmentError::Timeout));
  assert_eq!(enrich.status(), StatusCode::BAD_GATEWAY);
}
