//! Time-limited media links.
//!
//! Stored media URLs point into private object storage. A [`UrlSigner`]
//! turns one into `{public_base_url}/{key}?expires={unix}&signature={hex}`
//! where the signature is SHA-256 over `secret:key:expires`. The media edge
//! recomputes it with the same secret before serving the object.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use swipe_core::{EnrichmentError, enrich::MediaSigner};

use crate::MediaConfig;

pub struct UrlSigner {
  storage_prefix:  String,
  public_base_url: String,
  secret:          String,
  ttl_secs:        i64,
}

impl UrlSigner {
  pub fn new(config: &MediaConfig) -> Self {
    Self {
      storage_prefix:  config.storage_prefix.clone(),
      public_base_url: config.public_base_url.trim_end_matches('/').to_owned(),
      secret:          config.signing_secret.clone(),
      ttl_secs:        i64::try_from(config.link_ttl_secs).unwrap_or(i64::MAX),
    }
  }

  /// The object key for `raw_url`: the storage prefix removed and escaped
  /// colons restored. URLs outside the prefix are taken as keys verbatim.
  pub fn object_key(&self, raw_url: &str) -> Option<String> {
    let key = raw_url
      .strip_prefix(self.storage_prefix.as_str())
      .unwrap_or(raw_url)
      .trim_start_matches('/')
      .replace("%3A", ":");
    (!key.is_empty()).then_some(key)
  }

  /// Sign `raw_url` for a link that expires `link_ttl_secs` after `now`.
  pub fn sign_at(&self, raw_url: &str, now: DateTime<Utc>) -> Result<String, EnrichmentError> {
    let key = self
      .object_key(raw_url)
      .ok_or_else(|| EnrichmentError::InvalidUrl(raw_url.to_owned()))?;
    let expires = now.timestamp().saturating_add(self.ttl_secs);
    let signature = self.signature(&key, expires);
    Ok(format!(
      "{}/{key}?expires={expires}&signature={signature}",
      self.public_base_url
    ))
  }

  fn signature(&self, key: &str, expires: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(self.secret.as_bytes());
    hasher.update(b":");
    hasher.update(key.as_bytes());
    hasher.update(b":");
    hasher.update(expires.to_string().as_bytes());
    hex::encode(hasher.finalize())
  }
}

impl MediaSigner for UrlSigner {
  async fn sign<'a>(&'a self, raw_url: &'a str) -> Result<String, EnrichmentError> {
    self.sign_at(raw_url, Utc::now())
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  const BUCKET: &str = "https://user-media.s3.ap-south-1.amazonaws.com/";

  fn signer() -> UrlSigner {
    UrlSigner::new(&MediaConfig {
      storage_prefix:  BUCKET.to_string(),
      public_base_url: "https://media.example.com/".to_string(),
      signing_secret:  "s3cret".to_string(),
      link_ttl_secs:   900,
    })
  }

  #[test]
  fn key_drops_prefix_and_unescapes_colons() {
    let raw = format!("{BUCKET}1/profile/2023-04-24T03%3A38%3A23-a.webp");
    assert_eq!(
      signer().object_key(&raw).as_deref(),
      Some("1/profile/2023-04-24T03:38:23-a.webp")
    );
  }

  #[test]
  fn foreign_url_is_used_as_key() {
    assert_eq!(signer().object_key("7/a.webp").as_deref(), Some("7/a.webp"));
  }

  #[test]
  fn signed_link_is_deterministic_and_expires() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let raw = format!("{BUCKET}1/a.webp");

    let s = signer();
    let link = s.sign_at(&raw, now).unwrap();
    assert_eq!(link, s.sign_at(&raw, now).unwrap());

    let expires = now.timestamp() + 900;
    let prefix = format!("https://media.example.com/1/a.webp?expires={expires}&signature=");
    let signature = link.strip_prefix(&prefix).unwrap();
    assert_eq!(signature.len(), 64);
    assert_eq!(signature, s.signature("1/a.webp", expires));
  }

  #[test]
  fn signature_depends_on_secret() {
    let other = UrlSigner {
      secret: "different".to_string(),
      ..signer()
    };
    assert_ne!(signer().signature("k", 1), other.signature("k", 1));
  }

  #[test]
  fn bare_prefix_is_invalid() {
    let err = signer().sign_at(BUCKET, Utc::now()).unwrap_err();
    assert!(matches!(err, EnrichmentError::InvalidUrl(_)));
  }
}
