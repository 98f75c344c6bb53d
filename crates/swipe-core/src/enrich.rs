//! The `MediaSigner` port: turns stored media URLs into links a client can
//! fetch for a limited time.

use std::future::Future;

use crate::error::EnrichmentError;

pub trait MediaSigner: Send + Sync {
  /// Sign `raw_url`. Pure apart from any remote signing call; signing the
  /// same URL twice is harmless.
  fn sign<'a>(
    &'a self,
    raw_url: &'a str,
  ) -> impl Future<Output = Result<String, EnrichmentError>> + Send + 'a;
}
