//! Decision cache backends.
//!
//! [`MemoryCache`] keeps everything in-process and is used for single-node
//! deployments and tests. [`RedisCache`] talks to a shared Redis so that
//! several engine instances see the same decisions. [`CacheProvider`] picks
//! one at startup without boxing.

mod memory;
mod provider;
mod redis_cache;

pub mod error;

pub use error::{Error, Result};
pub use memory::MemoryCache;
pub use provider::CacheProvider;
pub use redis_cache::RedisCache;
