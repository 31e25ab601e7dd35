//! On-disk cache for forecast responses
//!
//! Entries carry an expiry timestamp. Expired entries are still readable so a
//! stale forecast can stand in when the API is unavailable.

mod manager;

pub use manager::{CacheManager, CachedData};
