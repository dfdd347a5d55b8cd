//! In-memory read cache for list queries.
//!
//! This module provides the `CacheManager`, which memoizes successful list
//! envelopes per (resource, filters) key for a fixed TTL (5 minutes by
//! default). Entries are dropped lazily when found expired, eagerly when a
//! write to their resource succeeds, or all at once on `clear()`.

pub mod manager;

pub use manager::{CacheKey, CacheManager, CacheStats, CachedData, DEFAULT_TTL_SECS};
