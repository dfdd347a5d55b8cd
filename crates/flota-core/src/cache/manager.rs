use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::api::Envelope;
use crate::resources::{Filters, ResourceKind};

/// Default freshness window for cached reads.
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

#[derive(Debug, Clone)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.cached_at
    }

    pub fn age_display(&self) -> String {
        let seconds = self.age().num_seconds();
        if seconds < 60 {
            // Also covers negative ages from clock skew
            "just now".to_string()
        } else if seconds < 3600 {
            format!("{}m ago", seconds / 60)
        } else {
            format!("{}h ago", seconds / 3600)
        }
    }

    /// Fresh while `now - cached_at < ttl`.
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

/// Identity of a cached read: the resource plus a canonical rendering of its
/// filters. Invalidation matches on `resource` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    resource: ResourceKind,
    filters: String,
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.resource.path(), self.filters)
    }
}

/// In-memory read cache owned by one data access instance.
///
/// Entries leave only through lazy TTL expiry on lookup, resource
/// invalidation or `clear()`. There is no size bound, so a long session with
/// many distinct filters keeps growing until those entries are touched.
pub struct CacheManager {
    entries: HashMap<CacheKey, CachedData<Envelope>>,
    ttl: Duration,
}

impl CacheManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn compute_key(resource: ResourceKind, filters: &Filters) -> CacheKey {
        CacheKey {
            resource,
            filters: filters.canonical(),
        }
    }

    /// Cached payload for `key` if still fresh. Expired entries are removed.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<Envelope> {
        match self.entries.get(key) {
            Some(cached) if !cached.is_stale(self.ttl) => {
                debug!(key = %key, age = %cached.age_display(), "Cache hit");
                Some(cached.data.clone())
            }
            Some(_) => {
                debug!(key = %key, "Cache entry expired");
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a successful payload, replacing any previous entry. Failed
    /// envelopes are ignored so a transient error is never served from cache.
    pub fn store(&mut self, key: CacheKey, payload: Envelope) {
        if !payload.is_success() {
            debug!(key = %key, "Not caching failed response");
            return;
        }
        self.entries.insert(key, CachedData::new(payload));
    }

    /// Drop every entry belonging to `resource`. Returns how many were removed.
    pub fn invalidate(&mut self, resource: ResourceKind) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.resource != resource);
        let removed = before - self.entries.len();
        debug!(resource = resource.path(), removed, "Cache invalidated");
        removed
    }

    pub fn clear(&mut self) {
        debug!(removed = self.entries.len(), "Cache cleared");
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let mut per_resource = BTreeMap::new();
        for key in self.entries.keys() {
            *per_resource.entry(key.resource.path()).or_insert(0) += 1;
        }
        let oldest = self
            .entries
            .values()
            .min_by_key(|cached| cached.cached_at)
            .map(CachedData::age_display);

        CacheStats {
            entries: self.entries.len(),
            per_resource,
            oldest,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub per_resource: BTreeMap<&'static str, usize>,
    pub oldest: Option<String>,
}

impl CacheStats {
    pub fn oldest_display(&self) -> String {
        self.oldest.clone().unwrap_or_else(|| "never".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager() -> CacheManager {
        CacheManager::new(Duration::seconds(DEFAULT_TTL_SECS))
    }

    fn envelope(id: i64) -> Envelope {
        let record = json!({"id": id}).as_object().cloned().unwrap_or_default();
        Envelope::ok(vec![record], None)
    }

    fn backdate(cache: &mut CacheManager, key: &CacheKey, by: Duration) {
        if let Some(cached) = cache.entries.get_mut(key) {
            cached.cached_at = Utc::now() - by;
        }
    }

    #[test]
    fn test_cached_data_age_display() {
        let mut cached = CachedData::new(1);
        assert_eq!(cached.age_display(), "just now");
        cached.cached_at = Utc::now() - Duration::minutes(4);
        assert_eq!(cached.age_display(), "4m ago");
        cached.cached_at = Utc::now() - Duration::minutes(130);
        assert_eq!(cached.age_display(), "2h ago");
        cached.cached_at = Utc::now() + Duration::minutes(3);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_key_ignores_filter_order() {
        let a = Filters::new().search("ABC").eq("marca_id", 3);
        let b = Filters::new().eq("marca_id", 3).search("ABC");
        assert_eq!(
            CacheManager::compute_key(ResourceKind::Vehicles, &a),
            CacheManager::compute_key(ResourceKind::Vehicles, &b)
        );
    }

    #[test]
    fn test_key_distinguishes_filters_and_resources() {
        let a = Filters::new().search("ABC");
        let b = Filters::new().search("ABD");
        let v = ResourceKind::Vehicles;
        assert_ne!(CacheManager::compute_key(v, &a), CacheManager::compute_key(v, &b));
        assert_ne!(
            CacheManager::compute_key(v, &Filters::new()),
            CacheManager::compute_key(v, &Filters::new().limit(10))
        );
        assert_ne!(
            CacheManager::compute_key(ResourceKind::Brands, &a),
            CacheManager::compute_key(ResourceKind::Models, &a)
        );
    }

    #[test]
    fn test_store_then_lookup_within_ttl() {
        let mut cache = manager();
        let key = CacheManager::compute_key(ResourceKind::Brands, &Filters::new());
        cache.store(key.clone(), envelope(1));

        assert_eq!(cache.lookup(&key), Some(envelope(1)));
        backdate(&mut cache, &key, Duration::seconds(DEFAULT_TTL_SECS - 1));
        assert_eq!(cache.lookup(&key), Some(envelope(1)));
    }

    #[test]
    fn test_lookup_after_ttl_removes_entry() {
        let mut cache = manager();
        let key = CacheManager::compute_key(ResourceKind::Brands, &Filters::new());
        cache.store(key.clone(), envelope(1));
        backdate(&mut cache, &key, Duration::seconds(DEFAULT_TTL_SECS));

        assert_eq!(cache.lookup(&key), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_store_overwrites() {
        let mut cache = manager();
        let key = CacheManager::compute_key(ResourceKind::Brands, &Filters::new());
        cache.store(key.clone(), envelope(1));
        cache.store(key.clone(), envelope(2));
        assert_eq!(cache.lookup(&key), Some(envelope(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_envelope_is_never_stored() {
        let mut cache = manager();
        let key = CacheManager::compute_key(ResourceKind::Tasks, &Filters::new());
        cache.store(key.clone(), Envelope::failed("HTTP 503"));
        assert_eq!(cache.lookup(&key), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_envelope_does_not_replace_good_entry() {
        let mut cache = manager();
        let key = CacheManager::compute_key(ResourceKind::Tasks, &Filters::new());
        cache.store(key.clone(), envelope(1));
        cache.store(key.clone(), Envelope::failed("HTTP 503"));
        assert_eq!(cache.lookup(&key), Some(envelope(1)));
    }

    #[test]
    fn test_invalidate_is_exact_per_resource() {
        let mut cache = manager();
        let status = CacheManager::compute_key(ResourceKind::CurrentStates, &Filters::new());
        let inventory = CacheManager::compute_key(ResourceKind::InventoryStates, &Filters::new());
        let vehicles_a = CacheManager::compute_key(ResourceKind::Vehicles, &Filters::new());
        // Filter text mentioning another resource must not matter
        let vehicles_b =
            CacheManager::compute_key(ResourceKind::Vehicles, &Filters::new().search("estados_actuales"));
        for key in [&status, &inventory, &vehicles_a, &vehicles_b] {
            cache.store(key.clone(), envelope(1));
        }

        assert_eq!(cache.invalidate(ResourceKind::CurrentStates), 1);
        assert_eq!(cache.lookup(&status), None);
        assert!(cache.lookup(&inventory).is_some());
        assert!(cache.lookup(&vehicles_a).is_some());
        assert!(cache.lookup(&vehicles_b).is_some());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut cache = manager();
        cache.store(CacheManager::compute_key(ResourceKind::Brands, &Filters::new()), envelope(1));
        cache.store(CacheManager::compute_key(ResourceKind::Tasks, &Filters::new()), envelope(2));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats_counts_per_resource() {
        let mut cache = manager();
        cache.store(CacheManager::compute_key(ResourceKind::Brands, &Filters::new()), envelope(1));
        cache.store(
            CacheManager::compute_key(ResourceKind::Brands, &Filters::new().search("a")),
            envelope(2),
        );
        cache.store(CacheManager::compute_key(ResourceKind::Tasks, &Filters::new()), envelope(3));

        let stats = cache.stats();
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.per_resource.get("marcas"), Some(&2));
        assert_eq!(stats.per_resource.get("tareas"), Some(&1));
        assert_eq!(stats.oldest_display(), "just now");
        assert_eq!(CacheStats::default().oldest_display(), "never");
    }

    #[test]
    fn test_key_display() {
        let key = CacheManager::compute_key(ResourceKind::Brands, &Filters::new().search("kia"));
        assert_eq!(key.to_string(), r#"marcas_{"search":"kia"}"#);
    }
}
