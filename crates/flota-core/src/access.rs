//! The data access layer consumers talk to.
//!
//! `DataAccess` ties the request executor to the read cache: list reads are
//! served from cache while fresh, writes go straight to the backend and, when
//! they succeed, invalidate every cached read of the written resource before
//! returning.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{ApiError, Envelope, HttpTransport, Operation, Record, RequestExecutor, Transport};
use crate::cache::{CacheManager, CacheStats};
use crate::config::Config;
use crate::resources::{Filters, ResourceKind};

pub struct DataAccess {
    executor: RequestExecutor,
    cache: Mutex<CacheManager>,
    max_page_limit: u32,
}

impl DataAccess {
    /// Build against the hosted backend described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config.supabase_url, &config.api_key, config.request_timeout())?;
        Ok(Self::new(Arc::new(transport), config))
    }

    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            executor: RequestExecutor::new(transport),
            cache: Mutex::new(CacheManager::new(config.cache_ttl())),
            max_page_limit: config.max_page_limit,
        }
    }

    /// The cache is only touched in short synchronous sections, never across
    /// an await, so a poisoned lock still holds consistent data.
    fn cache(&self) -> MutexGuard<'_, CacheManager> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle exposing the per-resource operations.
    pub fn resource(&self, kind: ResourceKind) -> Resource<'_> {
        Resource { access: self, kind }
    }

    // ===== Reads =====

    /// List a resource, served from cache while fresh.
    ///
    /// Concurrent misses on the same key are not coalesced: each performs its
    /// own request and the last one to finish is what stays cached.
    pub async fn list(&self, kind: ResourceKind, filters: &Filters) -> Envelope {
        let key = CacheManager::compute_key(kind, filters);
        if let Some(cached) = self.cache().lookup(&key) {
            return cached;
        }

        let endpoint = kind.list_endpoint(filters, self.max_page_limit);
        let envelope = self.executor.execute(&endpoint, Operation::Get).await;
        if envelope.is_success() {
            self.cache().store(key, envelope.clone());
        }
        envelope
    }

    /// Fetch one record by id. Always goes to the network so detail views see
    /// the current row; the envelope holds zero or one record.
    pub async fn get(&self, kind: ResourceKind, id: i64) -> Envelope {
        self.executor.execute(&kind.get_endpoint(id), Operation::Get).await
    }

    // ===== Writes =====

    pub async fn create(&self, kind: ResourceKind, record: &Record) -> Envelope {
        let operation = Operation::Post(Value::Object(record.clone()));
        self.mutate(kind, &kind.create_endpoint(), operation).await
    }

    /// Apply a partial update to one record.
    pub async fn update(&self, kind: ResourceKind, id: i64, changes: &Record) -> Envelope {
        let operation = Operation::Patch(Value::Object(changes.clone()));
        self.mutate(kind, &kind.record_endpoint(id), operation).await
    }

    pub async fn delete(&self, kind: ResourceKind, id: i64) -> Envelope {
        self.mutate(kind, &kind.record_endpoint(id), Operation::Delete).await
    }

    async fn mutate(&self, kind: ResourceKind, endpoint: &str, operation: Operation) -> Envelope {
        let method = operation.method();
        let envelope = self.executor.execute(endpoint, operation).await;
        if envelope.is_success() {
            let removed = self.cache().invalidate(kind);
            info!(resource = kind.path(), method = %method, invalidated = removed, "Write succeeded");
        }
        envelope
    }

    // ===== Typed helpers =====

    /// `list` decoded into typed entities.
    pub async fn list_as<T: DeserializeOwned>(&self, kind: ResourceKind, filters: &Filters) -> Result<Vec<T>, ApiError> {
        self.list(kind, filters).await.decode()
    }

    /// `get` decoded into a typed entity; `Ok(None)` when no row matched.
    pub async fn get_as<T: DeserializeOwned>(&self, kind: ResourceKind, id: i64) -> Result<Option<T>, ApiError> {
        self.get(kind, id).await.decode_first()
    }

    // ===== Cache control =====

    pub fn invalidate(&self, kind: ResourceKind) {
        self.cache().invalidate(kind);
    }

    pub fn clear_cache(&self) {
        debug!("Clearing read cache");
        self.cache().clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache().stats()
    }
}

/// Operations on one resource collection.
#[derive(Clone, Copy)]
pub struct Resource<'a> {
    access: &'a DataAccess,
    kind: ResourceKind,
}

impl Resource<'_> {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub async fn list(&self, filters: &Filters) -> Envelope {
        self.access.list(self.kind, filters).await
    }

    pub async fn get(&self, id: i64) -> Envelope {
        self.access.get(self.kind, id).await
    }

    pub async fn create(&self, record: &Record) -> Envelope {
        self.access.create(self.kind, record).await
    }

    pub async fn update(&self, id: i64, changes: &Record) -> Envelope {
        self.access.update(self.kind, id, changes).await
    }

    pub async fn delete(&self, id: i64) -> Envelope {
        self.access.delete(self.kind, id).await
    }
}
