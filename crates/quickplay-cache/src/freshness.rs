use crate::backend::CacheBackend;
use crate::entry::CacheEntry;
use quickplay_core::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Keyed freshness cache with per-key single-flight refresh.
///
/// Concurrent misses on one key elect a single leader to run the
/// computation; everyone else waits and reads the stored result. Misses on
/// different keys never wait on each other. The flight map holds one slot
/// per key ever seen, which is fine here: the key space is one key per
/// query class and page.
///
/// The cache is an accelerator, not a dependency: a broken backend is
/// logged and bypassed, and a failed computation is returned to the caller
/// without being stored.
pub struct FreshnessCache {
    backend: Arc<dyn CacheBackend>,
    flights: Mutex<HashMap<String, Arc<tokio::sync::Mutex<u64>>>>,
}

impl FreshnessCache {
    /// Creates a cache over the given backend
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the fresh payload under `key`, computing and storing it on a
    /// miss.
    ///
    /// `ttl == None` selects the pass-through class: the computation runs
    /// every time and the cache is not consulted or written.
    ///
    /// # Errors
    ///
    /// Propagates the computation's error. Backend failures are absorbed;
    /// they degrade this call to a direct computation.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let Some(ttl) = ttl else {
            return compute().await;
        };

        if let Some(payload) = self.lookup(key).await {
            return Ok(payload);
        }

        // The slot's mutex admits one computing leader per key; the guarded
        // counter is the refresh generation. Dropping the guard mid-compute
        // (caller abort) stores nothing and lets the next caller lead.
        let slot = self.flight_slot(key);
        let mut generation = slot.lock().await;

        // The previous leader may have refreshed while we waited.
        if let Some(payload) = self.lookup(key).await {
            return Ok(payload);
        }

        let payload = compute().await?;

        *generation += 1;
        let entry = CacheEntry::new(key, payload.clone(), ttl, *generation);
        if let Err(e) = self.backend.set(entry).await {
            warn!(key, error = %e, "cache store failed, serving result uncached");
        }
        Ok(payload)
    }

    /// Flushes the backend when its entries would otherwise outlive the
    /// process.
    pub async fn shutdown(&self) {
        if self.backend.requires_shutdown_flush() {
            debug!(backend = self.backend.name(), "flushing cache at shutdown");
            if let Err(e) = self.backend.flush().await {
                warn!(error = %e, "shutdown flush failed");
            }
        }
    }

    async fn lookup(&self, key: &str) -> Option<String> {
        match self.backend.get(key).await {
            Ok(Some(entry)) if entry.is_fresh() => {
                debug!(key, generation = entry.generation, "cache hit");
                Some(entry.payload)
            }
            Ok(Some(_)) => {
                debug!(key, "cache entry expired");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "cache lookup failed, bypassing");
                None
            }
        }
    }

    fn flight_slot(&self, key: &str) -> Arc<tokio::sync::Mutex<u64>> {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        flights.entry(key.to_string()).or_default().clone()
    }
}
