//! The assembled selection pipeline.

use crate::config::QuickplayConfig;
use crate::lists::ListSource;
use quickplay_cache::{CacheBackend, CachePolicy, FreshnessCache, MemoryBackend};
use quickplay_catalog::CatalogFetcher;
use quickplay_core::{
    HostPort, ListFilter, ListSet, Pagination, QuickplayError, RawServerDescriptor, Result,
    ServerPage, ServerRecord,
};
use quickplay_probe::{LatencyProbe, UdpProbe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Cache key for the single-pick result.
const PICK_KEY: &str = "pick";
/// Cache key for the unprocessed catalog snapshot.
const RAW_KEY: &str = "raw";
/// Cache key for the blacklist/greylist view.
const LISTS_KEY: &str = "lists";

/// The server selection service.
///
/// Wires the catalog fetcher, list source, latency probe, and freshness
/// cache into one pipeline. Cloning is cheap and clones share the cache.
#[derive(Clone)]
pub struct Quickplay {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Quickplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Quickplay").finish_non_exhaustive()
    }
}

struct Inner {
    catalog: Arc<dyn CatalogFetcher>,
    lists: Arc<dyn ListSource>,
    probe: Arc<dyn LatencyProbe>,
    list_filter: ListFilter,
    cache: FreshnessCache,
    policy: CachePolicy,
    config: QuickplayConfig,
}

impl Quickplay {
    /// Creates a service with default filter, probe, cache, and tuning.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogFetcher>, lists: Arc<dyn ListSource>) -> Self {
        Self {
            inner: Arc::new(Inner {
                catalog,
                lists,
                probe: Arc::new(UdpProbe::new()),
                list_filter: ListFilter::default(),
                cache: FreshnessCache::new(Arc::new(MemoryBackend::new())),
                policy: CachePolicy::default(),
                config: QuickplayConfig::default(),
            }),
        }
    }

    /// Creates a builder for customizing the service
    #[must_use]
    pub fn builder() -> QuickplayBuilder {
        QuickplayBuilder::default()
    }

    /// Picks one joinable server.
    ///
    /// Fetches the candidate pool, classifies every server against the
    /// current lists, and walks the pool busiest-first: blacklisted servers
    /// are skipped, a greylisted server is returned immediately with its
    /// reason attached, and a clear server must have a free slot. The
    /// winner is probed once and carries the measured latency when the
    /// probe answers.
    ///
    /// `Ok(None)` means no server qualified, which is an answer, not an
    /// error. Results stay fresh for the selection window; concurrent
    /// callers on a cold cache share one upstream fetch.
    ///
    /// # Errors
    ///
    /// Fails when the catalog is unreachable, a descriptor carries a
    /// malformed address, or the lists cannot be loaded.
    #[instrument(skip(self))]
    pub async fn pick(&self) -> Result<Option<ServerRecord>> {
        let ttl = Some(self.inner.policy.selection_ttl());
        let payload = self
            .inner
            .cache
            .get_or_compute(PICK_KEY, ttl, || self.compute_pick())
            .await?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// Returns one page of the classified pool, in catalog order.
    ///
    /// Every fetched server appears with its classification attached;
    /// blacklisted servers are flagged, not hidden. Nothing is probed.
    /// Each page caches under its own key for the listing window.
    ///
    /// # Errors
    ///
    /// Fails when the catalog is unreachable, a descriptor carries a
    /// malformed address, or the lists cannot be loaded.
    #[instrument(skip(self))]
    pub async fn list(&self, pagination: Pagination) -> Result<ServerPage> {
        let key = format!("list:{}:{}", pagination.page(), pagination.per_page());
        let ttl = Some(self.inner.policy.listing_ttl());
        let payload = self
            .inner
            .cache
            .get_or_compute(&key, ttl, || self.compute_list(pagination))
            .await?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// Returns the catalog snapshot exactly as fetched.
    ///
    /// No classification, no probing, no reordering. Cached for the
    /// listing window.
    ///
    /// # Errors
    ///
    /// Fails when the catalog is unreachable.
    #[instrument(skip(self))]
    pub async fn raw(&self) -> Result<Vec<RawServerDescriptor>> {
        let ttl = Some(self.inner.policy.listing_ttl());
        let payload = self
            .inner
            .cache
            .get_or_compute(RAW_KEY, ttl, || self.compute_raw())
            .await?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// Returns the current blacklist/greylist content.
    ///
    /// Cached for the content window, so list edits surface within it.
    ///
    /// # Errors
    ///
    /// Fails when either list is missing or malformed.
    #[instrument(skip(self))]
    pub async fn lists(&self) -> Result<ListSet> {
        let ttl = Some(self.inner.policy.content_ttl());
        let payload = self
            .inner
            .cache
            .get_or_compute(LISTS_KEY, ttl, || self.compute_lists())
            .await?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// Renders the connect URL a game client joins through.
    ///
    /// Pure formatting, never cached.
    #[must_use]
    pub fn connect_url(address: &HostPort) -> String {
        format!("steam://connect/{address}")
    }

    /// Releases cache state that must not outlive the process.
    ///
    /// Backends holding entries on disk are flushed; the rest is a no-op.
    pub async fn shutdown(&self) {
        self.inner.cache.shutdown().await;
    }

    async fn compute_pick(&self) -> Result<String> {
        let mut winner = quickplay_core::pick(self.annotated_records().await?);
        if let Some(record) = winner.as_mut() {
            self.attach_latency(record).await;
        }
        Ok(serde_json::to_string(&winner)?)
    }

    async fn compute_list(&self, pagination: Pagination) -> Result<String> {
        let records = self.annotated_records().await?;
        let page = ServerPage::paginate(records, pagination);
        Ok(serde_json::to_string(&page)?)
    }

    async fn compute_raw(&self) -> Result<String> {
        let raw = self
            .inner
            .catalog
            .fetch(&self.inner.config.filter, self.inner.config.max_servers)
            .await?;
        Ok(serde_json::to_string(&raw)?)
    }

    async fn compute_lists(&self) -> Result<String> {
        let lists = self.inner.lists.load()?;
        Ok(serde_json::to_string(&lists)?)
    }

    /// Fetches the pool and classifies it, preserving catalog order.
    ///
    /// Lists are loaded fresh at the start of the cycle, so an edit lands
    /// on the next uncached call. One malformed descriptor address fails
    /// the whole cycle rather than silently thinning the pool.
    async fn annotated_records(&self) -> Result<Vec<ServerRecord>> {
        let lists = self.inner.lists.load()?;
        let raw = self
            .inner
            .catalog
            .fetch(&self.inner.config.filter, self.inner.config.max_servers)
            .await?;
        let mut records = raw
            .iter()
            .map(ServerRecord::from_raw)
            .collect::<Result<Vec<_>>>()?;
        self.inner.list_filter.classify_all(&mut records, &lists);
        Ok(records)
    }

    /// Probes the record's address and attaches the measured latency.
    ///
    /// A failed or impossible probe leaves `latency_ms` unset; the pick
    /// stands either way.
    async fn attach_latency(&self, record: &mut ServerRecord) {
        let Some(addr) = record.address.socket_addr() else {
            debug!(address = %record.address, "host is not an IP literal, skipping probe");
            return;
        };
        let timeout = Duration::from_secs(self.inner.config.probe_timeout_secs);
        match self.inner.probe.probe(addr, timeout).await {
            Ok(rtt) => {
                record.latency_ms = Some(u64::try_from(rtt.as_millis()).unwrap_or(u64::MAX));
            }
            Err(e) => debug!(address = %record.address, error = %e, "latency probe failed"),
        }
    }
}

/// Builder for [`Quickplay`].
///
/// The catalog fetcher and list source are required; everything else has
/// a working default.
pub struct QuickplayBuilder {
    catalog: Option<Arc<dyn CatalogFetcher>>,
    lists: Option<Arc<dyn ListSource>>,
    probe: Arc<dyn LatencyProbe>,
    backend: Arc<dyn CacheBackend>,
    list_filter: ListFilter,
    policy: CachePolicy,
    config: QuickplayConfig,
}

impl Default for QuickplayBuilder {
    fn default() -> Self {
        Self {
            catalog: None,
            lists: None,
            probe: Arc::new(UdpProbe::new()),
            backend: Arc::new(MemoryBackend::new()),
            list_filter: ListFilter::default(),
            policy: CachePolicy::default(),
            config: QuickplayConfig::default(),
        }
    }
}

impl QuickplayBuilder {
    /// Sets the catalog fetcher (required)
    #[must_use]
    pub fn catalog(mut self, catalog: Arc<dyn CatalogFetcher>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Sets the list source (required)
    #[must_use]
    pub fn lists(mut self, lists: Arc<dyn ListSource>) -> Self {
        self.lists = Some(lists);
        self
    }

    /// Sets the latency probe
    #[must_use]
    pub fn probe(mut self, probe: Arc<dyn LatencyProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Sets the cache backend
    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the list filter, e.g. with a custom match threshold
    #[must_use]
    pub fn list_filter(mut self, list_filter: ListFilter) -> Self {
        self.list_filter = list_filter;
        self
    }

    /// Sets the freshness windows
    #[must_use]
    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the service tuning
    #[must_use]
    pub fn config(mut self, config: QuickplayConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the service.
    ///
    /// # Errors
    ///
    /// Returns [`QuickplayError::Config`] when the catalog fetcher or list
    /// source is missing.
    pub fn build(self) -> Result<Quickplay> {
        let Some(catalog) = self.catalog else {
            return Err(QuickplayError::Config(
                "a catalog fetcher is required".to_string(),
            ));
        };
        let Some(lists) = self.lists else {
            return Err(QuickplayError::Config(
                "a list source is required".to_string(),
            ));
        };
        Ok(Quickplay {
            inner: Arc::new(Inner {
                catalog,
                lists,
                probe: self.probe,
                list_filter: self.list_filter,
                cache: FreshnessCache::new(self.backend),
                policy: self.policy,
                config: self.config,
            }),
        })
    }
}
