//! Pluggable cache storage.

mod file;
mod memory;
mod remote;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use remote::RemoteBackend;

use crate::config::{BackendKind, CacheConfig};
use crate::entry::CacheEntry;
use async_trait::async_trait;
use quickplay_core::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Storage behind the freshness cache.
///
/// Implementations store whole entries atomically by key; there are no
/// multi-key transactions. A `get` may return a stale entry; deciding
/// freshness is the cache's job, not the backend's.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Reads the entry stored under `key`, fresh or not.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Stores an entry, replacing any previous one under the same key.
    async fn set(&self, entry: CacheEntry) -> Result<()>;

    /// Removes the entry under `key`; absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    async fn flush(&self) -> Result<()>;

    /// Whether entries outlive the process and need a shutdown flush.
    fn requires_shutdown_flush(&self) -> bool {
        false
    }

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Constructs the configured backend.
///
/// Never refuses to start: an unrecognized kind or an unreachable remote
/// server degrades to the in-process memory backend with a warning.
pub async fn build_backend(config: &CacheConfig) -> Arc<dyn CacheBackend> {
    match config.backend {
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
        BackendKind::File => {
            info!(dir = %config.dir.display(), "using file cache backend");
            Arc::new(FileBackend::new(config.dir.clone()))
        }
        BackendKind::Remote => match RemoteBackend::connect(config.remote_addr.clone()).await {
            Ok(backend) => {
                info!(addr = %config.remote_addr, "using remote cache backend");
                Arc::new(backend)
            }
            Err(e) => {
                warn!(
                    addr = %config.remote_addr,
                    error = %e,
                    "remote cache unreachable, falling back to memory backend"
                );
                Arc::new(MemoryBackend::new())
            }
        },
        BackendKind::Unrecognized => {
            warn!("unrecognized cache backend in config, falling back to memory backend");
            Arc::new(MemoryBackend::new())
        }
    }
}
