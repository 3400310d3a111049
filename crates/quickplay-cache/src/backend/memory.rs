use crate::backend::CacheBackend;
use crate::entry::CacheEntry;
use async_trait::async_trait;
use quickplay_core::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process cache storage.
///
/// The constructed default and the fallback for every misconfigured or
/// unreachable alternative. Entries die with the process, so no shutdown
/// flush is needed.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryBackend {
    /// Creates an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, entry: CacheEntry) -> Result<()> {
        self.entries.write().await.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
