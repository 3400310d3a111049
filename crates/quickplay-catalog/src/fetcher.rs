use async_trait::async_trait;
use quickplay_core::{RawServerDescriptor, Result};

/// The upstream catalog seam.
///
/// A fetch returns the candidate pool for one pipeline cycle. The catalog
/// may return fewer descriptors than `max` and promises no ordering; the
/// selection policy imposes its own. Retries and caching are the caller's
/// concern, never the fetcher's.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Fetches up to `max` raw descriptors matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an upstream-class [`quickplay_core::QuickplayError`]
    /// (`Unauthorized`, `Api`, `Http`, `Timeout`, or `Json`) when the
    /// catalog cannot be reached or its response cannot be read.
    async fn fetch(&self, filter: &str, max: usize) -> Result<Vec<RawServerDescriptor>>;
}
