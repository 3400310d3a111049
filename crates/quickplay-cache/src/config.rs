use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Which cache backend to construct.
///
/// Configuration is forgiving here: a value this build does not know still
/// deserializes (as `Unrecognized`) and construction falls back to the
/// memory backend instead of refusing to start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process map, the default
    #[default]
    Memory,
    /// One JSON file per key on disk
    File,
    /// Networked memcached server
    Remote,
    /// Any value this build does not recognize
    #[serde(other)]
    Unrecognized,
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Backend to construct
    #[serde(default)]
    pub backend: BackendKind,

    /// Directory for the file backend
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// `host:port` of the remote backend
    #[serde(default = "default_remote_addr")]
    pub remote_addr: String,

    /// Freshness windows per query class
    #[serde(default)]
    pub policy: CachePolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            dir: default_cache_dir(),
            remote_addr: default_remote_addr(),
            policy: CachePolicy::default(),
        }
    }
}

/// Freshness windows for the query classes the pipeline caches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CachePolicy {
    /// How long a single-pick result stays fresh (seconds)
    #[serde(default = "default_selection_ttl")]
    pub selection_ttl_secs: u64,

    /// How long listing pages and the raw catalog stay fresh (seconds)
    #[serde(default = "default_listing_ttl")]
    pub listing_ttl_secs: u64,

    /// How long rarely-changing content stays fresh (seconds)
    #[serde(default = "default_content_ttl")]
    pub content_ttl_secs: u64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            selection_ttl_secs: default_selection_ttl(),
            listing_ttl_secs: default_listing_ttl(),
            content_ttl_secs: default_content_ttl(),
        }
    }
}

impl CachePolicy {
    /// Freshness window for single-pick results
    #[must_use]
    pub const fn selection_ttl(&self) -> Duration {
        Duration::from_secs(self.selection_ttl_secs)
    }

    /// Freshness window for listing pages and the raw catalog
    #[must_use]
    pub const fn listing_ttl(&self) -> Duration {
        Duration::from_secs(self.listing_ttl_secs)
    }

    /// Freshness window for rarely-changing content
    #[must_use]
    pub const fn content_ttl(&self) -> Duration {
        Duration::from_secs(self.content_ttl_secs)
    }
}

// Default value functions for serde.
const fn default_selection_ttl() -> u64 {
    60
}

const fn default_listing_ttl() -> u64 {
    60
}

const fn default_content_ttl() -> u64 {
    3600
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_remote_addr() -> String {
    String::from("127.0.0.1:11211")
}
