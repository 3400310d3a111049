//! Freshness caching for pipeline results.
//!
//! The pipeline is stateless per invocation; this crate is the one piece of
//! shared state. [`FreshnessCache`] keys serialized results by query class,
//! bounds their age with per-class TTLs, and collapses concurrent misses on
//! the same key into a single upstream computation (per-key single-flight).
//!
//! Storage is pluggable through [`CacheBackend`]:
//!
//! - [`MemoryBackend`] — in-process map; the default and the universal
//!   fallback
//! - [`FileBackend`] — one JSON file per key; survives restarts, so it is
//!   flushed at shutdown
//! - [`RemoteBackend`] — a memcached server; expiry is server-managed
//!
//! The cache is strictly an accelerator: backend failures are logged and
//! bypassed, and computation errors are returned to the caller but never
//! stored.

#![doc(html_root_url = "https://docs.rs/quickplay-cache/1.1.0")]

pub mod backend;
mod config;
mod entry;
mod freshness;

pub use backend::{build_backend, CacheBackend, FileBackend, MemoryBackend, RemoteBackend};
pub use config::{BackendKind, CacheConfig, CachePolicy};
pub use entry::CacheEntry;
pub use freshness::FreshnessCache;
