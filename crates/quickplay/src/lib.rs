//! Server selection pipeline for quickplay-style matchmaking.
//!
//! Finds a joinable game server from a dynamic candidate pool while hiding
//! known-abusive servers (blacklist) and flagging borderline ones
//! (greylist). Results are served through a freshness cache with per-key
//! single-flight refresh.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use quickplay::{FileLists, Quickplay, WebApiCatalog};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> quickplay::Result<()> {
//!     let service = Quickplay::new(
//!         Arc::new(WebApiCatalog::new("steam-api-key")),
//!         Arc::new(FileLists::new("blacklist.json", "greylist.json")),
//!     );
//!
//!     match service.pick().await? {
//!         Some(server) => println!("join {} ({})", server.name, server.address),
//!         None => println!("no joinable server right now"),
//!     }
//!
//!     service.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/quickplay/1.1.0")]

mod config;
mod lists;
mod service;

pub use config::{QuickplayConfig, DEFAULT_FILTER};
pub use lists::{FileLists, ListSource};
pub use service::{Quickplay, QuickplayBuilder};

// Re-export the pipeline crates
pub use quickplay_core::*;

pub use quickplay_cache::{
    build_backend, BackendKind, CacheBackend, CacheConfig, CachePolicy, FileBackend,
    FreshnessCache, MemoryBackend, RemoteBackend,
};
pub use quickplay_catalog::{CatalogFetcher, WebApiCatalog, WebApiCatalogBuilder};
pub use quickplay_probe::{LatencyProbe, ProbeError, UdpProbe};

// Re-export key runtime
pub use serde;
pub use serde_json;
pub use tokio;
