//! Upstream server catalog access for the quickplay picker.
//!
//! The pipeline never speaks the legacy master-server query protocol; it
//! consumes the catalog through the [`CatalogFetcher`] seam. The shipped
//! implementation, [`WebApiCatalog`], fetches the
//! `IGameServersService/GetServerList` Steam Web API endpoint over HTTPS.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickplay_catalog::{CatalogFetcher, WebApiCatalog};
//!
//! let catalog = WebApiCatalog::new("steam-api-key");
//! let servers = catalog.fetch(r"\appid\440\gametype\truequickplay\secure\1", 20).await?;
//! ```

#![doc(html_root_url = "https://docs.rs/quickplay-catalog/1.1.0")]

mod client;
mod fetcher;

pub use client::{WebApiCatalog, WebApiCatalogBuilder};
pub use fetcher::CatalogFetcher;
