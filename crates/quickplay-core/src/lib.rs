//! Core types and policies for the quickplay server picker.
//!
//! This crate provides the pure, synchronous heart of the pipeline:
//!
//! - **Types**: [`ServerRecord`], the blacklist/greylist tables, and
//!   pagination
//! - **Similarity**: the [`similarity::partial_ratio`] fuzzy scorer
//! - **Classification**: [`ListFilter`], which stamps each candidate
//! - **Selection**: [`pick`], the single-candidate policy
//! - **Errors**: [`QuickplayError`] and the [`Result`] alias
//!
//! Nothing here performs I/O; fetching, probing, and caching live in the
//! sibling crates.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickplay_core::{ListFilter, ListSet, ServerRecord, pick};
//!
//! fn choose(mut candidates: Vec<ServerRecord>, lists: &ListSet) -> Option<ServerRecord> {
//!     ListFilter::default().classify_all(&mut candidates, lists);
//!     pick(candidates)
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/quickplay-core/1.1.0")]

mod error;
mod filter;
mod region;
mod select;
pub mod similarity;
pub mod types;

pub use error::{QuickplayError, Result};
pub use filter::{ListFilter, DEFAULT_THRESHOLD};
pub use region::region_name;
pub use select::pick;
pub use similarity::partial_ratio;
pub use types::*;
