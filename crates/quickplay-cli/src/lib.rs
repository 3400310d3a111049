//! # quickplay-cli
//!
//! Command-line interface over the quickplay selection pipeline.
//!
//! ## Commands
//!
//! - **pick**: fetch, classify, and print the best joinable server
//! - **list**: page through the classified pool
//! - **raw**: dump the catalog snapshot exactly as fetched
//! - **lists**: show the curated blacklist and greylist
//! - **connect**: print the steam connect URL for an address

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
