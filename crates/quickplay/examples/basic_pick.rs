//! Basic example: pick a server and print the connect URL.
//!
//! Run with: cargo run --example basic_pick
//!
//! Set the STEAM_API_KEY environment variable before running, and put
//! blacklist.json / greylist.json in the working directory.

use quickplay::{FileLists, Quickplay, WebApiCatalog};
use std::sync::Arc;

#[tokio::main]
async fn main() -> quickplay::Result<()> {
    // Get API key from environment
    let api_key = std::env::var("STEAM_API_KEY")
        .expect("STEAM_API_KEY environment variable is required");

    // Assemble the pipeline with defaults: UDP probe, in-memory cache
    let service = Quickplay::new(
        Arc::new(WebApiCatalog::new(api_key)),
        Arc::new(FileLists::new("blacklist.json", "greylist.json")),
    );

    match service.pick().await? {
        Some(server) => {
            println!("=== Picked ===");
            println!("Name: {}", server.name);
            println!("Address: {}", server.address);
            println!("Players: {}/{}", server.players, server.max_players);
            if let Some(region) = &server.region {
                println!("Region: {region}");
            }
            if let Some(ms) = server.latency_ms {
                println!("Latency: {ms} ms");
            }
            println!();
            println!("Connect: {}", Quickplay::connect_url(&server.address));
        }
        None => println!("No joinable server right now."),
    }

    service.shutdown().await;
    Ok(())
}
