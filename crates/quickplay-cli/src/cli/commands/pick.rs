//! `qplay pick` - Pick the best joinable server.

use anyhow::Result;
use colored::Colorize;
use quickplay::{Classification, Quickplay, ServerRecord};

use super::Context;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context) -> Result<()> {
    let service = ctx.service().await?;
    let result = service.pick().await;
    // Flush the cache even when the pick failed.
    service.shutdown().await;
    let picked = result?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&picked)?),
        OutputFormat::Pretty => match &picked {
            Some(server) => print_pick_pretty(server),
            None => println!("No joinable server right now. Try again in a minute."),
        },
    }

    Ok(())
}

fn print_pick_pretty(server: &ServerRecord) {
    println!("{} {}", "Server:".bold(), server.name);
    println!("{} {}", "Address:".bold(), server.address);
    println!(
        "{} {}/{}",
        "Players:".bold(),
        server.players.to_string().cyan(),
        server.max_players
    );
    if let Some(region) = &server.region {
        println!("{} {}", "Region:".bold(), region);
    }
    if let Some(map) = &server.map {
        println!("{} {}", "Map:".bold(), map);
    }
    match server.latency_ms {
        Some(ms) => println!("{} {} ms", "Latency:".bold(), ms.to_string().cyan()),
        None => println!("{} {}", "Latency:".bold(), "unmeasured".dimmed()),
    }
    if let Classification::Greylisted { reason } = &server.classification {
        println!("{} {}", "Warning:".yellow().bold(), reason);
    }
    println!();
    println!(
        "{} {}",
        "Connect:".bold(),
        Quickplay::connect_url(&server.address).cyan()
    );
}
