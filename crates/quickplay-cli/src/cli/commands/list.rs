//! `qplay list` - Page through the classified server pool.

use anyhow::Result;
use colored::Colorize;
use quickplay::{Classification, Pagination, ServerPage};
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::ListArgs;
use crate::output::OutputFormat;

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Players")]
    players: String,
    #[tabled(rename = "Map")]
    map: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub async fn execute(ctx: Context, args: ListArgs) -> Result<()> {
    let pagination = Pagination::new(args.page, args.per_page)?;

    let service = ctx.service().await?;
    let result = service.list(pagination).await;
    service.shutdown().await;
    let page = result?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
        OutputFormat::Pretty => print_page_pretty(&page),
    }

    Ok(())
}

fn print_page_pretty(page: &ServerPage) {
    if page.servers.is_empty() {
        println!("No servers on page {} ({} total).", page.page, page.total);
        return;
    }

    let rows: Vec<ServerRow> = page
        .servers
        .iter()
        .map(|server| ServerRow {
            name: server.name.chars().take(40).collect(),
            address: server.address.to_string(),
            players: format!("{}/{}", server.players, server.max_players),
            map: server.map.clone().unwrap_or_default(),
            status: status_label(&server.classification),
        })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!(
        "{}",
        format!("page {} ({} servers total)", page.page, page.total).dimmed()
    );
}

fn status_label(classification: &Classification) -> String {
    match classification {
        Classification::Unclassified => "-".to_string(),
        Classification::Clear => "clear".to_string(),
        Classification::Blacklisted => "blacklisted".to_string(),
        Classification::Greylisted { reason } => format!("greylisted: {reason}"),
    }
}
