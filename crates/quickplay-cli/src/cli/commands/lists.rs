//! `qplay lists` - Show the curated blacklist and greylist.
//!
//! Reads the list files directly: a local view needs no API key and no
//! cache round trip.

use anyhow::Result;
use colored::Colorize;
use quickplay::{FileLists, ListSet, ListSource};

use super::Context;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context) -> Result<()> {
    let source = FileLists::new(&ctx.config.blacklist, &ctx.config.greylist);
    let lists = source.load()?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lists)?),
        OutputFormat::Pretty => print_lists_pretty(&lists),
    }

    Ok(())
}

fn print_lists_pretty(lists: &ListSet) {
    println!("{} ({} phrases)", "Blacklist".bold(), lists.blacklist.len());
    for phrase in lists.blacklist.phrases() {
        println!("  {phrase}");
    }

    println!();
    println!("{} ({} entries)", "Greylist".bold(), lists.greylist.len());
    for entry in lists.greylist.entries() {
        println!("  {}  {}", entry.server, entry.reason.dimmed());
    }
}
