//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Find a good TF2 server without the server-browser scroll
///
/// Fetches the quickplay candidate pool from the Steam Web API, hides
/// known-abusive servers, flags borderline ones, and picks the busiest
/// joinable server for you.
///
/// Get an API key at: https://steamcommunity.com/dev/apikey
#[derive(Parser, Debug)]
#[command(name = "qplay")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Steam Web API key (or set STEAM_API_KEY env var)
    #[arg(short = 'k', long, env = "STEAM_API_KEY", global = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick the best joinable server and show how to connect
    Pick,

    /// Page through the classified server pool
    List(ListArgs),

    /// Dump the catalog snapshot exactly as the Steam Web API returned it
    Raw,

    /// Show the curated blacklist and greylist
    Lists,

    /// Print the steam connect URL for a server address
    Connect(ConnectArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Servers per page
    #[arg(short = 'n', long, default_value = "10")]
    pub per_page: u32,
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Server address as host:port
    pub address: String,
}
