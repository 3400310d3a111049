//! `qplay connect` - Print the steam connect URL for a server address.

use anyhow::{Context as _, Result};
use quickplay::{HostPort, Quickplay};

use super::Context;
use crate::cli::args::ConnectArgs;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context, args: &ConnectArgs) -> Result<()> {
    let address: HostPort = args
        .address
        .parse()
        .with_context(|| format!("invalid server address {:?}", args.address))?;
    let url = Quickplay::connect_url(&address);

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "connect_url": url })),
        OutputFormat::Pretty => println!("{url}"),
    }

    Ok(())
}
