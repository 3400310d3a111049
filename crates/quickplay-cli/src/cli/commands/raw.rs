//! `qplay raw` - Dump the catalog snapshot exactly as fetched.

use anyhow::Result;

use super::Context;

pub async fn execute(ctx: Context) -> Result<()> {
    let service = ctx.service().await?;
    let result = service.raw().await;
    service.shutdown().await;
    let descriptors = result?;

    // The snapshot is JSON by nature; both output formats print it indented.
    println!("{}", serde_json::to_string_pretty(&descriptors)?);

    Ok(())
}
