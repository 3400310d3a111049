//! qplay - quickplay server picker for the command line.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    quickplay_cli::run().await
}
