//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration
    let config = AppConfig::load(cli.config.as_deref())?;
    debug!(
        config_file = ?cli.config,
        cache_backend = ?config.cache.backend,
        "configuration loaded"
    );

    // Determine output format
    let output_format = cli.output.or(config.output_format).unwrap_or_default();

    // API key: the flag beats STEAM_API_KEY (clap reads the env var),
    // which beats the config file.
    let api_key = cli.api_key.clone().or_else(|| config.api_key.clone());

    // Create context for commands
    let ctx = commands::Context {
        api_key,
        output_format,
        verbose: cli.verbose,
        config,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Pick => commands::pick::execute(ctx).await,
        Commands::List(list_args) => commands::list::execute(ctx, list_args).await,
        Commands::Raw => commands::raw::execute(ctx).await,
        Commands::Lists => commands::lists::execute(&ctx),
        Commands::Connect(connect_args) => commands::connect::execute(&ctx, &connect_args),
    }
}

/// Installs the stderr log subscriber; `-v` raises the default level and
/// `RUST_LOG` overrides everything.
fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "warn,quickplay=debug,quickplay_core=debug,quickplay_catalog=debug,\
         quickplay_probe=debug,quickplay_cache=debug,quickplay_cli=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
