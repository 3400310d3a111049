//! Command implementations.

pub mod connect;
pub mod list;
pub mod lists;
pub mod pick;
pub mod raw;

use std::sync::Arc;

use quickplay::{build_backend, FileLists, Quickplay, WebApiCatalog};

use crate::config::AppConfig;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved Steam Web API key, if any
    pub api_key: Option<String>,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,

    /// Loaded configuration
    pub config: AppConfig,
}

impl Context {
    /// Get the API key, returning an error if not set.
    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "API key required.\n\n\
                 Set it with one of:\n  \
                 1. --api-key <KEY>\n  \
                 2. STEAM_API_KEY environment variable\n  \
                 3. api_key in the config file\n\n\
                 Get your key at: https://steamcommunity.com/dev/apikey"
            )
        })
    }

    /// Assembles the selection service from the loaded configuration.
    pub async fn service(&self) -> anyhow::Result<Quickplay> {
        let key = self.require_api_key()?;
        let backend = build_backend(&self.config.cache).await;
        let service = Quickplay::builder()
            .catalog(Arc::new(WebApiCatalog::new(key)))
            .lists(Arc::new(FileLists::new(
                &self.config.blacklist,
                &self.config.greylist,
            )))
            .backend(backend)
            .policy(self.config.cache.policy)
            .config(self.config.service.clone())
            .build()?;
        Ok(service)
    }
}
