use serde::{Deserialize, Serialize};

/// Default catalog filter expression: secure TF2 servers advertising the
/// truequickplay tag.
pub const DEFAULT_FILTER: &str = r"\appid\440\gametype\truequickplay\secure\1";

/// Service-level tuning for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickplayConfig {
    /// Catalog filter expression
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Most descriptors fetched per cycle
    #[serde(default = "default_max_servers")]
    pub max_servers: usize,

    /// Per-probe timeout (seconds)
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Default for QuickplayConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            max_servers: default_max_servers(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

// Default value functions for serde.
fn default_filter() -> String {
    DEFAULT_FILTER.to_string()
}

const fn default_max_servers() -> usize {
    20
}

const fn default_probe_timeout() -> u64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuickplayConfig::default();
        assert_eq!(config.filter, r"\appid\440\gametype\truequickplay\secure\1");
        assert_eq!(config.max_servers, 20);
        assert_eq!(config.probe_timeout_secs, 20);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: QuickplayConfig =
            serde_json::from_str(r#"{"max_servers": 50}"#).unwrap();
        assert_eq!(config.max_servers, 50);
        assert_eq!(config.filter, DEFAULT_FILTER);
        assert_eq!(config.probe_timeout_secs, 20);
    }
}
