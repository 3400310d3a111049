use thiserror::Error;

/// Result type alias for quickplay operations
pub type Result<T> = std::result::Result<T, QuickplayError>;

/// Errors that can occur while fetching, classifying, or caching servers.
///
/// "No server found" is deliberately not an error: selection returns
/// `Ok(None)` for an exhausted candidate walk. Probe failures have their own
/// type in the probe crate and are absorbed there, never surfaced here.
#[derive(Error, Debug)]
pub enum QuickplayError {
    /// Authentication failed - invalid or missing Web API key
    #[error("authentication failed: invalid API key")]
    Unauthorized,

    /// Upstream master server returned an error response
    #[error("upstream API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blacklist or greylist source failed to load or parse.
    ///
    /// Surfaced loudly: a malformed list must never degrade into an empty
    /// one that silently disables filtering.
    #[error("malformed {list} source at {path}: {reason}")]
    ListSource {
        /// Which list failed ("blacklist" or "greylist")
        list: String,
        /// Path of the offending source file
        path: String,
        /// What went wrong
        reason: String,
    },

    /// Server address string from the catalog could not be parsed
    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    /// Pagination parameters are out of range
    #[error("invalid pagination: page {page}, page size {per_page}")]
    InvalidPagination {
        /// Requested 1-based page number
        page: u32,
        /// Requested page size
        per_page: u32,
    },

    /// Cache backend failure
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl QuickplayError {
    /// Returns true if the error originated at the upstream catalog service
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::Api { .. }
                | Self::Http(_)
                | Self::Timeout(_)
                | Self::Json(_)
        )
    }

    /// Returns true if the error is a malformed list source
    #[must_use]
    pub const fn is_list_source(&self) -> bool {
        matches!(self, Self::ListSource { .. })
    }

    /// Returns true if the error is due to caller-supplied input
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidPagination { .. })
    }
}
