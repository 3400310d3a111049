use std::time::Duration;
use thiserror::Error;

/// Result type alias for probe operations
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Errors from the latency probe.
///
/// Deliberately carries no conversion into the pipeline's main error type:
/// a failed probe degrades a selection (no latency figure), it never fails
/// one.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// No reply arrived within the allowed window
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// Socket setup failed before anything was sent
    #[error("socket setup failed: {0}")]
    Socket(String),

    /// Network I/O error during the exchange
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),
}
