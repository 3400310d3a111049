//! Latency measurement for selected game servers.
//!
//! The pipeline enriches a selected server with a round-trip time, nothing
//! more: one datagram out, first datagram back, clock in between. The query
//! protocol the server happens to speak is deliberately out of scope; the
//! probe sends an opaque payload and never parses the reply.
//!
//! Probe failures are their own error type and are expected to be absorbed
//! at the call site. A server that will not answer a ping is still a
//! perfectly good selection.

#![doc(html_root_url = "https://docs.rs/quickplay-probe/1.1.0")]

mod error;
mod probe;

pub use error::{ProbeError, ProbeResult};
pub use probe::{LatencyProbe, UdpProbe, DEFAULT_PAYLOAD, DEFAULT_PROBE_TIMEOUT};
