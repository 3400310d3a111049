//! Single-datagram UDP round-trip measurement.

use crate::error::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tracing::debug;

/// Default per-probe timeout.
///
/// Generous on purpose: the probe runs once, after selection, and a slow
/// answer still beats no figure at all.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(20);

/// Default probe payload: the standard Source-engine info-query magic.
///
/// Game servers answer it without being configured for us; the reply is
/// timed and discarded, never parsed.
pub const DEFAULT_PAYLOAD: &[u8] = b"\xFF\xFF\xFF\xFFTSource Engine Query\x00";

/// Single-datagram reply buffer; game servers cap packets well below this.
const MAX_REPLY: usize = 1400;

/// Measures round-trip latency to a server.
///
/// Implementations make exactly one attempt per call; retry policy belongs
/// to the caller, and in this pipeline there is none.
#[async_trait]
pub trait LatencyProbe: Send + Sync {
    /// Measures one round trip to `addr`, bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] when no reply arrives in time,
    /// [`ProbeError::Socket`] when the socket cannot be set up, and
    /// [`ProbeError::Io`] for failures during the exchange.
    async fn probe(&self, addr: SocketAddr, timeout: Duration) -> ProbeResult<Duration>;
}

/// UDP implementation of [`LatencyProbe`].
///
/// Binds an ephemeral socket, connects it to the target, sends one payload
/// datagram, and times the arrival of the first reply datagram.
#[derive(Debug, Clone)]
pub struct UdpProbe {
    payload: Vec<u8>,
}

impl Default for UdpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl UdpProbe {
    /// Create a probe sending the default payload
    #[must_use]
    pub fn new() -> Self {
        Self {
            payload: DEFAULT_PAYLOAD.to_vec(),
        }
    }

    /// Create a probe sending a custom payload
    #[must_use]
    pub const fn with_payload(payload: Vec<u8>) -> Self {
        Self { payload }
    }
}

#[async_trait]
impl LatencyProbe for UdpProbe {
    async fn probe(&self, addr: SocketAddr, timeout: Duration) -> ProbeResult<Duration> {
        let bind_addr = if addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| ProbeError::Socket(e.to_string()))?;
        // Connecting filters replies to the probed peer.
        socket
            .connect(addr)
            .await
            .map_err(|e| ProbeError::Socket(e.to_string()))?;

        let mut buf = [0u8; MAX_REPLY];
        let start = Instant::now();
        socket.send(&self.payload).await?;

        match tokio::time::timeout(timeout, socket.recv(&mut buf)).await {
            Ok(Ok(_)) => {
                let rtt = start.elapsed();
                debug!(%addr, ?rtt, "probe reply received");
                Ok(rtt)
            }
            Ok(Err(e)) => Err(ProbeError::Io(e)),
            Err(_) => {
                debug!(%addr, ?timeout, "probe timed out");
                Err(ProbeError::Timeout(timeout))
            }
        }
    }
}
