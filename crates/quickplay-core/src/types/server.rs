use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::error::QuickplayError;
use crate::region::region_name;

/// A game server endpoint, parsed from the catalog's `"host:port"` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostPort {
    /// Hostname or IP literal (brackets stripped for IPv6)
    pub host: String,
    /// UDP/TCP port
    pub port: u16,
}

impl HostPort {
    /// Creates a new endpoint from parts
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the endpoint as a socket address when the host is an IP
    /// literal. Hostnames return `None`; this type never resolves DNS.
    #[must_use]
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.host
            .parse::<IpAddr>()
            .ok()
            .map(|ip| SocketAddr::new(ip, self.port))
    }
}

impl FromStr for HostPort {
    type Err = QuickplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| QuickplayError::InvalidAddress(s.to_string()))?;
        // IPv6 literals arrive bracketed: "[::1]:27015".
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(QuickplayError::InvalidAddress(s.to_string()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| QuickplayError::InvalidAddress(s.to_string()))?;
        Ok(Self::new(host, port))
    }
}

impl TryFrom<String> for HostPort {
    type Error = QuickplayError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HostPort> for String {
    fn from(hp: HostPort) -> Self {
        hp.to_string()
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// The loose server record as the upstream catalog returns it.
///
/// Every field is defaulted: the catalog omits fields freely and a partial
/// record must still deserialize. Validation happens when a descriptor is
/// promoted to a [`ServerRecord`], not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawServerDescriptor {
    /// Endpoint as a raw `"host:port"` string
    #[serde(default)]
    pub addr: String,

    /// Game traffic port, often distinct from the query port in `addr`
    #[serde(default)]
    pub gameport: u16,

    /// Server's Steam ID
    #[serde(default)]
    pub steamid: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Application ID of the hosted game
    #[serde(default)]
    pub appid: u32,

    /// Game directory (e.g. "tf")
    #[serde(default)]
    pub gamedir: Option<String>,

    /// Server version string
    #[serde(default)]
    pub version: Option<String>,

    /// Product identifier
    #[serde(default)]
    pub product: Option<String>,

    /// Numeric region code; mapped to a display name on promotion
    #[serde(default)]
    pub region: Option<i32>,

    /// Current player count
    #[serde(default)]
    pub players: u32,

    /// Maximum player count
    #[serde(default)]
    pub max_players: u32,

    /// Bot count, included in `players` by some games
    #[serde(default)]
    pub bots: u32,

    /// Current map name
    #[serde(default)]
    pub map: Option<String>,

    /// Whether the server is VAC-secured
    #[serde(default)]
    pub secure: bool,

    /// Whether the server is a dedicated host
    #[serde(default)]
    pub dedicated: bool,

    /// Host operating system code
    #[serde(default)]
    pub os: Option<String>,

    /// Comma-separated gametype tags
    #[serde(default)]
    pub gametype: Option<String>,
}

/// Classification assigned to a server by the list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Classification {
    /// Not yet classified
    #[default]
    Unclassified,
    /// Passed both lists
    Clear,
    /// Matched a blacklist phrase; never selectable
    Blacklisted,
    /// Matched a greylist phrase; selectable, carries the operator's note
    Greylisted {
        /// Why the matching phrase was listed
        reason: String,
    },
}

impl Classification {
    /// Returns true unless the server is blacklisted
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        !matches!(self, Self::Blacklisted)
    }

    /// Returns the greylist reason, if any
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Greylisted { reason } => Some(reason),
            _ => None,
        }
    }
}

/// A validated, display-ready server record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Parsed server endpoint
    pub address: HostPort,

    /// Display name as reported by the server
    pub name: String,

    /// Region display name; `None` when the catalog sent an unknown code
    #[serde(default)]
    pub region: Option<String>,

    /// Current player count
    pub players: u32,

    /// Maximum player count
    pub max_players: u32,

    /// Bot count
    #[serde(default)]
    pub bots: u32,

    /// Current map name
    #[serde(default)]
    pub map: Option<String>,

    /// Comma-separated gametype tags
    #[serde(default)]
    pub gametype: Option<String>,

    /// Whether the server is VAC-secured
    #[serde(default)]
    pub secure: bool,

    /// Round-trip latency, set only after a probe
    #[serde(default)]
    pub latency_ms: Option<u64>,

    /// List-filter verdict
    #[serde(default)]
    pub classification: Classification,
}

impl ServerRecord {
    /// Promotes a raw catalog descriptor to a validated record.
    ///
    /// # Errors
    ///
    /// Returns [`QuickplayError::InvalidAddress`] when the descriptor's
    /// `addr` string does not parse as `host:port`.
    pub fn from_raw(raw: &RawServerDescriptor) -> crate::Result<Self> {
        let address: HostPort = raw.addr.parse()?;
        Ok(Self {
            address,
            name: raw.name.clone(),
            region: raw.region.and_then(region_name).map(str::to_owned),
            players: raw.players,
            max_players: raw.max_players,
            bots: raw.bots,
            map: raw.map.clone(),
            gametype: raw.gametype.clone(),
            secure: raw.secure,
            latency_ms: None,
            classification: Classification::Unclassified,
        })
    }

    /// Returns true if another player can join
    #[must_use]
    pub const fn has_room(&self) -> bool {
        self.players < self.max_players
    }
}
