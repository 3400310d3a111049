use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One cached result.
///
/// The payload is an opaque serialized JSON document; the cache never looks
/// inside it. Entries carry their own expiry stamp so freshness survives
/// backends that persist across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Key the entry was stored under
    pub key: String,

    /// Serialized result payload
    pub payload: String,

    /// Wall-clock moment the entry stops being fresh
    pub expires_at: DateTime<Utc>,

    /// Refresh generation that produced the payload
    pub generation: u64,
}

impl CacheEntry {
    /// Creates an entry expiring `ttl` from now.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        payload: impl Into<String>,
        ttl: Duration,
        generation: u64,
    ) -> Self {
        // Absurd TTLs clamp to the far future instead of overflowing.
        let delta = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(delta)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            key: key.into(),
            payload: payload.into(),
            expires_at,
            generation,
        }
    }

    /// Returns true while the entry has not reached its expiry stamp
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        Utc::now() < self.expires_at
    }

    /// Seconds until expiry, zero once expired
    #[must_use]
    pub fn ttl_remaining_secs(&self) -> u64 {
        (self.expires_at - Utc::now())
            .num_seconds()
            .try_into()
            .unwrap_or(0)
    }
}
