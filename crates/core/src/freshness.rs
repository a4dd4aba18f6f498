//! Cache freshness policy for stored profiles.
//!
//! A stored profile is served as-is while it is younger than the TTL;
//! anything older is refreshed from the provider.

use chrono::Duration;

use crate::types::Timestamp;

/// Default time-to-live for a cached profile (days).
pub const DEFAULT_CACHE_TTL_DAYS: i64 = 30;

/// Decides whether a stored profile may be served without refreshing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    ttl: Duration,
}

impl CachePolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// TTL of `days` days; `None` when that overflows a [`Duration`].
    pub fn from_days(days: i64) -> Option<Self> {
        Duration::try_days(days).map(Self::new)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Age of a record last refreshed at `updated_at`, as seen at `now`.
    pub fn age(updated_at: Timestamp, now: Timestamp) -> Duration {
        now - updated_at
    }

    /// `true` when `now - updated_at < ttl`.
    ///
    /// A record stamped in the future (clock skew between writers) has a
    /// negative age and counts as fresh.
    pub fn is_fresh(&self, updated_at: Timestamp, now: Timestamp) -> bool {
        Self::age(updated_at, now) < self.ttl
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(Duration::days(DEFAULT_CACHE_TTL_DAYS))
    }
}
