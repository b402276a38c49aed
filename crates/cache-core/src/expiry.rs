//! TTL handling

use chrono::{DateTime, Duration, Utc};

/// Default entry lifetime (24 hours)
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;

/// An entry is expired from the instant `expires_at` is reached
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expires_at
}

/// Lifetime of `secs` seconds, or `None` when it is zero or beyond what a
/// timestamp offset can hold
pub fn ttl_from_secs(secs: u64) -> Option<Duration> {
    i64::try_from(secs)
        .ok()
        .filter(|secs| *secs > 0)
        .and_then(Duration::try_seconds)
}

/// Expiry for an artifact generated at `generated_at`
///
/// An explicit expiry is honoured only when it lies after `generated_at`;
/// otherwise the default lifetime applies, so an entry always expires after
/// it was created. A lifetime running past the last representable instant
/// saturates there.
pub fn expiry_from(
    generated_at: DateTime<Utc>,
    explicit: Option<DateTime<Utc>>,
    default_ttl: Duration,
) -> DateTime<Utc> {
    match explicit {
        Some(expires_at) if expires_at > generated_at => expires_at,
        _ => generated_at
            .checked_add_signed(default_ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
    }
}
