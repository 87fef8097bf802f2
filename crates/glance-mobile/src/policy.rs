//! When to refetch mobile usage.

/// Usage older than this is fetched again.
pub const REFETCH_AFTER_HOURS: f64 = 1.0;

pub fn needs_refetch(cache_age_hours: f64) -> bool {
    cache_age_hours > REFETCH_AFTER_HOURS
}
