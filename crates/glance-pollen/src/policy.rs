//! When to refetch the pollen forecast.

use chrono::{DateTime, Local};
use glance_core::CacheRecord;

/// Past this age the cached location is re-checked.
pub const CHECK_AFTER_HOURS: f64 = 1.25;
/// Past this age the forecast is refetched even if the location is unchanged.
pub const REFETCH_AFTER_HOURS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheAge {
    pub hours: f64,
    /// The record was fetched on an earlier calendar day.
    pub is_outdated: bool,
}

/// Outcome of re-checking a stale record against the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Refetch,
    MarkChecked,
}

impl CacheAge {
    pub fn of<T>(record: &CacheRecord<T>, now: DateTime<Local>) -> Self {
        Self {
            hours: record.age_hours(now),
            is_outdated: record.updated_time.date_naive() != now.date_naive(),
        }
    }

    pub fn needs_check(&self) -> bool {
        self.hours > CHECK_AFTER_HOURS || self.is_outdated
    }

    pub fn after_location(&self, cached: &str, current: &str) -> Refresh {
        if cached != current || self.is_outdated || self.hours > REFETCH_AFTER_HOURS {
            Refresh::Refetch
        } else {
            Refresh::MarkChecked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age(hours: f64, is_outdated: bool) -> CacheAge {
        CacheAge { hours, is_outdated }
    }

    #[test]
    fn test_fresh_record_is_not_checked() {
        assert!(!age(0.5, false).needs_check());
        assert!(!age(1.25, false).needs_check());
        assert!(age(1.3, false).needs_check());
        assert!(age(0.1, true).needs_check());
    }

    #[test]
    fn test_after_location() {
        assert_eq!(age(2.0, false).after_location("Leeds", "Leeds"), Refresh::MarkChecked);
        assert_eq!(age(2.0, false).after_location("Leeds", "York"), Refresh::Refetch);
        assert_eq!(age(2.0, true).after_location("Leeds", "Leeds"), Refresh::Refetch);
        assert_eq!(age(3.5, false).after_location("Leeds", "Leeds"), Refresh::Refetch);
        assert_eq!(age(3.0, false).after_location("Leeds", "Leeds"), Refresh::MarkChecked);
    }
}
