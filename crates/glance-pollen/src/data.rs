//! Cached pollen data with location-aware refresh.

use chrono::{DateTime, Local};
use glance_core::{CacheRecord, CacheStore, WidgetError};

use crate::client::ForecastSource;
use crate::location::LocationService;
use crate::policy::{CacheAge, Refresh};
use crate::types::{PollenPayload, ResolvedLocation};

pub const CACHE_NAMESPACE: &str = "pollen-level";
pub const CACHE_KEY: &str = "hourly-data.json";

pub type PollenRecord = CacheRecord<PollenPayload>;

pub struct PollenData<L, S> {
    store: CacheStore,
    locations: L,
    source: S,
}

impl<L: LocationService, S: ForecastSource> PollenData<L, S> {
    pub fn new(store: CacheStore, locations: L, source: S) -> Self {
        Self {
            store,
            locations,
            source,
        }
    }

    /// Today's forecast for the current location, from cache when possible.
    pub async fn load(&self, now: DateTime<Local>) -> Result<PollenRecord, WidgetError> {
        let Some(mut record) = self.store.load::<PollenRecord>(CACHE_KEY) else {
            tracing::info!("No cached pollen data");
            let location = self.locations.resolve(None).await?;
            return self.fetch(location, now).await;
        };

        let age = CacheAge::of(&record, now);
        if !age.needs_check() {
            tracing::debug!("Using cached pollen data ({:.2}h old)", age.hours);
            return Ok(record);
        }

        let cached_location = &record.payload.my_location;
        let location = self.locations.resolve(Some(cached_location)).await?;

        match age.after_location(&cached_location.display_location, &location.display_location) {
            Refresh::Refetch => {
                tracing::info!(
                    "Refreshing pollen data ({:.2}h old, outdated: {})",
                    age.hours,
                    age.is_outdated
                );
                self.fetch(location, now).await
            }
            Refresh::MarkChecked => {
                tracing::info!("Cached pollen data still valid, marking checked");
                record.touch(now);
                self.store.save(CACHE_KEY, &record)?;
                Ok(record)
            }
        }
    }

    async fn fetch(
        &self,
        location: ResolvedLocation,
        now: DateTime<Local>,
    ) -> Result<PollenRecord, WidgetError> {
        let forecast = self
            .source
            .fetch_today(location.latitude, location.longitude, now)
            .await?;

        let record = CacheRecord::new(
            PollenPayload {
                my_location: location,
                todays_pollen: forecast,
            },
            now,
            now,
        );
        self.store.save(CACHE_KEY, &record)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::types::{HourlyInterval, PlaceNames, PollenForecast};
    use chrono::{Duration, TimeZone, Utc};
    use glance_core::LocationError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct FixedLocation {
        city: &'static str,
        calls: AtomicUsize,
    }

    impl FixedLocation {
        fn new(city: &'static str) -> Self {
            Self {
                city,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl LocationService for FixedLocation {
        async fn resolve(
            &self,
            _fallback: Option<&ResolvedLocation>,
        ) -> Result<ResolvedLocation, LocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(named(self.city))
        }
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ForecastSource for CountingSource {
        async fn fetch_today(
            &self,
            _latitude: f64,
            _longitude: f64,
            now: DateTime<Local>,
        ) -> Result<PollenForecast, WidgetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(forecast_around(now))
        }
    }

    fn named(city: &str) -> ResolvedLocation {
        ResolvedLocation::new(
            53.8,
            -1.5,
            PlaceNames {
                city: Some(city.to_string()),
                ..Default::default()
            },
        )
    }

    fn forecast_around(now: DateTime<Local>) -> PollenForecast {
        let start = now.with_timezone(&Utc) - Duration::minutes(30);
        PollenForecast::from_intervals(vec![HourlyInterval::new(start, 2, 4, 1)])
    }

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 5, 14, hour, minute, 0).unwrap()
    }

    fn seed(store: &CacheStore, city: &str, updated: DateTime<Local>) {
        let record = CacheRecord::new(
            PollenPayload {
                my_location: named(city),
                todays_pollen: forecast_around(updated),
            },
            updated,
            updated,
        );
        store.save(CACHE_KEY, &record).unwrap();
    }

    #[tokio::test]
    async fn test_empty_cache_fetches_and_writes() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), CACHE_NAMESPACE);
        let data = PollenData::new(
            store.clone(),
            FixedLocation::new("Leeds"),
            CountingSource::new(),
        );

        let record = data.load(at(12, 0)).await.unwrap();

        assert_eq!(data.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(record.updated_time, at(12, 0));
        assert!(store.path_for(CACHE_KEY).exists());
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_location_and_fetch() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), CACHE_NAMESPACE);
        seed(&store, "Leeds", at(11, 30));
        let data = PollenData::new(store, FixedLocation::new("Leeds"), CountingSource::new());

        let record = data.load(at(12, 0)).await.unwrap();

        assert_eq!(data.locations.calls.load(Ordering::SeqCst), 0);
        assert_eq!(data.source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(record.accessed_time, at(11, 30));
    }

    #[tokio::test]
    async fn test_same_location_marks_checked() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), CACHE_NAMESPACE);
        seed(&store, "Leeds", at(10, 0));
        let data = PollenData::new(
            store.clone(),
            FixedLocation::new("Leeds"),
            CountingSource::new(),
        );

        let record = data.load(at(12, 0)).await.unwrap();

        assert_eq!(data.source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(record.updated_time, at(10, 0));
        assert_eq!(record.accessed_time, at(12, 0));

        let saved: PollenRecord = store.load(CACHE_KEY).unwrap();
        assert_eq!(saved.accessed_time, at(12, 0));
    }

    #[tokio::test]
    async fn test_moved_location_refetches() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), CACHE_NAMESPACE);
        seed(&store, "Leeds", at(10, 0));
        let data = PollenData::new(store, FixedLocation::new("York"), CountingSource::new());

        let record = data.load(at(12, 0)).await.unwrap();

        assert_eq!(data.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(record.payload.my_location.display_location, "York");
        assert_eq!(record.updated_time, at(12, 0));
    }

    #[tokio::test]
    async fn test_old_record_refetches() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), CACHE_NAMESPACE);
        seed(&store, "Leeds", at(8, 0));
        let data = PollenData::new(store, FixedLocation::new("Leeds"), CountingSource::new());

        let record = data.load(at(12, 0)).await.unwrap();

        assert_eq!(data.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(record.updated_time, at(12, 0));
    }

    #[tokio::test]
    async fn test_yesterdays_record_refetches() {
        let dir = tempdir().unwrap();
        let store = CacheStore::new(dir.path(), CACHE_NAMESPACE);
        let yesterday = Local.with_ymd_and_hms(2026, 5, 13, 23, 50, 0).unwrap();
        seed(&store, "Leeds", yesterday);
        let data = PollenData::new(store, FixedLocation::new("Leeds"), CountingSource::new());

        data.load(at(0, 10)).await.unwrap();

        assert_eq!(data.source.calls.load(Ordering::SeqCst), 1);
    }
}
