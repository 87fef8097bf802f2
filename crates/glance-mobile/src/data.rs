//! Cached usage data with an hourly refresh.

use chrono::{DateTime, Local};
use glance_core::{CacheRecord, CacheStore, WidgetError};

use crate::client::UsageSource;
use crate::policy::needs_refetch;
use crate::types::MobilePayload;

pub const CACHE_NAMESPACE: &str = "tesco-mobile";
pub const CACHE_KEY: &str = "usage-data.json";

pub type MobileRecord = CacheRecord<MobilePayload>;

pub struct MobileData<S> {
    store: CacheStore,
    source: S,
}

impl<S: UsageSource> MobileData<S> {
    pub fn new(store: CacheStore, source: S) -> Self {
        Self { store, source }
    }

    /// Current usage, from cache when it is under an hour old.
    ///
    /// The record is written on every call: either with fresh usage or with
    /// only `accessedTime` moved on.
    pub async fn load(&self, now: DateTime<Local>) -> Result<MobileRecord, WidgetError> {
        let record = match self.store.load::<MobileRecord>(CACHE_KEY) {
            None => {
                tracing::info!("No cached usage data");
                self.fetch(now).await?
            }
            Some(record) => {
                let age = record.age_hours(now);
                if needs_refetch(age) {
                    tracing::info!("Cached usage is {:.2}h old, refreshing", age);
                    self.fetch(now).await?
                } else {
                    tracing::debug!("Using cached usage data ({:.2}h old)", age);
                    let mut record = record;
                    record.touch(now);
                    record
                }
            }
        };

        self.store.save(CACHE_KEY, &record)?;
        Ok(record)
    }

    async fn fetch(&self, now: DateTime<Local>) -> Result<MobileRecord, WidgetError> {
        let usage = self.source.fetch_usage().await?;
        let updated = usage.dates.correct_as()?;
        Ok(CacheRecord::new(
            MobilePayload {
                mobile_usage: usage,
            },
            updated,
            now,
        ))
    }
}
