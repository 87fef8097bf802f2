use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use glance_core::DataShapeError;
use serde::{Deserialize, Serialize};

/// Allowance type the widget reports on.
pub const DATA_ALLOWANCE: &str = "Data";

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Usage document as returned by the carrier and stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileUsage {
    #[serde(default)]
    pub allowances: Vec<Allowance>,
    pub dates: UsageDates,
}

/// One allowance bucket. Data amounts are in MB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allowance {
    #[serde(rename = "type")]
    pub kind: String,
    pub remaining: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageDates {
    /// When the carrier last measured usage.
    pub info_correct_as: String,
    /// Last day of the billing period, e.g. `2026-06-01Z`.
    pub end_date: String,
}

impl UsageDates {
    pub fn correct_as(&self) -> Result<DateTime<Local>, DataShapeError> {
        let raw = self.info_correct_as.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Local));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .and_then(|naive| naive.and_local_timezone(Local).earliest())
            .ok_or_else(|| DataShapeError::BadValue {
                field: "dates.info_correct_as",
                value: self.info_correct_as.clone(),
            })
    }

    pub fn period_end(&self) -> Result<NaiveDate, DataShapeError> {
        let raw = self.end_date.trim();
        let date_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date_part.trim_end_matches('Z'), "%Y-%m-%d").map_err(|_| {
            DataShapeError::BadValue {
                field: "dates.end_date",
                value: self.end_date.clone(),
            }
        })
    }
}

impl MobileUsage {
    pub fn allowance(&self, kind: &str) -> Option<&Allowance> {
        self.allowances.iter().find(|a| a.kind == kind)
    }
}

/// What the widget shows, derived from the data allowance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageSnapshot {
    pub remaining: f64,
    pub total: f64,
    pub period_end_date: NaiveDate,
}

impl UsageSnapshot {
    pub fn from_usage(usage: &MobileUsage) -> Result<Self, DataShapeError> {
        let data = usage
            .allowance(DATA_ALLOWANCE)
            .ok_or_else(|| DataShapeError::MissingAllowance(DATA_ALLOWANCE.to_string()))?;
        Ok(Self {
            remaining: data.remaining,
            total: data.total,
            period_end_date: usage.dates.period_end()?,
        })
    }

    /// Whole-number percentage of the allowance left. Zero when the total is
    /// not positive.
    pub fn percentage(&self) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.total * 100.0).round()
    }

    pub fn remaining_text(&self) -> String {
        format!("{:.2}GB", self.remaining / 1024.0)
    }

    /// Days from the start of `now`'s local day to the period end, which
    /// the carrier reports as midnight UTC. Part days round up, so east of
    /// UTC the count includes the hours before local midnight.
    pub fn days_remaining<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> i64 {
        let end = self.period_end_date.and_time(NaiveTime::MIN).and_utc();
        let midnight = now.date_naive().and_time(NaiveTime::MIN);
        let start = now
            .timezone()
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| now.with_timezone(&Utc));

        let millis = (end - start).num_milliseconds();
        (millis + MILLIS_PER_DAY - 1).div_euclid(MILLIS_PER_DAY)
    }
}

/// Everything the mobile widget caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobilePayload {
    pub mobile_usage: MobileUsage,
}
