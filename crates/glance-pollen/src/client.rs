//! tomorrow.io timelines client.

use std::future::Future;

use chrono::{DateTime, Local, NaiveTime, SecondsFormat, TimeZone, Utc};
use glance_core::{read_json, DataShapeError, WidgetError};
use tracing::instrument;

use crate::types::{ApiInterval, HourlyInterval, PollenForecast, TimelinesResponse};

const FIELDS: &str = "treeIndex,grassIndex,weedIndex";

/// Source of today's hourly pollen forecast.
pub trait ForecastSource: Send + Sync {
    fn fetch_today(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<Local>,
    ) -> impl Future<Output = Result<PollenForecast, WidgetError>> + Send;
}

pub struct PollenClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl PollenClient {
    pub fn new(client: reqwest::Client, api_url: &str, api_key: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl ForecastSource for PollenClient {
    #[instrument(skip(self), level = "info")]
    async fn fetch_today(
        &self,
        latitude: f64,
        longitude: f64,
        now: DateTime<Local>,
    ) -> Result<PollenForecast, WidgetError> {
        let (start, end) = day_window(now);
        let url = format!("{}/timelines", self.api_url);
        tracing::debug!(
            "GET {}?location={},{}&timesteps=1h&fields={}&startTime={}&endTime={}&apikey=<redacted>",
            url,
            latitude,
            longitude,
            FIELDS,
            start,
            end
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("location", format!("{},{}", latitude, longitude)),
                ("timesteps", "1h".to_string()),
                ("fields", FIELDS.to_string()),
                ("startTime", start),
                ("endTime", end),
                ("apikey", self.api_key.clone()),
            ])
            .send()
            .await?;

        let body: TimelinesResponse = read_json(response, "pollen timelines").await?;
        let timeline = body
            .data
            .timelines
            .into_iter()
            .next()
            .ok_or(DataShapeError::MissingField("data.timelines[0]"))?;

        let intervals: Vec<HourlyInterval> =
            timeline.intervals.into_iter().map(ApiInterval::into_interval).collect();
        tracing::info!("Fetched {} hourly pollen intervals", intervals.len());

        Ok(PollenForecast::from_intervals(intervals))
    }
}

/// Local midnight and 23:00 of `now`'s day, as UTC timestamps with
/// millisecond precision.
pub fn day_window(now: DateTime<Local>) -> (String, String) {
    let at = |hour: u32| {
        let naive = now
            .date_naive()
            .and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN));
        Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap_or(now)
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    };
    (at(0), at(23))
}
