use chrono::{DateTime, Duration, Local, Utc};
use glance_core::DataShapeError;
use serde::{Deserialize, Serialize};

/// Highest pollen level tomorrow.io reports.
pub const MAX_POLLEN_INDEX: u8 = 5;

const NEARBY_DEGREES: f64 = 0.0005;

/// Place names from reverse geocoding, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceNames {
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

/// A looked-up position with its human-readable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub display_location: String,
}

impl ResolvedLocation {
    /// Display name is "neighborhood, city" when both are known, else the
    /// city, else the region, else the coordinates.
    pub fn new(latitude: f64, longitude: f64, names: PlaceNames) -> Self {
        let display_location = match (&names.neighborhood, &names.city, &names.region) {
            (Some(n), Some(c), _) => format!("{}, {}", n, c),
            (_, Some(c), _) => c.clone(),
            (_, None, Some(r)) => r.clone(),
            _ => format!("{:.3}, {:.3}", latitude, longitude),
        };

        Self {
            latitude,
            longitude,
            neighborhood: names.neighborhood,
            city: names.city,
            region: names.region,
            display_location,
        }
    }

    pub fn names(&self) -> PlaceNames {
        PlaceNames {
            neighborhood: self.neighborhood.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
        }
    }

    /// True when both coordinates agree to three decimal places (about 100m).
    pub fn is_near(&self, latitude: f64, longitude: f64) -> bool {
        (self.latitude - latitude).abs() < NEARBY_DEGREES
            && (self.longitude - longitude).abs() < NEARBY_DEGREES
    }
}

/// One hour of the day's forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyInterval {
    pub start_time: DateTime<Utc>,
    pub tree_index: u8,
    pub grass_index: u8,
    pub weed_index: u8,
    /// Worst of the three allergen indices.
    pub pollen_index: u8,
}

impl HourlyInterval {
    pub fn new(start_time: DateTime<Utc>, tree: u8, grass: u8, weed: u8) -> Self {
        Self {
            start_time,
            tree_index: tree,
            grass_index: grass,
            weed_index: weed,
            pollen_index: tree.max(grass).max(weed).min(MAX_POLLEN_INDEX),
        }
    }

    /// True when `now` falls in `(start, start + 1h]`.
    pub fn covers(&self, now: DateTime<Utc>) -> bool {
        self.start_time < now && self.start_time + Duration::hours(1) >= now
    }
}

/// Today's hourly forecast plus the flat level sequence the chart draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollenForecast {
    pub intervals: Vec<HourlyInterval>,
    pub levels: Vec<u8>,
}

impl PollenForecast {
    pub fn from_intervals(intervals: Vec<HourlyInterval>) -> Self {
        let levels = intervals.iter().map(|i| i.pollen_index).collect();
        Self { intervals, levels }
    }

    /// Level for the hour containing `now`.
    pub fn current_index(&self, now: DateTime<Local>) -> Result<u8, DataShapeError> {
        let now = now.with_timezone(&Utc);
        self.intervals
            .iter()
            .find(|i| i.covers(now))
            .map(|i| i.pollen_index)
            .ok_or_else(|| DataShapeError::NoCurrentInterval(now.to_rfc3339()))
    }
}

/// Everything the pollen widget caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollenPayload {
    pub my_location: ResolvedLocation,
    pub todays_pollen: PollenForecast,
}

// tomorrow.io timelines response

#[derive(Debug, Deserialize)]
pub(crate) struct TimelinesResponse {
    pub data: TimelinesData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimelinesData {
    #[serde(default)]
    pub timelines: Vec<Timeline>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Timeline {
    #[serde(default)]
    pub intervals: Vec<ApiInterval>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiInterval {
    pub start_time: DateTime<Utc>,
    pub values: ApiValues,
}

/// Indices are null outside the supported regions and seasons.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiValues {
    #[serde(default)]
    pub tree_index: Option<u8>,
    #[serde(default)]
    pub grass_index: Option<u8>,
    #[serde(default)]
    pub weed_index: Option<u8>,
}

impl ApiInterval {
    pub(crate) fn into_interval(self) -> HourlyInterval {
        let v = self.values;
        HourlyInterval::new(
            self.start_time,
            v.tree_index.unwrap_or(0),
            v.grass_index.unwrap_or(0),
            v.weed_index.unwrap_or(0),
        )
    }
}
