//! Reverse geocoding: coordinates to neighbourhood, city and region names.
//! Uses Nominatim (OpenStreetMap), which needs no API key.

use serde::Deserialize;

use crate::types::PlaceNames;

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    suburb: Option<String>,
    neighbourhood: Option<String>,
    quarter: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state: Option<String>,
    county: Option<String>,
}

impl NominatimAddress {
    fn into_names(self) -> PlaceNames {
        PlaceNames {
            neighborhood: self.suburb.or(self.neighbourhood).or(self.quarter),
            city: self
                .city
                .or(self.town)
                .or(self.village)
                .or(self.municipality),
            region: self.state.or(self.county),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    url: String,
}

impl Geocoder {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Look up place names for a position.
    /// Returns `None` on any failure; the caller falls back to coordinates.
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Option<PlaceNames> {
        let response = match self
            .client
            .get(&self.url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "14".to_string()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        let names = body.address?.into_names();
        tracing::debug!("Reverse geocoded to {:?}", names);
        Some(names)
    }
}
