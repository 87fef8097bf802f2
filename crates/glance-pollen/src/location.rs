//! Current location: a static override or an IP lookup, then reverse
//! geocoding to a display name.

use std::future::Future;

use glance_core::{LocationError, ReqwestErrorExt};
use serde::Deserialize;

use crate::geocode::Geocoder;
use crate::types::{PlaceNames, ResolvedLocation};

/// Something that can produce the current coordinates.
pub trait Locator: Send + Sync {
    fn locate(&self) -> impl Future<Output = Result<(f64, f64), LocationError>> + Send;
}

/// Fixed coordinates from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticLocator {
    pub latitude: f64,
    pub longitude: f64,
}

impl StaticLocator {
    pub fn parse(value: &str) -> Result<Self, LocationError> {
        glance_core::config::parse_lat_lon(value)
            .map(|(latitude, longitude)| Self {
                latitude,
                longitude,
            })
            .ok_or_else(|| LocationError::InvalidStatic(value.to_string()))
    }
}

impl Locator for StaticLocator {
    async fn locate(&self) -> Result<(f64, f64), LocationError> {
        tracing::info!("Static location provided");
        Ok((self.latitude, self.longitude))
    }
}

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    #[serde(default)]
    status: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Approximate location from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
}

impl IpLocator {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl Locator for IpLocator {
    async fn locate(&self) -> Result<(f64, f64), LocationError> {
        tracing::info!("Looking up current location");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::ServiceUnavailable(e.into_network_error().to_string()))?;

        if !response.status().is_success() {
            return Err(LocationError::ServiceUnavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let body: GeoIpResponse = response
            .json()
            .await
            .map_err(|e| LocationError::ServiceUnavailable(e.to_string()))?;

        if body.status.as_deref().is_some_and(|s| s != "success") {
            return Err(LocationError::NoPosition);
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(LocationError::NoPosition),
        }
    }
}

/// Either kind of locator, picked from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredLocator {
    Static(StaticLocator),
    Ip(IpLocator),
}

impl Locator for ConfiguredLocator {
    async fn locate(&self) -> Result<(f64, f64), LocationError> {
        match self {
            ConfiguredLocator::Static(l) => l.locate().await,
            ConfiguredLocator::Ip(l) => l.locate().await,
        }
    }
}

/// Resolves the current location to a named place.
pub trait LocationService: Send + Sync {
    /// `fallback` is returned unchanged when the position lookup fails.
    fn resolve(
        &self,
        fallback: Option<&ResolvedLocation>,
    ) -> impl Future<Output = Result<ResolvedLocation, LocationError>> + Send;
}

pub struct DeviceLocation<L> {
    locator: L,
    geocoder: Geocoder,
}

impl<L: Locator> DeviceLocation<L> {
    pub fn new(locator: L, geocoder: Geocoder) -> Self {
        Self { locator, geocoder }
    }
}

impl<L: Locator> LocationService for DeviceLocation<L> {
    async fn resolve(
        &self,
        fallback: Option<&ResolvedLocation>,
    ) -> Result<ResolvedLocation, LocationError> {
        let (latitude, longitude) = match self.locator.locate().await {
            Ok(coords) => coords,
            Err(e) => match fallback {
                Some(previous) => {
                    tracing::warn!("Location lookup failed: {}", e);
                    tracing::info!("Using fallback location instead");
                    return Ok(previous.clone());
                }
                None => return Err(e),
            },
        };

        let names = match self.geocoder.reverse(latitude, longitude).await {
            Some(names) => names,
            None => match fallback {
                Some(previous) if previous.is_near(latitude, longitude) => {
                    tracing::debug!("Keeping cached place names for an unchanged position");
                    previous.names()
                }
                _ => PlaceNames::default(),
            },
        };
        let location = ResolvedLocation::new(latitude, longitude, names);

        tracing::info!("Current location found: '{}'", location.display_location);
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> Geocoder {
        Geocoder::new(reqwest::Client::new(), format!("{}/reverse", server.uri()))
    }

    #[test]
    fn test_static_locator_parse() {
        let l = StaticLocator::parse("51.5074,-0.1278").unwrap();
        assert!((l.latitude - 51.5074).abs() < 1e-9);
        assert!(matches!(
            StaticLocator::parse("somewhere"),
            Err(LocationError::InvalidStatic(_))
        ));
    }

    #[tokio::test]
    async fn test_ip_locator_reads_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success", "lat": 53.48, "lon": -2.24
            })))
            .mount(&server)
            .await;

        let locator = IpLocator::new(reqwest::Client::new(), format!("{}/json", server.uri()));
        assert_eq!(locator.locate().await.unwrap(), (53.48, -2.24));
    }

    #[tokio::test]
    async fn test_ip_locator_fail_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail", "message": "private range"
            })))
            .mount(&server)
            .await;

        let locator = IpLocator::new(reqwest::Client::new(), format!("{}/json", server.uri()));
        assert!(matches!(locator.locate().await, Err(LocationError::NoPosition)));
    }

    #[tokio::test]
    async fn test_resolve_uses_fallback_when_lookup_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let locator = IpLocator::new(reqwest::Client::new(), format!("{}/json", server.uri()));
        let service = DeviceLocation::new(locator, geocoder(&server));

        let previous = ResolvedLocation::new(
            51.5,
            -0.1,
            PlaceNames {
                city: Some("London".into()),
                ..Default::default()
            },
        );
        let resolved = service.resolve(Some(&previous)).await.unwrap();
        assert_eq!(resolved, previous);

        assert!(matches!(
            service.resolve(None).await,
            Err(LocationError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_static_with_geocode_failure_uses_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let locator = StaticLocator::parse("51.5,-0.1").unwrap();
        let service = DeviceLocation::new(locator, geocoder(&server));
        let resolved = service.resolve(None).await.unwrap();
        assert_eq!(resolved.display_location, "51.500, -0.100");
    }

    #[tokio::test]
    async fn test_geocode_failure_keeps_cached_names_nearby() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let previous = ResolvedLocation::new(
            51.4502,
            -2.5801,
            PlaceNames {
                neighborhood: Some("Clifton".into()),
                city: Some("Bristol".into()),
                region: None,
            },
        );

        let here = StaticLocator::parse("51.45,-2.58").unwrap();
        let service = DeviceLocation::new(here, geocoder(&server));
        let resolved = service.resolve(Some(&previous)).await.unwrap();
        assert_eq!(resolved.display_location, "Clifton, Bristol");
        assert_eq!(resolved.latitude, 51.45);

        let london = StaticLocator::parse("51.5,-0.1").unwrap();
        let elsewhere = DeviceLocation::new(london, geocoder(&server));
        let resolved = elsewhere.resolve(Some(&previous)).await.unwrap();
        assert_eq!(resolved.display_location, "51.500, -0.100");
    }
}
