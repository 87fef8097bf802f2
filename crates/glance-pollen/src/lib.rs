//! Pollen level widget backed by the tomorrow.io timelines API.
//!
//! The forecast for the current location is cached for the day and only
//! refetched when it ages out or the location changes.

pub mod client;
pub mod data;
pub mod geocode;
pub mod location;
pub mod policy;
pub mod theme;
pub mod types;
pub mod widget;

pub use client::{ForecastSource, PollenClient};
pub use data::{PollenData, PollenRecord};
pub use location::{DeviceLocation, IpLocator, LocationService, Locator, StaticLocator};
pub use types::{HourlyInterval, PlaceNames, PollenForecast, PollenPayload, ResolvedLocation};
pub use widget::{pollen_view, render, PollenWidget};
