//! Pollen widget: assembles the view from cached or fetched data.

use std::time::Duration;

use chrono::{DateTime, Local, Timelike};
use glance_core::{http_client, Appearance, CacheStore, Config, WidgetError};
use glance_render::{
    line_chart, stepped, Background, ChartStyle, FontWeight, Icon, IconView, TextLine,
    WidgetContent, WidgetView,
};

use crate::client::{ForecastSource, PollenClient};
use crate::data::{PollenData, PollenRecord, CACHE_NAMESPACE};
use crate::geocode::Geocoder;
use crate::location::{ConfiguredLocator, DeviceLocation, IpLocator, LocationService, StaticLocator};
use crate::theme::level_theme;

pub const HEADER: &str = "POLLEN LEVEL";

const HEADER_SIZE: f64 = 22.0;
const VALUE_SIZE: f64 = 40.0;
const ICON_SIZE: f64 = 40.0;
const LOCATION_SIZE: f64 = 20.0;
const UPDATED_SIZE: f64 = 16.0;

pub type DefaultPollenWidget = PollenWidget<DeviceLocation<ConfiguredLocator>, PollenClient>;

pub struct PollenWidget<L, S> {
    data: PollenData<L, S>,
    appearance: Appearance,
    tap_url: String,
}

impl DefaultPollenWidget {
    /// Build the widget with live HTTP services. Fails if the API key is not set.
    pub fn from_config(config: &Config) -> Result<Self, WidgetError> {
        config.pollen.require()?;

        let client = http_client(Duration::from_secs(config.request_timeout_secs))?;
        let locator = match config.pollen.static_lat_lon.trim() {
            "" => ConfiguredLocator::Ip(IpLocator::new(client.clone(), &config.location.geoip_url)),
            value => match StaticLocator::parse(value) {
                Ok(l) => ConfiguredLocator::Static(l),
                Err(e) => {
                    tracing::warn!("{}, looking location up instead", e);
                    ConfiguredLocator::Ip(IpLocator::new(
                        client.clone(),
                        &config.location.geoip_url,
                    ))
                }
            },
        };
        let geocoder = Geocoder::new(client.clone(), &config.location.geocode_url);
        let source = PollenClient::new(client, &config.pollen.api_url, &config.pollen.api_key);
        let store = CacheStore::new(&config.cache_root(), CACHE_NAMESPACE);

        Ok(Self::new(
            PollenData::new(store, DeviceLocation::new(locator, geocoder), source),
            config.appearance,
            config.pollen.tap_url.clone(),
        ))
    }
}

impl<L: LocationService, S: ForecastSource> PollenWidget<L, S> {
    pub fn new(data: PollenData<L, S>, appearance: Appearance, tap_url: String) -> Self {
        Self {
            data,
            appearance,
            tap_url,
        }
    }

    pub async fn build(&self, now: DateTime<Local>) -> Result<WidgetView, WidgetError> {
        let record = self.data.load(now).await?;
        pollen_view(&record, now, self.appearance, &self.tap_url)
    }

    /// Never fails: errors become the error view.
    pub async fn render(&self, now: DateTime<Local>) -> WidgetView {
        match self.build(now).await {
            Ok(view) => view,
            Err(e) => {
                tracing::error!("Could not render widget: {}", e);
                WidgetView::failure(&e, self.appearance)
            }
        }
    }
}

/// Lay out the widget for a loaded record.
pub fn pollen_view(
    record: &PollenRecord,
    now: DateTime<Local>,
    appearance: Appearance,
    tap_url: &str,
) -> Result<WidgetView, WidgetError> {
    let forecast = &record.payload.todays_pollen;
    let level = forecast.current_index(now)?;
    let theme = level_theme(level);
    tracing::info!("Current pollen level {} ({})", level, theme.label);

    let text_color = theme.text.resolve(appearance);
    let hours_past_midnight = f64::from(now.hour()) + f64::from(now.minute()) / 60.0;
    let chart = line_chart(
        &stepped(&forecast.levels),
        &ChartStyle::pollen(text_color),
        hours_past_midnight,
    );

    let updated = record.updated_time.format("%-I:%M %p").to_string();

    let content = WidgetContent {
        text_color,
        header: TextLine::regular(HEADER, HEADER_SIZE),
        value: TextLine::new(theme.label, VALUE_SIZE, FontWeight::Semibold),
        icon: IconView {
            icon: Icon::Symbol(theme.symbol),
            tint: text_color,
            size: ICON_SIZE,
        },
        graphic: chart,
        footer: vec![
            TextLine::regular(record.payload.my_location.display_location.clone(), LOCATION_SIZE),
            TextLine::regular(format!("Updated {}", updated), UPDATED_SIZE),
        ],
    };

    let background = Background::Gradient {
        start: theme.gradient_start.resolve(appearance),
        end: theme.gradient_end.resolve(appearance),
    };
    Ok(WidgetView::content(background, content, Some(tap_url.to_string())))
}

/// Build and render the pollen widget for `config`.
pub async fn render(config: &Config, now: DateTime<Local>) -> WidgetView {
    match DefaultPollenWidget::from_config(config) {
        Ok(widget) => widget.render(now).await,
        Err(e) => {
            tracing::error!("Could not render widget: {}", e);
            WidgetView::failure(&e, config.appearance)
        }
    }
}
