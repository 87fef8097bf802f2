//! Mobile data widget: remaining allowance as a gauge.

use std::time::Duration;

use chrono::{DateTime, Local};
use glance_core::{http_client, Appearance, CacheStore, Config, WidgetError};
use glance_render::{
    gauge, Background, FontWeight, GaugeStyle, Icon, IconView, TextLine, WidgetContent,
    WidgetView,
};

use crate::client::{MobileClient, UsageSource};
use crate::data::{MobileData, MobileRecord, CACHE_NAMESPACE};
use crate::theme::{mobile_theme, ICON_PNG_BASE64};
use crate::types::UsageSnapshot;

pub const HEADER: &str = "MOBILE DATA";

const HEADER_SIZE: f64 = 24.0;
const VALUE_SIZE: f64 = 36.0;
const ICON_SIZE: f64 = 40.0;
const FOOTER_SIZE: f64 = 16.0;

pub struct MobileWidget<S> {
    data: MobileData<S>,
    appearance: Appearance,
    tap_url: String,
}

impl MobileWidget<MobileClient> {
    /// Build the widget with the live carrier client. Fails on the first
    /// missing credential.
    pub fn from_config(config: &Config) -> Result<Self, WidgetError> {
        config.mobile.require()?;

        let client = http_client(Duration::from_secs(config.request_timeout_secs))?;
        let source = MobileClient::new(client, &config.mobile)?;
        let store = CacheStore::new(&config.cache_root(), CACHE_NAMESPACE);

        Ok(Self::new(
            MobileData::new(store, source),
            config.appearance,
            config.mobile.tap_url.clone(),
        ))
    }
}

impl<S: UsageSource> MobileWidget<S> {
    pub fn new(data: MobileData<S>, appearance: Appearance, tap_url: String) -> Self {
        Self {
            data,
            appearance,
            tap_url,
        }
    }

    pub async fn build(&self, now: DateTime<Local>) -> Result<WidgetView, WidgetError> {
        let record = self.data.load(now).await?;
        mobile_view(&record, now, self.appearance, &self.tap_url)
    }

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

pub fn mobile_view(
    record: &MobileRecord,
    now: DateTime<Local>,
    appearance: Appearance,
    tap_url: &str,
) -> Result<WidgetView, WidgetError> {
    let snapshot = UsageSnapshot::from_usage(&record.payload.mobile_usage)?;
    let percentage = snapshot.percentage();
    let days = snapshot.days_remaining(&now);
    tracing::info!(
        "{} remaining ({}%), {} days left in period",
        snapshot.remaining_text(),
        percentage,
        days
    );

    let theme = mobile_theme();
    let text_color = theme.text.resolve(appearance);
    let gradient_end = theme.gradient_end.resolve(appearance);

    let style = GaugeStyle::standard(gradient_end, theme.gauge.resolve(appearance), text_color);

    let content = WidgetContent {
        text_color,
        header: TextLine::regular(HEADER, HEADER_SIZE),
        value: TextLine::new(snapshot.remaining_text(), VALUE_SIZE, FontWeight::Semibold),
        icon: IconView {
            icon: Icon::TemplatePng(ICON_PNG_BASE64),
            tint: theme.icon.resolve(appearance),
            size: ICON_SIZE,
        },
        graphic: gauge(percentage, &style),
        footer: vec![TextLine::regular(format!("{} days to go", days), FOOTER_SIZE)],
    };

    let background = Background::Gradient {
        start: theme.gradient_start.resolve(appearance),
        end: gradient_end,
    };
    Ok(WidgetView::content(background, content, Some(tap_url.to_string())))
}

/// Build and render the mobile data widget for `config`.
pub async fn render(config: &Config, now: DateTime<Local>) -> WidgetView {
    match MobileWidget::from_config(config) {
        Ok(widget) => widget.render(now).await,
        Err(e) => {
            tracing::error!("Could not render widget: {}", e);
            WidgetView::failure(&e, config.appearance)
        }
    }
}
