//! Mobile carrier allowance client.
//!
//! The usage endpoint is the one the carrier's iOS app calls, so requests
//! carry the same client identification headers.

use std::future::Future;

use glance_core::{read_json, MobileConfig, WidgetError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::instrument;

use crate::types::MobileUsage;

const APP_HEADERS: [(&str, &str); 9] = [
    ("Cache-Control", "no-cache"),
    ("Accept", "*/*"),
    ("clientId", "com.tescoMobile.ios.app"),
    ("Accept-Language", "en-GB,en;q=0.9"),
    ("clientAppVersion", "6.26.0(5063)"),
    ("User-Agent", "Tesco%20Mobile/5063 CFNetwork/1474 Darwin/23.0.0"),
    ("clientOSVersion", "17.0.3"),
    ("deviceType", "iPhone14,4"),
    ("clientOSName", "iOS"),
];

/// Source of the current usage document.
pub trait UsageSource: Send + Sync {
    fn fetch_usage(&self) -> impl Future<Output = Result<MobileUsage, WidgetError>> + Send;
}

pub struct MobileClient {
    client: reqwest::Client,
    url: String,
    headers: HeaderMap,
}

impl MobileClient {
    pub fn new(client: reqwest::Client, config: &MobileConfig) -> Result<Self, WidgetError> {
        let url = format!(
            "{}/app/accounts/v2/subscriptions/{}/allowance_usage_and_charges",
            config.api_url.trim_end_matches('/'),
            config.mobile_number.trim()
        );

        Ok(Self {
            client,
            url,
            headers: request_headers(&config.api_key, &config.auth_token)?,
        })
    }
}

impl UsageSource for MobileClient {
    #[instrument(skip(self), level = "info")]
    async fn fetch_usage(&self) -> Result<MobileUsage, WidgetError> {
        tracing::info!("Requesting allowance usage");
        tracing::debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .headers(self.headers.clone())
            .send()
            .await?;

        read_json(response, "allowance usage").await
    }
}

fn request_headers(api_key: &str, auth_token: &str) -> Result<HeaderMap, WidgetError> {
    let mut headers = HeaderMap::new();
    for (name, value) in APP_HEADERS {
        headers.insert(header_name(name)?, header_value(name, value)?);
    }
    headers.insert(header_name("apiKey")?, header_value("apiKey", api_key)?);

    let mut auth = header_value("Authorization", &format!("Bearer {}", auth_token))?;
    auth.set_sensitive(true);
    headers.insert(reqwest::header::AUTHORIZATION, auth);

    Ok(headers)
}

fn header_name(name: &str) -> Result<HeaderName, WidgetError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| glance_core::ConfigError::Invalid(format!("header {}: {}", name, e)).into())
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, WidgetError> {
    HeaderValue::from_str(value.trim()).map_err(|_| {
        glance_core::ConfigError::Invalid(format!(
            "{} contains characters not allowed in a header",
            name
        ))
        .into()
    })
}
