use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use url::Url;

use crate::error::ConfigError;

pub const POLLEN_API_KEY_PLACEHOLDER: &str = "your-api-key-goes-here";
pub const MOBILE_NUMBER_PLACEHOLDER: &str = "your-mobile-number-no-spaces";
pub const MOBILE_API_KEY_PLACEHOLDER: &str = "your-api-key";
pub const MOBILE_AUTH_TOKEN_PLACEHOLDER: &str = "your-auth-token";

/// Strict `lat,lon` pattern: latitude in [-90, 90], longitude in [-180, 180].
const LAT_LON_PATTERN: &str = r"^[-+]?([1-8]?\d(\.\d+)?|90(\.0+)?),\s*[-+]?(180(\.0+)?|((1[0-7]\d)|([1-9]?\d))(\.\d+)?)$";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Light or dark rendering of the widget themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for widget caches. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    #[serde(default)]
    pub appearance: Appearance,

    /// Timeout applied to every HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub pollen: PollenConfig,

    #[serde(default)]
    pub mobile: MobileConfig,

    #[serde(default)]
    pub location: LocationConfig,
}

fn default_request_timeout_secs() -> u64 {
    10
}

const POLLEN_TAP_URL: &str =
    "https://www.metoffice.gov.uk/weather/warnings-and-advice/seasonal-advice/pollen-forecast";

/// tomorrow.io pollen widget settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollenConfig {
    pub api_key: String,
    pub api_url: String,
    /// `lat,lon` to skip location lookup entirely. Empty to disable.
    pub static_lat_lon: String,
    /// Opened when the widget is tapped
    pub tap_url: String,
}

impl Default for PollenConfig {
    fn default() -> Self {
        Self {
            api_key: POLLEN_API_KEY_PLACEHOLDER.to_string(),
            api_url: "https://api.tomorrow.io/v4".to_string(),
            static_lat_lon: String::new(),
            tap_url: POLLEN_TAP_URL.to_string(),
        }
    }
}

impl PollenConfig {
    /// Fails with the first required setting that is missing.
    pub fn require(&self) -> Result<(), ConfigError> {
        if is_unset(&self.api_key, POLLEN_API_KEY_PLACEHOLDER) {
            return Err(ConfigError::missing(
                "pollen.api_key",
                "You need a tomorrow.io API key for this widget.",
            ));
        }
        Ok(())
    }

    /// Parsed static coordinates, if a valid override is set.
    ///
    /// An override that does not match the strict range pattern is ignored so
    /// the widget falls back to looking the location up.
    pub fn static_coordinates(&self) -> Option<(f64, f64)> {
        parse_lat_lon(&self.static_lat_lon)
    }
}

/// Mobile carrier usage widget settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileConfig {
    pub mobile_number: String,
    pub api_key: String,
    pub auth_token: String,
    pub api_url: String,
    pub tap_url: String,
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self {
            mobile_number: MOBILE_NUMBER_PLACEHOLDER.to_string(),
            api_key: MOBILE_API_KEY_PLACEHOLDER.to_string(),
            auth_token: MOBILE_AUTH_TOKEN_PLACEHOLDER.to_string(),
            api_url: "https://api.tescomobile.com".to_string(),
            tap_url: "https://www.tescomobile.com/customer/account".to_string(),
        }
    }
}

impl MobileConfig {
    /// Fails with the first required setting that is missing.
    pub fn require(&self) -> Result<(), ConfigError> {
        if is_unset(&self.mobile_number, MOBILE_NUMBER_PLACEHOLDER) {
            return Err(ConfigError::missing(
                "mobile.mobile_number",
                "You need to provide your mobile number.",
            ));
        }
        if is_unset(&self.api_key, MOBILE_API_KEY_PLACEHOLDER) {
            return Err(ConfigError::missing(
                "mobile.api_key",
                "You need to provide a tescomobile.com API key.",
            ));
        }
        if is_unset(&self.auth_token, MOBILE_AUTH_TOKEN_PLACEHOLDER) {
            return Err(ConfigError::missing(
                "mobile.auth_token",
                "You need to provide a tescomobile.com auth token.",
            ));
        }
        Ok(())
    }
}

/// Location lookup services used by the pollen widget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// IP geolocation endpoint returning `{ "lat": .., "lon": .. }`
    pub geoip_url: String,
    /// Nominatim-compatible reverse geocoding endpoint
    pub geocode_url: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            geoip_url: "http://ip-api.com/json".to_string(),
            geocode_url: "https://nominatim.openstreetmap.org/reverse".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            appearance: Appearance::default(),
            request_timeout_secs: default_request_timeout_secs(),
            pollen: PollenConfig::default(),
            mobile: MobileConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Wrote default configuration to {}", config_path.display());
            return Ok(config.with_env_overrides());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        Ok(config.with_env_overrides())
    }

    /// Secrets may be supplied through the environment instead of the file.
    fn with_env_overrides(mut self) -> Self {
        let overrides: [(&str, &mut String); 4] = [
            ("GLANCE_POLLEN_API_KEY", &mut self.pollen.api_key),
            ("GLANCE_MOBILE_API_KEY", &mut self.mobile.api_key),
            ("GLANCE_MOBILE_AUTH_TOKEN", &mut self.mobile.auth_token),
            ("GLANCE_MOBILE_NUMBER", &mut self.mobile.mobile_number),
        ];
        for (var, field) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    tracing::debug!("Using {} from environment", var);
                    *field = value;
                }
            }
        }
        self
    }

    /// Validate the configuration
    ///
    /// Unset credentials are warnings here; each widget enforces its own with
    /// `require()` when it runs.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.pollen.api_url, "pollen.api_url", &mut result);
        validate_url(&self.pollen.tap_url, "pollen.tap_url", &mut result);
        validate_url(&self.mobile.api_url, "mobile.api_url", &mut result);
        validate_url(&self.mobile.tap_url, "mobile.tap_url", &mut result);
        validate_url(&self.location.geoip_url, "location.geoip_url", &mut result);
        validate_url(&self.location.geocode_url, "location.geocode_url", &mut result);

        if self.request_timeout_secs == 0 {
            result.add_error("request_timeout_secs", "Timeout must be greater than 0");
        } else if self.request_timeout_secs > 120 {
            result.add_warning("request_timeout_secs", "Timeout is unusually long (>120s)");
        }

        if !self.pollen.static_lat_lon.trim().is_empty()
            && self.pollen.static_coordinates().is_none()
        {
            result.add_warning(
                "pollen.static_lat_lon",
                format!(
                    "'{}' is not a valid lat,lon pair - location lookup will be used",
                    self.pollen.static_lat_lon
                ),
            );
        }

        if let Err(e) = self.pollen.require() {
            result.add_warning("pollen", e.to_string());
        }
        if let Err(e) = self.mobile.require() {
            result.add_warning("mobile", e.to_string());
        }

        result
    }

    /// Root directory under which each widget keeps its cache namespace.
    pub fn cache_root(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("glance")
        })
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("glance");

        Ok(config_dir.join("config.toml"))
    }
}

fn is_unset(value: &str, placeholder: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == placeholder
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }
            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

fn lat_lon_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LAT_LON_PATTERN).ok()).as_ref()
}

/// Parse a strict `lat,lon` string.
pub fn parse_lat_lon(value: &str) -> Option<(f64, f64)> {
    let value = value.trim();
    if !lat_lon_regex()?.is_match(value) {
        return None;
    }
    let (lat, lon) = value.split_once(',')?;
    Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
}
