//! Shared plumbing for the Glance widgets: configuration, the error taxonomy,
//! the JSON cache store and logging bootstrap.

pub mod cache;
pub mod config;
pub mod error;
pub mod http;

pub use cache::{CacheRecord, CacheStore};
pub use config::{
    Appearance, Config, LocationConfig, MobileConfig, PollenConfig, ValidationResult,
};
pub use error::{
    CacheError, ConfigError, DataShapeError, LocationError, NetworkError, ReqwestErrorExt,
    WidgetError,
};
pub use http::{http_client, read_json};

use anyhow::Result;

/// Initialize logging. `RUST_LOG` overrides the default `info` level.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::debug!("Glance core initialized");
    Ok(())
}
