//! HTTP helpers shared by the widget fetchers.

use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{DataShapeError, NetworkError, ReqwestErrorExt, WidgetError};

/// HTTP client shared by every fetcher of a single run.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, WidgetError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("glance/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Decode a JSON response body into `T`.
///
/// A non-2xx status is a [`NetworkError::ServerError`], a body that is not
/// JSON is a [`NetworkError::InvalidResponse`], and JSON that does not fit `T`
/// is a [`DataShapeError::Malformed`] naming `what`.
pub async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &'static str,
) -> Result<T, WidgetError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(ReqwestErrorExt::into_network_error)?;

    if !status.is_success() {
        tracing::warn!("{} request failed with status {}", what, status);
        return Err(NetworkError::ServerError {
            status: status.as_u16(),
            message: truncate(&body, 200),
        }
        .into());
    }

    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| NetworkError::InvalidResponse(format!("{} is not JSON: {}", what, e)))?;

    serde_json::from_value(value).map_err(|e| {
        DataShapeError::Malformed {
            what,
            detail: e.to_string(),
        }
        .into()
    })
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
