// HTTP clients for the two upstream statistics services.

pub mod gametools;
pub mod tracker;

pub use gametools::{GametoolsClient, LegacyResponse};
pub use tracker::TrackerClient;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use crate::error::PluginError;
use crate::metrics::{UPSTREAM_REQUESTS_TOTAL, UPSTREAM_REQUEST_DURATION_SECONDS};

/// Query parameters in upstream order.
pub type Params = Vec<(&'static str, String)>;

pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Send a request and decode the body as JSON, whatever the status.
///
/// A body that is not JSON is an error on success and kept as a plain
/// string on failure, so callers can still report it.
pub(crate) async fn fetch_json(
    backend: &'static str,
    request: RequestBuilder,
    timeout: Duration,
) -> Result<(u16, Value), PluginError> {
    let timer = UPSTREAM_REQUEST_DURATION_SECONDS
        .with_label_values(&[backend])
        .start_timer();
    let result = send(request, timeout).await;
    timer.observe_duration();

    let outcome = match &result {
        Ok((200, _)) => "ok".to_string(),
        Ok((status, _)) => format!("http_{status}"),
        Err(PluginError::Timeout(_)) => "timeout".to_string(),
        Err(PluginError::Parse(_)) => "bad_json".to_string(),
        Err(_) => "network".to_string(),
    };
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[backend, &outcome])
        .inc();
    result
}

async fn send(request: RequestBuilder, timeout: Duration) -> Result<(u16, Value), PluginError> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| map_transport_error(e, timeout))?;
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| map_transport_error(e, timeout))?;

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => Ok((status, body)),
        Err(_) if status != 200 => Ok((status, Value::String(text))),
        Err(e) => {
            tracing::error!("Upstream returned invalid JSON: {e}");
            Err(PluginError::Parse(format!("invalid JSON: {e}")))
        }
    }
}

fn map_transport_error(e: reqwest::Error, timeout: Duration) -> PluginError {
    if e.is_timeout() {
        tracing::error!("Upstream request timed out after {}s", timeout.as_secs());
        PluginError::Timeout(timeout.as_secs())
    } else {
        tracing::error!("Upstream request failed: {e}");
        PluginError::Network(e.to_string())
    }
}

/// Render parameters for the request log line.
pub(crate) fn describe(params: &[(&'static str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
