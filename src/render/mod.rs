// HTML card rendering: templates, text-mode narratives and the image service.

pub mod narrative;
pub mod templates;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::PluginError;
use crate::metrics::RENDERS_TOTAL;

// ── Clip heights ──────────────────────────────────────────────────────

pub const CLIP_SUMMARY: u32 = 2353;
pub const CLIP_LEGACY_LIST: u32 = 10000;
pub const CLIP_TRACKER_LIST: u32 = 20000;
pub const CLIP_SOLDIERS: u32 = 10000;
const CLIP_WIDTH: u32 = 700;
const RENDER_TIMEOUT_MS: u64 = 10_000;

/// Short server lists get a tighter clip.
pub fn server_clip_height(count: usize) -> u32 {
    match count {
        1 => 500,
        2 => 670,
        _ => 10000,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Clip {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub quality: u8,
    pub timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<Clip>,
}

impl RenderOptions {
    pub fn new(quality: u8, clip_height: Option<u32>) -> Self {
        Self {
            quality,
            timeout: RENDER_TIMEOUT_MS,
            clip: clip_height.map(|height| Clip {
                x: 0,
                y: 0,
                width: CLIP_WIDTH,
                height,
            }),
        }
    }
}

/// Turns an HTML document into a hosted image and returns its URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HtmlRenderer: Send + Sync {
    async fn render(&self, html: &str, options: &RenderOptions) -> Result<String, PluginError>;
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    html: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    options: &'a RenderOptions,
}

#[derive(Deserialize)]
struct RenderResponse {
    url: String,
}

/// Client for an HTTP rendering service: `POST <base>/render` with the
/// document and options, answered by `{"url": "..."}`.
#[derive(Clone)]
pub struct HttpRenderer {
    client: Client,
    base_url: String,
}

impl HttpRenderer {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(RENDER_TIMEOUT_MS + 5_000))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, html: &str, options: &RenderOptions) -> Result<String, PluginError> {
        let response = self
            .client
            .post(format!("{}/render", self.base_url))
            .json(&RenderRequest {
                html,
                kind: "jpeg",
                options,
            })
            .send()
            .await
            .map_err(|e| PluginError::ImageGeneration(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PluginError::ImageGeneration(format!(
                "render service returned {status}: {body}"
            )));
        }
        let body: RenderResponse = response
            .json()
            .await
            .map_err(|e| PluginError::ImageGeneration(format!("bad render response: {e}")))?;
        Ok(body.url)
    }
}

#[async_trait]
impl HtmlRenderer for HttpRenderer {
    async fn render(&self, html: &str, options: &RenderOptions) -> Result<String, PluginError> {
        let result = self.post(html, options).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        RENDERS_TOTAL.with_label_values(&[outcome]).inc();
        result
    }
}

/// Stands in when no rendering service is configured.
pub struct UnconfiguredRenderer;

#[async_trait]
impl HtmlRenderer for UnconfiguredRenderer {
    async fn render(&self, _html: &str, _options: &RenderOptions) -> Result<String, PluginError> {
        RENDERS_TOTAL.with_label_values(&["unconfigured"]).inc();
        Err(PluginError::Configuration(
            "RENDER_SERVICE_URL is not set".to_string(),
        ))
    }
}
