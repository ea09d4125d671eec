// Client for the legacy API serving bf4, bf1 and bfv.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{build_client, describe, fetch_json, Params};
use crate::error::PluginError;
use crate::game::Game;

/// The legacy API reports "player not found" as an ordinary reply, so a
/// non-200 status is data for the caller rather than an error.
#[derive(Debug, Clone)]
pub enum LegacyResponse {
    /// Decoded body with `"code": 200` injected.
    Ok(Value),
    Rejected { status: u16, body: Value },
}

#[derive(Clone)]
pub struct GametoolsClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GametoolsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// `GET <base>/<game>/<prop>`.
    pub async fn get(
        &self,
        game: Game,
        prop: &str,
        params: &Params,
    ) -> Result<LegacyResponse, PluginError> {
        let url = format!("{}/{}/{}", self.base_url, game.code(), prop);
        tracing::info!("Requesting gametools API: {url}, params: {}", describe(params));

        let request = self.client.get(&url).query(params);
        let (status, mut body) = fetch_json("gametools", request, self.timeout).await?;
        if status != 200 {
            tracing::error!("Gametools API returned {status}: {body}");
            return Ok(LegacyResponse::Rejected { status, body });
        }
        if let Value::Object(map) = &mut body {
            map.insert("code".to_string(), Value::from(200));
        }
        Ok(LegacyResponse::Ok(body))
    }
}

impl LegacyResponse {
    /// Upstream's own error text, for logs.
    pub fn detail(&self) -> String {
        match self {
            LegacyResponse::Ok(_) => String::new(),
            LegacyResponse::Rejected { body, .. } => body
                .get("errors")
                .map(|e| e.to_string())
                .unwrap_or_else(|| body.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejected_detail_prefers_errors_field() {
        let rejected = LegacyResponse::Rejected {
            status: 404,
            body: json!({"errors": ["player not found"]}),
        };
        assert_eq!(rejected.detail(), "[\"player not found\"]");

        let raw = LegacyResponse::Rejected {
            status: 500,
            body: Value::String("oops".into()),
        };
        assert_eq!(raw.detail(), "\"oops\"");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GametoolsClient::new("https://api.gametools.network/", Duration::from_secs(5));
        assert_eq!(client.base_url, "https://api.gametools.network");
    }
}
