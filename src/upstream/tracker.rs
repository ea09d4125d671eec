// Client for the newer API serving bf2042 and bf6.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{build_client, describe, fetch_json, Params};
use crate::error::PluginError;

#[derive(Clone)]
pub struct TrackerClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl TrackerClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            timeout,
        }
    }

    /// `GET <base><path>`. Either `player_name` or `pider` must be non-empty;
    /// whichever is missing is sent as an empty string.
    pub async fn get(&self, path: &str, params: Params) -> Result<Value, PluginError> {
        let params = normalize_identity(params)?;
        let url = format!("{}{}", self.base_url, path);
        tracing::info!(
            "Requesting tracker API: {url}, params: {}, api key attached: {}",
            describe(&params),
            self.api_key.is_some()
        );

        let mut request = self.client.get(&url).query(&params);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }
        let (status, body) = fetch_json("tracker", request, self.timeout).await?;
        if status != 200 {
            tracing::error!("Tracker API returned {status}: {body}");
            return Err(PluginError::Api {
                status,
                body: body.to_string(),
            });
        }
        Ok(body)
    }
}

fn normalize_identity(mut params: Params) -> Result<Params, PluginError> {
    let filled = |params: &Params, key: &str| {
        params
            .iter()
            .any(|(k, v)| *k == key && !v.trim().is_empty())
    };
    if !filled(&params, "player_name") && !filled(&params, "pider") {
        return Err(PluginError::InvalidParameter {
            parameter: "ea_name or pider".to_string(),
            value: None,
            expected: None,
        });
    }
    for key in ["player_name", "pider"] {
        if !params.iter().any(|(k, _)| *k == key) {
            params.push((key, String::new()));
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_required() {
        let err = normalize_identity(vec![("game", "bf6".into())]).unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMETER");
        assert!(err.user_message().contains("ea_name or pider"));

        let err = normalize_identity(vec![("player_name", " ".into())]).unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_missing_identity_half_is_sent_empty() {
        let params = normalize_identity(vec![("player_name", "Shadow".into())]).unwrap();
        assert!(params.contains(&("pider", String::new())));

        let params = normalize_identity(vec![("pider", "1001".into())]).unwrap();
        assert!(params.contains(&("player_name", String::new())));
    }

    #[tokio::test]
    async fn test_rejects_before_calling_out() {
        // The host is never contacted, so an unroutable one is fine.
        let client = TrackerClient::new("http://127.0.0.1:9", Some(String::new()), Duration::from_secs(1));
        assert!(client.api_key.is_none());
        let err = client.get("/bf6/stat", vec![]).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMETER");
    }
}
