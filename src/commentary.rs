// Match commentary from an OpenAI-compatible text-generation service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::PluginError;
use crate::metrics::COMMENTARY_FALLBACKS_TOTAL;
use crate::models::MatchReport;

/// Separates the headline from the body in a commentary reply.
pub const DELIMITER: &str = "&&&";

pub const SYSTEM_PROMPT: &str = "You are a front-line reporter for a Battlefield game. From the \
match data below write a headline and an article, punchy and eye-catching. Treat K/D below 2 or \
KPM below 1 as a weak performance, except in battle-royale modes, and feel free to tease weak \
players. Separate the headline and the article with '&&&'. Keep it between 500 and 800 \
characters, in plain text without markdown. Write the player name exactly as given, never \
translated.";

const GENERATION_TIMEOUT_SECS: u64 = 60;

/// Produces free text for a prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, PluginError>;
}

/// Headline and article shown on the recent-match card. Both are empty when
/// generation is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commentary {
    pub title: String,
    pub body: String,
}

impl Commentary {
    /// Split a reply at the first delimiter; without one there is no commentary.
    pub fn parse(reply: &str) -> Option<Self> {
        let (title, body) = reply.trim().split_once(DELIMITER)?;
        Some(Commentary {
            title: title.trim().to_string(),
            body: body.trim().to_string(),
        })
    }
}

/// Describe a match for the reporter prompt.
pub fn build_prompt(report: &MatchReport) -> String {
    let stats = &report.stats;
    let mut prompt = format!("Player {}", stats.user_name);
    if !report.map_total.is_empty() {
        prompt.push_str(&format!(" recently played {}", report.map_total));
    }
    prompt.push_str(&format!(
        ", killed {} enemies of which {} were players, {} kills per minute, K/D {}, \
         {} deaths, {} assists and {} vehicles destroyed.",
        stats.kills,
        stats.player_kills,
        stats.kills_per_minute,
        stats.kill_death,
        stats.deaths,
        stats.assists,
        stats.vehicles_destroyed
    ));
    for mode in &report.modes {
        prompt.push_str(&format!(
            " Mode {}: {} won, {} lost.",
            mode.name, mode.matches_won, mode.matches_lost
        ));
    }
    for soldier in &report.soldiers {
        prompt.push_str(&format!(
            " As {} killed {}, K/D {}, {} deaths, {} assists, {} revives.",
            soldier.name,
            soldier.kills,
            soldier.kd_ratio,
            soldier.deaths,
            soldier.assists,
            soldier.revives
        ));
    }
    for weapon in &report.weapons {
        prompt.push_str(&format!(
            " With the {} {} killed {}, {} per minute, {} damage, headshot rate {}.",
            weapon.category,
            weapon.name,
            weapon.kills,
            weapon.kills_per_minute,
            weapon.damage_dealt,
            weapon.headshot_percentage
        ));
    }
    for vehicle in &report.vehicles {
        prompt.push_str(&format!(
            " In the {} {} killed {}, {} per minute, destroyed {} vehicles.",
            vehicle.category, vehicle.name, vehicle.kills, vehicle.kills_per_minute, vehicle.destroyed
        ));
    }
    prompt
}

/// Ask for commentary once. Any failure degrades to empty parts.
pub async fn commentate(writer: &dyn TextGenerator, report: &MatchReport) -> Commentary {
    let reply = match writer.generate(SYSTEM_PROMPT, &build_prompt(report)).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(code = e.code(), "Commentary generation failed: {}", e);
            COMMENTARY_FALLBACKS_TOTAL.inc();
            return Commentary::default();
        }
    };
    Commentary::parse(&reply).unwrap_or_else(|| {
        tracing::warn!("Commentary reply has no delimiter");
        COMMENTARY_FALLBACKS_TOTAL.inc();
        Commentary::default()
    })
}

// ── OpenAI-compatible client ──────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(GENERATION_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, system_prompt: &str, prompt: &str) -> Result<String, PluginError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| PluginError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PluginError::Api { status, body });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| PluginError::Parse(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PluginError::Parse("empty completion".to_string()))
    }
}

/// Stands in when no provider is configured.
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn generate(&self, _system_prompt: &str, _prompt: &str) -> Result<String, PluginError> {
        Err(PluginError::ProviderNotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerStats;

    fn report() -> MatchReport {
        MatchReport {
            stats: PlayerStats {
                user_name: "Shadow".to_string(),
                kills: "31".to_string(),
                ..PlayerStats::default()
            },
            weapons: Vec::new(),
            vehicles: Vec::new(),
            soldiers: Vec::new(),
            modes: Vec::new(),
            maps: Vec::new(),
            map_total: "开罗围城 1 W-0 L".to_string(),
            wins: 1,
            losses: 0,
            matches: 1,
            timestamp: "--".to_string(),
        }
    }

    #[test]
    fn test_parse_splits_once() {
        let parsed = Commentary::parse(" Big win &&& He carried &&& again ").unwrap();
        assert_eq!(parsed.title, "Big win");
        assert_eq!(parsed.body, "He carried &&& again");
        assert_eq!(Commentary::parse("no delimiter here"), None);
    }

    #[test]
    fn test_prompt_mentions_player_and_maps() {
        let prompt = build_prompt(&report());
        assert!(prompt.starts_with("Player Shadow recently played 开罗围城 1 W-0 L"));
        assert!(prompt.contains("killed 31 enemies"));
    }

    #[tokio::test]
    async fn test_commentate_uses_reply() {
        let mut writer = MockTextGenerator::new();
        writer
            .expect_generate()
            .withf(|system, _| system == SYSTEM_PROMPT)
            .times(1)
            .returning(|_, _| Ok("Title&&&Body".to_string()));
        let commentary = commentate(&writer, &report()).await;
        assert_eq!(commentary.title, "Title");
        assert_eq!(commentary.body, "Body");
    }

    #[tokio::test]
    async fn test_commentate_falls_back_to_empty() {
        let mut writer = MockTextGenerator::new();
        writer
            .expect_generate()
            .times(1)
            .returning(|_, _| Err(PluginError::Timeout(60)));
        assert_eq!(commentate(&writer, &report()).await, Commentary::default());

        let mut writer = MockTextGenerator::new();
        writer
            .expect_generate()
            .returning(|_, _| Ok("just a headline".to_string()));
        assert_eq!(commentate(&writer, &report()).await, Commentary::default());

        assert_eq!(
            commentate(&UnconfiguredGenerator, &report()).await,
            Commentary::default()
        );
    }
}
