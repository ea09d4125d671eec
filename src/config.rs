// Application configuration, loaded from environment variables and CLI flags.

use std::time::Duration;

pub const DEFAULT_GAMETOOLS_API_URL: &str = "https://api.gametools.network";
pub const DEFAULT_TRACKER_API_URL: &str = "https://battlefield.shooting-star-c.top/api";
pub const DEFAULT_ASSET_BASE_URL: &str = "https://tutu.shooting-star-c.top/bf";

pub const DEFAULT_STAT_PROMPT: &str = "Assess the player's skill from the data below, staying in \
character and consistent with the conversation. Guidelines: K/D below 1 is weak, above 2.5 is strong; \
KPM below 0.7 is weak, above 1.5 is strong, and a high K/D with a low KPM suggests a camper. Judge \
accuracy and headshot rate per weapon class (shotguns can exceed 100% accuracy, snipers can exceed \
90% headshots); both above 50% on ordinary weapons is suspicious. Revives mark a medic. For \
vehicles compare kills with vehicles destroyed";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database URL (SQLite connection string).
    pub database_url: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Game used when neither the command nor the channel names one.
    pub default_game: String,
    /// Per-call timeout for every upstream request.
    pub timeout: Duration,
    /// JPEG quality passed to the renderer.
    pub img_quality: u8,
    /// Key for the tracker API, forwarded as `X-API-Key` when set.
    pub api_key: Option<String>,
    pub gametools_api_url: String,
    pub tracker_api_url: String,
    /// HTML-to-image service. Image commands fail with a configuration
    /// error when this is unset.
    pub render_service_url: Option<String>,
    /// OpenAI-compatible endpoint used for match commentary.
    pub llm_base_url: Option<String>,
    pub llm_model: String,
    /// Prefix shown in replayable hints (`/stat ...`).
    pub wake_prefix: String,
    /// Instruction prepended to tool-mode answers.
    pub stat_prompt: String,
    pub default_platform: String,
    pub asset_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite:bfstat.db?mode=rwc".to_string(),
            port: 3000,
            default_game: "bfv".to_string(),
            timeout: Duration::from_secs(15),
            img_quality: 90,
            api_key: None,
            gametools_api_url: DEFAULT_GAMETOOLS_API_URL.to_string(),
            tracker_api_url: DEFAULT_TRACKER_API_URL.to_string(),
            render_service_url: None,
            llm_base_url: None,
            llm_model: "gpt-4o-mini".to_string(),
            wake_prefix: "/".to_string(),
            stat_prompt: DEFAULT_STAT_PROMPT.to_string(),
            default_platform: "pc".to_string(),
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `DATABASE_URL` - SQLite connection string (default: `sqlite:bfstat.db?mode=rwc`)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `BF_DEFAULT_GAME` - fallback game code (default: `bfv`)
    /// - `BF_TIMEOUT_SECS` - upstream timeout in seconds (default: 15)
    /// - `BF_IMG_QUALITY` - rendered image quality, 1-100 (default: 90)
    /// - `BF_API_KEY` - tracker API key
    /// - `GAMETOOLS_API_URL`, `TRACKER_API_URL` - upstream hosts
    /// - `RENDER_SERVICE_URL` - HTML-to-image service
    /// - `LLM_BASE_URL`, `LLM_MODEL` - commentary provider
    /// - `BF_WAKE_PREFIX` - command prefix used in hints (default: `/`)
    /// - `BF_STAT_PROMPT` - evaluation prompt for tool mode
    /// - `BF_DEFAULT_PLATFORM` - platform sent to gametools (default: `pc`)
    /// - `ASSET_BASE_URL` - banner/logo host
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_lookup(&args, |key| std::env::var(key).ok())
    }

    /// Build a config from CLI args and an environment lookup.
    fn from_lookup(args: &[String], env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| var("PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(defaults.port);

        let timeout = var("BF_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let img_quality = var("BF_IMG_QUALITY")
            .and_then(|v| v.parse::<u8>().ok())
            .map(|q| q.clamp(1, 100))
            .unwrap_or(defaults.img_quality);

        Config {
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            port,
            default_game: var("BF_DEFAULT_GAME").unwrap_or(defaults.default_game),
            timeout,
            img_quality,
            api_key: var("BF_API_KEY"),
            gametools_api_url: var("GAMETOOLS_API_URL").unwrap_or(defaults.gametools_api_url),
            tracker_api_url: var("TRACKER_API_URL").unwrap_or(defaults.tracker_api_url),
            render_service_url: var("RENDER_SERVICE_URL"),
            llm_base_url: var("LLM_BASE_URL"),
            llm_model: var("LLM_MODEL").unwrap_or(defaults.llm_model),
            wake_prefix: env("BF_WAKE_PREFIX").unwrap_or(defaults.wake_prefix),
            stat_prompt: var("BF_STAT_PROMPT").unwrap_or(defaults.stat_prompt),
            default_platform: var("BF_DEFAULT_PLATFORM").unwrap_or(defaults.default_platform),
            asset_base_url: var("ASSET_BASE_URL").unwrap_or(defaults.asset_base_url),
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}
