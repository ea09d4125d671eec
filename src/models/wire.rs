// Upstream JSON shapes, decoded with serde.
//
// Lists are kept as raw `Value`s until they have been curated (see
// `curate`), because curation sorts by a dotted path that may point at
// either a `{value, displayValue}` object or a flat number.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::PluginError;
use crate::format::format_plain;

/// A JSON leaf that upstream sends as either a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl Scalar {
    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Number(n) => *n,
            Scalar::Text(s) => s.trim().trim_end_matches('%').replace(',', "").parse().unwrap_or(0.0),
            Scalar::Flag(b) => f64::from(u8::from(*b)),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Scalar::Number(n) => format_plain(*n),
            Scalar::Text(s) => s.clone(),
            Scalar::Flag(b) => b.to_string(),
        }
    }
}

/// Render an optional scalar, falling back to `--`.
pub fn display_or_dash(value: Option<&Scalar>) -> String {
    value.map(Scalar::display).unwrap_or_else(|| "--".to_string())
}

/// One tracker statistic: `{"value": 12, "displayValue": "12", "percentile": 80.1}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatValue {
    #[serde(default)]
    pub value: Option<Scalar>,
    #[serde(default)]
    pub display_value: Option<Scalar>,
    #[serde(default)]
    pub percentile: Option<f64>,
}

impl StatValue {
    pub fn number(&self) -> f64 {
        self.value.as_ref().map(Scalar::as_f64).unwrap_or(0.0)
    }

    /// The upstream display string, or the raw value when there is none.
    pub fn shown(&self) -> String {
        self.display_value
            .as_ref()
            .or(self.value.as_ref())
            .map(Scalar::display)
            .unwrap_or_else(|| "--".to_string())
    }

    /// The raw value as text.
    pub fn raw(&self) -> String {
        display_or_dash(self.value.as_ref())
    }
}

pub type StatMap = HashMap<String, StatValue>;

/// Look up a statistic that a profile cannot be shown without.
pub fn required<'a>(stats: &'a StatMap, key: &str) -> Result<&'a StatValue, PluginError> {
    stats
        .get(key)
        .ok_or_else(|| PluginError::Parse(format!("profile is missing stat `{key}`")))
}

/// Look up an optional statistic; absent ones read as an empty value.
pub fn optional<'a>(stats: &'a StatMap, key: &str) -> &'a StatValue {
    static EMPTY: StatValue = StatValue {
        value: None,
        display_value: None,
        percentile: None,
    };
    stats.get(key).unwrap_or(&EMPTY)
}

/// Decode a curated list entry, reporting which kind of entry failed.
pub fn decode<T: serde::de::DeserializeOwned>(raw: &Value, what: &str) -> Result<T, PluginError> {
    serde_json::from_value(raw.clone())
        .map_err(|e| PluginError::Parse(format!("malformed {what} entry: {e}")))
}

// ── Tracker API ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    #[serde(default)]
    pub platform_user_handle: Option<String>,
    #[serde(default)]
    pub platform_user_identifier: Option<Scalar>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMetadata {
    #[serde(default)]
    pub update_hash: Option<String>,
}

/// `/player/stat` and `/bf6/stat` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerProfile {
    #[serde(default)]
    pub platform_info: PlatformInfo,
    #[serde(default)]
    pub metadata: ProfileMetadata,
    #[serde(default)]
    pub segments: Vec<Value>,
}

impl TrackerProfile {
    /// Statistics of the first (overview) segment.
    pub fn overview(&self) -> Result<StatMap, PluginError> {
        let first = self
            .segments
            .first()
            .ok_or_else(|| PluginError::Parse("profile has no segments".to_string()))?;
        let segment: TrackerItem = decode(first, "overview segment")?;
        Ok(segment.stats)
    }

    pub fn handle(&self) -> String {
        self.platform_info
            .platform_user_handle
            .clone()
            .unwrap_or_else(|| "--".to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ItemMetadata {
    pub fn name_or_dash(&self) -> &str {
        self.name.as_deref().unwrap_or("--")
    }
}

/// A weapon, vehicle, kit or overview segment with `{value, displayValue}` stats.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerItem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: ItemMetadata,
    #[serde(default)]
    pub stats: StatMap,
}

/// A single-match entry whose stats are flat numbers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlatItem {
    #[serde(default)]
    pub metadata: ItemMetadata,
    #[serde(default)]
    pub stats: HashMap<String, Scalar>,
}

impl FlatItem {
    pub fn number(&self, key: &str) -> f64 {
        self.stats.get(key).map(Scalar::as_f64).unwrap_or(0.0)
    }

    pub fn shown(&self, key: &str) -> String {
        display_or_dash(self.stats.get(key))
    }
}

/// `/bf6/matches` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<MatchEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchEntry {
    #[serde(default)]
    pub metadata: MatchMetadata,
    #[serde(default)]
    pub segments: Vec<MatchSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchMetadata {
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchSegment {
    #[serde(default)]
    pub stats: StatMap,
    #[serde(default)]
    pub metadata: MatchLoadout,
}

/// Per-match breakdown lists, still raw for curation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchLoadout {
    #[serde(default)]
    pub weapons: Vec<Value>,
    #[serde(default)]
    pub vehicles: Vec<Value>,
    #[serde(default)]
    pub kits: Vec<Value>,
    #[serde(default)]
    pub gamemodes: Vec<Value>,
    #[serde(default)]
    pub levels: Vec<Value>,
}

// ── Gametools API ─────────────────────────────────────────────────────

/// `/<game>/all` payload. The player name is the one field we insist on.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtProfile {
    pub user_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub rank: Option<Scalar>,
    #[serde(default)]
    pub seconds_played: Option<Scalar>,
    #[serde(default)]
    pub kill_death: Option<Scalar>,
    #[serde(default)]
    pub kills_per_minute: Option<Scalar>,
    #[serde(default)]
    pub kills: Option<Scalar>,
    #[serde(default)]
    pub deaths: Option<Scalar>,
    #[serde(default)]
    pub wins: Option<Scalar>,
    #[serde(default)]
    pub loses: Option<Scalar>,
    #[serde(default)]
    pub win_percent: Option<Scalar>,
    #[serde(default)]
    pub accuracy: Option<Scalar>,
    #[serde(default)]
    pub headshots: Option<Scalar>,
    #[serde(default)]
    pub revives: Option<Scalar>,
    #[serde(default)]
    pub longest_head_shot: Option<Scalar>,
    #[serde(default)]
    pub score_per_minute: Option<Scalar>,
    #[serde(default)]
    pub skill: Option<Scalar>,
    #[serde(default)]
    pub best_class: Option<String>,
    #[serde(default)]
    pub weapons: Vec<Value>,
    #[serde(default)]
    pub vehicles: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtWeapon {
    #[serde(default)]
    pub weapon_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub kills: Option<Scalar>,
    #[serde(default)]
    pub kills_per_minute: Option<Scalar>,
    #[serde(default)]
    pub accuracy: Option<Scalar>,
    #[serde(default)]
    pub headshots: Option<Scalar>,
    #[serde(default)]
    pub shots_fired: Option<Scalar>,
    #[serde(default)]
    pub shots_hit: Option<Scalar>,
    #[serde(default)]
    pub time_equipped: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtVehicle {
    #[serde(default)]
    pub vehicle_name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub kills: Option<Scalar>,
    #[serde(default)]
    pub kills_per_minute: Option<Scalar>,
    #[serde(default)]
    pub destroyed: Option<Scalar>,
    #[serde(default)]
    pub time_in: Option<Scalar>,
}

/// `/<game>/servers` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GtServerList {
    #[serde(default)]
    pub servers: Vec<GtServer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtServer {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub current_map: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub player_amount: Option<Scalar>,
    #[serde(default, alias = "maxPlayerAmount")]
    pub max_players: Option<Scalar>,
    #[serde(default, alias = "inQueue")]
    pub in_que: Option<Scalar>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}
