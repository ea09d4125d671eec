// Recent-match view-models: per-mode and per-map lines plus the match report.

use serde::Serialize;
use serde_json::Value;

use super::curate::sort_by_path_desc;
use super::loadout::{Soldier, Vehicle, Weapon};
use super::player::PlayerStats;
use super::wire::{decode, FlatItem, MatchEntry};
use crate::error::PluginError;
use crate::format::{format_match_time, seconds_to_minutes};
use crate::localize::{map_name, mode_name};

fn count(item: &FlatItem, key: &str) -> u64 {
    item.number(key).max(0.0) as u64
}

#[derive(Debug, Clone, Serialize)]
pub struct Mode {
    pub name: String,
    pub image_url: String,
    pub time_played: String,
    pub kills: u64,
    pub assists: u64,
    pub deaths: u64,
    pub matches_won: u64,
    pub matches_lost: u64,
    pub matches_played: u64,
    pub kills_per_minute: String,
}

impl Mode {
    pub fn from_bf6_match(raw: &Value) -> Result<Self, PluginError> {
        let item: FlatItem = decode(raw, "game mode")?;
        Ok(Mode {
            name: mode_name(item.metadata.name_or_dash()),
            image_url: item.metadata.image_url.clone().unwrap_or_default(),
            time_played: seconds_to_minutes(item.number("timePlayed")),
            kills: count(&item, "kills"),
            assists: count(&item, "assists"),
            deaths: count(&item, "deaths"),
            matches_won: count(&item, "matchesWon"),
            matches_lost: count(&item, "matchesLost"),
            matches_played: count(&item, "matchesPlayed"),
            kills_per_minute: item.shown("killsPerMinute"),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Map {
    pub name: String,
    pub image_url: String,
    pub time_played: String,
    pub matches_played: u64,
    pub matches_won: u64,
    pub matches_lost: u64,
    pub wl_percentage: String,
}

impl Map {
    pub fn from_bf6_match(raw: &Value) -> Result<Self, PluginError> {
        let item: FlatItem = decode(raw, "map")?;
        Ok(Map {
            name: map_name(item.metadata.name_or_dash()),
            image_url: item.metadata.image_url.clone().unwrap_or_default(),
            time_played: seconds_to_minutes(item.number("timePlayed")),
            matches_played: count(&item, "matchesPlayed"),
            matches_won: count(&item, "matchesWon"),
            matches_lost: count(&item, "matchesLost"),
            wl_percentage: item.shown("wlPercentage"),
        })
    }
}

/// Everything shown for one recent match. Lists are sorted but complete;
/// renderers pick their own head counts.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub stats: PlayerStats,
    pub weapons: Vec<Weapon>,
    pub vehicles: Vec<Vehicle>,
    pub soldiers: Vec<Soldier>,
    pub modes: Vec<Mode>,
    pub maps: Vec<Map>,
    /// `"<map> <won> W-<lost> L"` for every map, joined by `" // "`.
    pub map_total: String,
    pub wins: u64,
    pub losses: u64,
    pub matches: u64,
    pub timestamp: String,
}

impl MatchReport {
    pub fn from_entry(entry: &MatchEntry, user_name: &str) -> Result<Self, PluginError> {
        let segment = entry
            .segments
            .first()
            .ok_or_else(|| PluginError::Parse("match has no segments".to_string()))?;
        let loadout = &segment.metadata;

        let stats = PlayerStats::from_bf6_match(&segment.stats, user_name)?;
        let weapons = sort_by_path_desc(loadout.weapons.clone(), "stats.kills")
            .iter()
            .map(Weapon::from_bf6_match)
            .collect::<Result<Vec<_>, _>>()?;
        let vehicles = sort_by_path_desc(loadout.vehicles.clone(), "stats.kills")
            .iter()
            .map(Vehicle::from_bf6_match)
            .collect::<Result<Vec<_>, _>>()?;
        let soldiers = sort_by_path_desc(loadout.kits.clone(), "stats.timePlayed")
            .iter()
            .map(Soldier::from_bf6_match)
            .collect::<Result<Vec<_>, _>>()?;
        let modes = sort_by_path_desc(loadout.gamemodes.clone(), "stats.matchesPlayed")
            .iter()
            .map(Mode::from_bf6_match)
            .collect::<Result<Vec<_>, _>>()?;
        let maps = sort_by_path_desc(loadout.levels.clone(), "stats.matchesPlayed")
            .iter()
            .map(Map::from_bf6_match)
            .collect::<Result<Vec<_>, _>>()?;

        let map_total = maps
            .iter()
            .map(|m| format!("{} {} W-{} L", m.name, m.matches_won, m.matches_lost))
            .collect::<Vec<_>>()
            .join(" // ");
        let wins = modes.iter().map(|m| m.matches_won).sum();
        let losses = modes.iter().map(|m| m.matches_lost).sum();
        let matches = modes.iter().map(|m| m.matches_played).sum();
        let timestamp = entry
            .metadata
            .timestamp
            .as_deref()
            .map(format_match_time)
            .unwrap_or_else(|| "--".to_string());

        Ok(MatchReport {
            stats,
            weapons,
            vehicles,
            soldiers,
            modes,
            maps,
            map_total,
            wins,
            losses,
            matches,
            timestamp,
        })
    }
}
