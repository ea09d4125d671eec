// Weapon, vehicle and soldier view-models.

use serde::Serialize;
use serde_json::Value;

use super::wire::{decode, display_or_dash, optional, FlatItem, GtVehicle, GtWeapon, Scalar, TrackerItem};
use crate::error::PluginError;
use crate::format::{format_plain, seconds_to_hours, seconds_to_minutes};
use crate::localize::{soldier_class, soldier_name, vehicle_category, vehicle_name, weapon_category};

fn hours_of(item: &TrackerItem, key: &str) -> String {
    seconds_to_hours(optional(&item.stats, key).number())
}

fn scalar_number(value: Option<&Scalar>) -> f64 {
    value.map(Scalar::as_f64).unwrap_or(0.0)
}

// ── Weapon ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Weapon {
    pub name: String,
    pub category: String,
    pub image_url: String,
    pub kills: String,
    pub kills_per_minute: String,
    pub accuracy: String,
    pub headshot_percentage: String,
    pub damage_dealt: String,
    pub shots_fired: String,
    pub shots_hit: String,
    pub headshot_kills: String,
    pub multi_kills: String,
    pub time_played: String,
}

impl Weapon {
    pub fn from_bf2042(raw: &Value) -> Result<Self, PluginError> {
        let item: TrackerItem = decode(raw, "weapon")?;
        Ok(Self::from_tracker(&item, item.metadata.category.as_deref()))
    }

    pub fn from_bf6(raw: &Value) -> Result<Self, PluginError> {
        let item: TrackerItem = decode(raw, "weapon")?;
        Ok(Self::from_tracker(&item, item.metadata.category_name.as_deref()))
    }

    fn from_tracker(item: &TrackerItem, category: Option<&str>) -> Self {
        let stat = |key: &str| optional(&item.stats, key).shown();
        Weapon {
            name: item.metadata.name_or_dash().to_string(),
            category: weapon_category(category.unwrap_or("--")),
            image_url: item.metadata.image_url.clone().unwrap_or_default(),
            kills: optional(&item.stats, "kills").raw(),
            kills_per_minute: stat("killsPerMinute"),
            accuracy: stat("shotsAccuracy"),
            headshot_percentage: stat("headshotPercentage"),
            damage_dealt: stat("damageDealt"),
            shots_fired: stat("shotsFired"),
            shots_hit: stat("shotsHit"),
            headshot_kills: stat("headshotKills"),
            multi_kills: stat("multiKills"),
            time_played: hours_of(item, "timePlayed"),
        }
    }

    /// One weapon of a single bf6 match (flat stats, minutes).
    pub fn from_bf6_match(raw: &Value) -> Result<Self, PluginError> {
        let item: FlatItem = decode(raw, "match weapon")?;
        Ok(Weapon {
            name: item.metadata.name_or_dash().to_string(),
            category: weapon_category(item.metadata.category_name.as_deref().unwrap_or("--")),
            image_url: item.metadata.image_url.clone().unwrap_or_default(),
            kills: format_plain(item.number("kills")),
            kills_per_minute: item.shown("killsPerMinute"),
            accuracy: item.shown("shotsAccuracy"),
            headshot_percentage: item.shown("headshotPercentage"),
            damage_dealt: item.shown("damageDealt"),
            shots_fired: item.shown("shotsFired"),
            shots_hit: item.shown("shotsHit"),
            headshot_kills: item.shown("headshotKills"),
            multi_kills: item.shown("multiKills"),
            time_played: seconds_to_minutes(item.number("timePlayed")),
        })
    }

    pub fn from_gametools(raw: &Value) -> Result<Self, PluginError> {
        let w: GtWeapon = decode(raw, "weapon")?;
        Ok(Weapon {
            name: w.weapon_name.unwrap_or_else(|| "--".to_string()),
            category: weapon_category(w.kind.as_deref().unwrap_or("--")),
            image_url: w.image.unwrap_or_default(),
            kills: format_plain(scalar_number(w.kills.as_ref())),
            kills_per_minute: display_or_dash(w.kills_per_minute.as_ref()),
            accuracy: display_or_dash(w.accuracy.as_ref()),
            headshot_percentage: display_or_dash(w.headshots.as_ref()),
            damage_dealt: "--".to_string(),
            shots_fired: display_or_dash(w.shots_fired.as_ref()),
            shots_hit: display_or_dash(w.shots_hit.as_ref()),
            headshot_kills: "--".to_string(),
            multi_kills: "--".to_string(),
            time_played: seconds_to_hours(scalar_number(w.time_equipped.as_ref())),
        })
    }

    pub fn to_llm_text(&self) -> String {
        format!(
            "used the {} {} for {} hours with {} kills in total, {} kills per minute, \
             headshot rate {}, accuracy {}",
            self.category,
            self.name,
            self.time_played,
            self.kills,
            self.kills_per_minute,
            self.headshot_percentage,
            self.accuracy
        )
    }
}

// ── Vehicle ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub name: String,
    pub category: String,
    pub image_url: String,
    pub kills: String,
    pub kills_per_minute: String,
    pub time_played: String,
    pub damage_dealt: String,
    pub destroyed: String,
    pub road_kills: String,
    pub assists: String,
    pub distance_traveled: String,
}

impl Vehicle {
    pub fn from_bf2042(raw: &Value) -> Result<Self, PluginError> {
        let item: TrackerItem = decode(raw, "vehicle")?;
        Ok(Self::from_tracker(
            &item,
            item.metadata.category.as_deref(),
            "destroyed",
        ))
    }

    pub fn from_bf6(raw: &Value) -> Result<Self, PluginError> {
        let item: TrackerItem = decode(raw, "vehicle")?;
        Ok(Self::from_tracker(
            &item,
            item.metadata.category_name.as_deref(),
            "destroyedOfType",
        ))
    }

    fn from_tracker(item: &TrackerItem, category: Option<&str>, destroyed_key: &str) -> Self {
        let stat = |key: &str| optional(&item.stats, key).shown();
        Vehicle {
            name: vehicle_name(item.metadata.name_or_dash()),
            category: vehicle_category(category.unwrap_or("--")),
            image_url: item.metadata.image_url.clone().unwrap_or_default(),
            kills: optional(&item.stats, "kills").raw(),
            kills_per_minute: stat("killsPerMinute"),
            time_played: hours_of(item, "timePlayed"),
            damage_dealt: stat("damageDealt"),
            destroyed: stat(destroyed_key),
            road_kills: stat("roadKills"),
            assists: stat("assists"),
            distance_traveled: stat("distanceTraveled"),
        }
    }

    pub fn from_bf6_match(raw: &Value) -> Result<Self, PluginError> {
        let item: FlatItem = decode(raw, "match vehicle")?;
        Ok(Vehicle {
            name: vehicle_name(item.metadata.name_or_dash()),
            category: vehicle_category(item.metadata.category_name.as_deref().unwrap_or("--")),
            image_url: item.metadata.image_url.clone().unwrap_or_default(),
            kills: format_plain(item.number("kills")),
            kills_per_minute: item.shown("killsPerMinute"),
            time_played: seconds_to_minutes(item.number("timePlayed")),
            damage_dealt: item.shown("damageDealt"),
            destroyed: item.shown("destroyedOfType"),
            road_kills: item.shown("roadKills"),
            assists: item.shown("assists"),
            distance_traveled: item.shown("distanceTraveled"),
        })
    }

    pub fn from_gametools(raw: &Value) -> Result<Self, PluginError> {
        let v: GtVehicle = decode(raw, "vehicle")?;
        Ok(Vehicle {
            name: v.vehicle_name.unwrap_or_else(|| "--".to_string()),
            category: vehicle_category(v.kind.as_deref().unwrap_or("--")),
            image_url: v.image.unwrap_or_default(),
            kills: format_plain(scalar_number(v.kills.as_ref())),
            kills_per_minute: display_or_dash(v.kills_per_minute.as_ref()),
            time_played: seconds_to_hours(scalar_number(v.time_in.as_ref())),
            damage_dealt: "--".to_string(),
            destroyed: display_or_dash(v.destroyed.as_ref()),
            road_kills: "--".to_string(),
            assists: "--".to_string(),
            distance_traveled: "--".to_string(),
        })
    }

    pub fn to_llm_text(&self) -> String {
        format!(
            "used the {} {} for {} hours with {} kills in total, {} kills per minute, \
             and destroyed {} vehicles.",
            self.category,
            self.name,
            self.time_played,
            self.kills,
            self.kills_per_minute,
            self.destroyed
        )
    }
}

// ── Soldier ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Soldier {
    pub name: String,
    /// Class of a bf2042 specialist. bf6 entries are classes themselves.
    pub category: String,
    pub image_url: String,
    pub kills: String,
    pub kd_ratio: String,
    pub kills_per_minute: String,
    pub assists: String,
    pub time_played: String,
    pub revives: String,
    pub deaths: String,
}

impl Soldier {
    pub fn from_bf2042(raw: &Value) -> Result<Self, PluginError> {
        let item: TrackerItem = decode(raw, "soldier")?;
        Ok(Self::from_tracker(
            &item,
            soldier_name(item.metadata.name_or_dash()),
            soldier_class(item.metadata.category.as_deref().unwrap_or("--")),
        ))
    }

    pub fn from_bf6(raw: &Value) -> Result<Self, PluginError> {
        let item: TrackerItem = decode(raw, "soldier")?;
        Ok(Self::from_tracker(
            &item,
            soldier_class(item.metadata.name_or_dash()),
            String::new(),
        ))
    }

    fn from_tracker(item: &TrackerItem, name: String, category: String) -> Self {
        let stat = |key: &str| optional(&item.stats, key).shown();
        Soldier {
            name,
            category,
            image_url: item.metadata.image_url.clone().unwrap_or_default(),
            kills: optional(&item.stats, "kills").raw(),
            kd_ratio: stat("kdRatio"),
            kills_per_minute: stat("killsPerMinute"),
            assists: stat("assists"),
            time_played: hours_of(item, "timePlayed"),
            revives: stat("revives"),
            deaths: stat("deaths"),
        }
    }

    pub fn from_bf6_match(raw: &Value) -> Result<Self, PluginError> {
        let item: FlatItem = decode(raw, "match soldier")?;
        Ok(Soldier {
            name: soldier_class(item.metadata.name_or_dash()),
            category: String::new(),
            image_url: item.metadata.image_url.clone().unwrap_or_default(),
            kills: format_plain(item.number("kills")),
            kd_ratio: item.shown("kdRatio"),
            kills_per_minute: item.shown("killsPerMinute"),
            assists: item.shown("assists"),
            time_played: seconds_to_minutes(item.number("timePlayed")),
            revives: item.shown("revives"),
            deaths: item.shown("deaths"),
        })
    }

    pub fn to_llm_text(&self) -> String {
        if self.category.is_empty() {
            format!(
                "plays best as {}, with {} kills in {} hours, {} kills per minute and K/D {}.",
                self.name, self.kills, self.time_played, self.kills_per_minute, self.kd_ratio
            )
        } else {
            format!(
                "plays best as the {} specialist {}, with {} kills in {} hours, \
                 {} kills per minute and K/D {}.",
                self.category,
                self.name,
                self.kills,
                self.time_played,
                self.kills_per_minute,
                self.kd_ratio
            )
        }
    }
}
