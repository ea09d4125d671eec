// Player summary view-model, one constructor per upstream schema.

use serde::Serialize;

use super::wire::{display_or_dash, optional, required, GtProfile, Scalar, StatMap, TrackerProfile};
use crate::error::PluginError;
use crate::format::{
    format_large_number, rank_image_url, seconds_to_hours, seconds_to_minutes, top_percent,
};

/// Display-ready player statistics. Every field is already formatted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerStats {
    pub avatar: String,
    pub user_name: String,
    pub level: String,
    pub rank_img: String,
    /// Hours for profiles, minutes for a single match.
    pub time_played: String,

    pub dmg_per_min: String,
    pub dmg_per_min_top: String,
    pub kill_death: String,
    pub kill_death_top: String,
    pub kills_per_minute: String,
    pub kills_per_minute_top: String,
    pub headshot_percentage: String,
    pub accuracy: String,

    pub human_kd_ratio: String,
    pub human_kd_ratio_top: String,
    pub kills: String,
    pub kills_top: String,
    pub player_kills: String,
    pub player_kills_top: String,
    pub assists: String,
    pub deaths: String,
    pub kills_per_match: String,
    pub wl_percentage: String,

    pub wins: String,
    pub wins_top: String,
    pub losses: String,
    pub damage_dealt: String,
    pub damage_per_match: String,
    pub revives: String,
    pub vehicles_destroyed: String,
    pub score_per_minute: String,
    pub score: String,

    // Gametools-only figures.
    pub skill: String,
    pub longest_headshot: String,
    pub best_class: String,
}

const UNRANKED: &str = "100";

impl PlayerStats {
    /// bf2042 profile from `/player/stat`.
    pub fn from_bf2042(profile: &TrackerProfile) -> Result<Self, PluginError> {
        let stats = profile.overview()?;
        let kills = required(&stats, "kills")?;
        let wins = required(&stats, "wins")?;
        Ok(PlayerStats {
            avatar: profile.platform_info.avatar_url.clone().unwrap_or_default(),
            user_name: profile.handle(),
            level: required(&stats, "level")?.shown(),
            time_played: seconds_to_hours(required(&stats, "timePlayed")?.number()),
            dmg_per_min: optional(&stats, "dmgPerMin").raw(),
            dmg_per_min_top: UNRANKED.to_string(),
            kill_death: required(&stats, "kdRatio")?.shown(),
            kill_death_top: UNRANKED.to_string(),
            kills_per_minute: required(&stats, "killsPerMinute")?.shown(),
            kills_per_minute_top: UNRANKED.to_string(),
            headshot_percentage: optional(&stats, "headshotPercentage").shown(),
            human_kd_ratio: optional(&stats, "humanKdRatio").shown(),
            human_kd_ratio_top: UNRANKED.to_string(),
            kills: kills.raw(),
            kills_top: top_percent(kills.percentile),
            player_kills: "0".to_string(),
            player_kills_top: "0".to_string(),
            assists: optional(&stats, "assists").raw(),
            deaths: required(&stats, "deaths")?.raw(),
            kills_per_match: optional(&stats, "killsPerMatch").raw(),
            wl_percentage: optional(&stats, "wlPercentage").shown(),
            wins: wins.shown(),
            wins_top: top_percent(wins.percentile),
            losses: optional(&stats, "losses").shown(),
            damage_dealt: format_large_number(optional(&stats, "damageDealt").number()),
            damage_per_match: optional(&stats, "damagePerMatch").raw(),
            revives: optional(&stats, "revives").raw(),
            vehicles_destroyed: optional(&stats, "vehiclesDestroyed").shown(),
            ..PlayerStats::dashes()
        })
    }

    /// bf6 profile from `/bf6/stat`.
    pub fn from_bf6(profile: &TrackerProfile) -> Result<Self, PluginError> {
        let stats = profile.overview()?;
        let level = required(&stats, "careerPlayerRank")?.shown();
        let rank_img = rank_image_url(&level).unwrap_or_default();
        let mut out = Self::from_bf6_stats(&stats, profile.handle())?;
        out.avatar = profile.platform_info.avatar_url.clone().unwrap_or_default();
        out.level = level;
        out.rank_img = rank_img;
        out.time_played = seconds_to_hours(required(&stats, "timePlayed")?.number());
        out.dmg_per_min_top = top_percent(optional(&stats, "damagePerMinute").percentile);
        out.kill_death_top = top_percent(optional(&stats, "kdRatio").percentile);
        out.kills_per_minute_top = top_percent(optional(&stats, "killsPerMinute").percentile);
        out.human_kd_ratio_top = top_percent(optional(&stats, "playerKd").percentile);
        out.kills_top = top_percent(optional(&stats, "kills").percentile);
        out.player_kills_top = top_percent(optional(&stats, "playerKills").percentile);
        out.wins_top = top_percent(optional(&stats, "matchesWon").percentile);
        Ok(out)
    }

    /// One bf6 match. Durations are in minutes; there is no rank or percentile.
    pub fn from_bf6_match(stats: &StatMap, user_name: &str) -> Result<Self, PluginError> {
        let mut out = Self::from_bf6_stats(stats, user_name.to_string())?;
        out.time_played = seconds_to_minutes(required(stats, "timePlayed")?.number());
        Ok(out)
    }

    /// Fields shared by bf6 profiles and bf6 matches.
    fn from_bf6_stats(stats: &StatMap, user_name: String) -> Result<Self, PluginError> {
        Ok(PlayerStats {
            user_name,
            dmg_per_min: optional(stats, "damagePerMinute").raw(),
            dmg_per_min_top: UNRANKED.to_string(),
            kill_death: required(stats, "kdRatio")?.shown(),
            kill_death_top: UNRANKED.to_string(),
            headshot_percentage: optional(stats, "headshotPercentage").raw(),
            kills_per_minute: required(stats, "killsPerMinute")?.raw(),
            kills_per_minute_top: UNRANKED.to_string(),
            human_kd_ratio: optional(stats, "playerKd").shown(),
            human_kd_ratio_top: UNRANKED.to_string(),
            kills: required(stats, "kills")?.raw(),
            kills_top: UNRANKED.to_string(),
            player_kills: format_or_zero(optional(stats, "playerKills").value.as_ref()),
            player_kills_top: UNRANKED.to_string(),
            assists: optional(stats, "assists").raw(),
            deaths: required(stats, "deaths")?.raw(),
            kills_per_match: optional(stats, "killsPerMatch").raw(),
            wl_percentage: optional(stats, "wlPercentage").shown(),
            wins: optional(stats, "matchesWon").shown(),
            wins_top: UNRANKED.to_string(),
            losses: optional(stats, "matchesLost").shown(),
            damage_dealt: format_large_number(optional(stats, "damageDealt").number()),
            damage_per_match: optional(stats, "damagePerMatch").raw(),
            revives: optional(stats, "revives").raw(),
            vehicles_destroyed: optional(stats, "vehiclesDestroyed").raw(),
            score_per_minute: optional(stats, "scorePerMinute").raw(),
            score: format_large_number(optional(stats, "score").number()),
            ..PlayerStats::dashes()
        })
    }

    /// bf4/bf1/bfv profile from gametools `/<game>/all`.
    pub fn from_gametools(profile: &GtProfile) -> Self {
        let seconds = profile.seconds_played.as_ref().map(Scalar::as_f64).unwrap_or(0.0);
        let whole = |v: Option<&Scalar>| {
            v.map(|s| format!("{}", s.as_f64() as i64))
                .unwrap_or_else(|| "0".to_string())
        };
        PlayerStats {
            avatar: profile.avatar.clone().unwrap_or_default(),
            user_name: profile.user_name.clone(),
            level: display_or_dash(profile.rank.as_ref()),
            time_played: seconds_to_hours(seconds),
            kill_death: display_or_dash(profile.kill_death.as_ref()),
            kills_per_minute: display_or_dash(profile.kills_per_minute.as_ref()),
            kills: display_or_dash(profile.kills.as_ref()),
            deaths: display_or_dash(profile.deaths.as_ref()),
            wins: display_or_dash(profile.wins.as_ref()),
            losses: display_or_dash(profile.loses.as_ref()),
            wl_percentage: display_or_dash(profile.win_percent.as_ref()),
            headshot_percentage: display_or_dash(profile.headshots.as_ref()),
            accuracy: display_or_dash(profile.accuracy.as_ref()),
            revives: whole(profile.revives.as_ref()),
            longest_headshot: whole(profile.longest_head_shot.as_ref()),
            score_per_minute: display_or_dash(profile.score_per_minute.as_ref()),
            skill: display_or_dash(profile.skill.as_ref()),
            best_class: profile.best_class.clone().unwrap_or_else(|| "--".to_string()),
            ..PlayerStats::dashes()
        }
    }

    fn dashes() -> Self {
        let dash = || "--".to_string();
        PlayerStats {
            avatar: String::new(),
            user_name: dash(),
            level: dash(),
            rank_img: String::new(),
            time_played: dash(),
            dmg_per_min: dash(),
            dmg_per_min_top: dash(),
            kill_death: dash(),
            kill_death_top: dash(),
            kills_per_minute: dash(),
            kills_per_minute_top: dash(),
            headshot_percentage: dash(),
            accuracy: dash(),
            human_kd_ratio: dash(),
            human_kd_ratio_top: dash(),
            kills: dash(),
            kills_top: dash(),
            player_kills: dash(),
            player_kills_top: dash(),
            assists: dash(),
            deaths: dash(),
            kills_per_match: dash(),
            wl_percentage: dash(),
            wins: dash(),
            wins_top: dash(),
            losses: dash(),
            damage_dealt: dash(),
            damage_per_match: dash(),
            revives: dash(),
            vehicles_destroyed: dash(),
            score_per_minute: dash(),
            score: dash(),
            skill: dash(),
            longest_headshot: dash(),
            best_class: dash(),
        }
    }

    /// One-paragraph summary fed to a language model.
    pub fn to_llm_text(&self) -> String {
        format!(
            "player {} has {} career kills (top {}% worldwide), K/D {}, KPM {}, {} wins, \
             {} revives, headshot rate {}, {} hours played and {} vehicles destroyed.",
            self.user_name,
            self.kills,
            self.kills_top,
            self.kill_death,
            self.kills_per_minute,
            self.wins,
            self.revives,
            self.headshot_percentage,
            self.time_played,
            self.vehicles_destroyed
        )
    }
}

fn format_or_zero(value: Option<&Scalar>) -> String {
    value.map(Scalar::display).unwrap_or_else(|| "0".to_string())
}
