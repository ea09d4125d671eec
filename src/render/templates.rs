// HTML card templates.
//
// Cards are plain HTML with inline CSS so the render service needs no
// external stylesheet. Every interpolated value goes through `esc`.

use crate::backend::PlayerReport;
use crate::commentary::Commentary;
use crate::format::update_stamp;
use crate::game::Game;
use crate::localize::{background_color, Assets};
use crate::models::{MatchReport, PlayerStats, Server, Soldier, Vehicle, Weapon};

/// Head counts for the summary card.
pub const SUMMARY_WEAPONS: usize = 3;
pub const SUMMARY_VEHICLES: usize = 3;
pub const SUMMARY_SOLDIERS: usize = 1;

/// Head counts for the recent-match card. Maps are shown in full.
pub const MATCH_WEAPONS: usize = 3;
pub const MATCH_VEHICLES: usize = 3;
pub const MATCH_SOLDIERS: usize = 2;
pub const MATCH_MODES: usize = 3;

const STYLE: &str = "body{margin:0;width:700px;font-family:sans-serif;color:#eee}\
.card{padding:16px}.banner{width:100%;display:block}\
.grid{display:grid;grid-template-columns:repeat(4,1fr);gap:8px}\
.cell{background:rgba(255,255,255,.06);padding:8px;border-radius:6px}\
.cell b{display:block;font-size:20px}.cell small{color:#aaa}\
.item{display:flex;gap:12px;align-items:center;margin:8px 0;padding:8px;\
background:rgba(255,255,255,.05);border-radius:6px}.item img{width:96px}\
.foot{font-size:12px;color:#888;text-align:center;padding:8px}";

pub fn esc(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(background: &str, banner: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>{STYLE}</style></head>\
         <body style=\"background:{}\"><img class=\"banner\" src=\"{}\">\
         <div class=\"card\">{body}</div><div class=\"foot\">Updated {}</div></body></html>",
        esc(background),
        esc(banner),
        update_stamp()
    )
}

fn cell(label: &str, value: &str) -> String {
    format!(
        "<div class=\"cell\"><small>{}</small><b>{}</b></div>",
        esc(label),
        esc(value)
    )
}

fn cell_top(label: &str, value: &str, top: &str) -> String {
    if top == "--" {
        return cell(label, value);
    }
    format!(
        "<div class=\"cell\"><small>{}</small><b>{}</b><small>top {}%</small></div>",
        esc(label),
        esc(value),
        esc(top)
    )
}

fn header(stats: &PlayerStats, avatar: &str) -> String {
    let rank = if stats.rank_img.is_empty() {
        String::new()
    } else {
        format!("<img src=\"{}\" style=\"height:48px\">", esc(&stats.rank_img))
    };
    format!(
        "<div class=\"item\"><img src=\"{}\" style=\"width:64px;border-radius:50%\">\
         <div><b style=\"font-size:24px\">{}</b><br>Level {} {rank}</div></div>",
        esc(avatar),
        esc(&stats.user_name),
        esc(&stats.level)
    )
}

fn stats_grid(stats: &PlayerStats) -> String {
    let cells = [
        cell_top("K/D", &stats.kill_death, &stats.kill_death_top),
        cell_top("KPM", &stats.kills_per_minute, &stats.kills_per_minute_top),
        cell_top("Kills", &stats.kills, &stats.kills_top),
        cell_top("Wins", &stats.wins, &stats.wins_top),
        cell("Deaths", &stats.deaths),
        cell("Losses", &stats.losses),
        cell("Win rate", &stats.wl_percentage),
        cell("Headshots", &stats.headshot_percentage),
        cell_top("Damage/min", &stats.dmg_per_min, &stats.dmg_per_min_top),
        cell_top("Human K/D", &stats.human_kd_ratio, &stats.human_kd_ratio_top),
        cell("Damage", &stats.damage_dealt),
        cell("Revives", &stats.revives),
        cell("Assists", &stats.assists),
        cell("Vehicles destroyed", &stats.vehicles_destroyed),
        cell("Accuracy", &stats.accuracy),
        cell("Hours", &stats.time_played),
    ];
    format!("<div class=\"grid\">{}</div>", cells.concat())
}

fn weapon_row(w: &Weapon) -> String {
    format!(
        "<div class=\"item\"><img src=\"{}\"><div><b>{}</b> <small>{}</small><br>\
         Kills {} · KPM {} · Accuracy {} · Headshots {} · {} h</div></div>",
        esc(&w.image_url),
        esc(&w.name),
        esc(&w.category),
        esc(&w.kills),
        esc(&w.kills_per_minute),
        esc(&w.accuracy),
        esc(&w.headshot_percentage),
        esc(&w.time_played)
    )
}

fn vehicle_row(v: &Vehicle) -> String {
    format!(
        "<div class=\"item\"><img src=\"{}\"><div><b>{}</b> <small>{}</small><br>\
         Kills {} · KPM {} · Destroyed {} · {} h</div></div>",
        esc(&v.image_url),
        esc(&v.name),
        esc(&v.category),
        esc(&v.kills),
        esc(&v.kills_per_minute),
        esc(&v.destroyed),
        esc(&v.time_played)
    )
}

fn soldier_row(s: &Soldier) -> String {
    format!(
        "<div class=\"item\"><img src=\"{}\"><div><b>{}</b> <small>{}</small><br>\
         Kills {} · K/D {} · KPM {} · Revives {} · {} h</div></div>",
        esc(&s.image_url),
        esc(&s.name),
        esc(&s.category),
        esc(&s.kills),
        esc(&s.kd_ratio),
        esc(&s.kills_per_minute),
        esc(&s.revives),
        esc(&s.time_played)
    )
}

fn section<T>(title: &str, items: &[T], limit: usize, row: fn(&T) -> String) -> String {
    if items.is_empty() {
        return String::new();
    }
    let rows: String = items.iter().take(limit).map(row).collect();
    format!("<h3>{}</h3>{rows}", esc(title))
}

fn banner_for(report: &PlayerReport, assets: &Assets) -> String {
    match report.game {
        Game::Bf6 => assets.bf6_banner(report.soldiers.first().map(|s| s.name.as_str())),
        game => assets.banner(game),
    }
}

fn avatar_for(stats: &PlayerStats, assets: &Assets) -> String {
    if stats.avatar.is_empty() {
        assets.default_avatar()
    } else {
        stats.avatar.clone()
    }
}

// ── Cards ─────────────────────────────────────────────────────────────

pub fn summary_card(report: &PlayerReport, assets: &Assets) -> String {
    let body = [
        header(&report.stats, &avatar_for(&report.stats, assets)),
        stats_grid(&report.stats),
        section("Weapons", &report.weapons, SUMMARY_WEAPONS, weapon_row),
        section("Vehicles", &report.vehicles, SUMMARY_VEHICLES, vehicle_row),
        section("Soldiers", &report.soldiers, SUMMARY_SOLDIERS, soldier_row),
    ]
    .concat();
    page(background_color(report.game), &banner_for(report, assets), &body)
}

pub fn weapons_card(report: &PlayerReport, assets: &Assets) -> String {
    let body = [
        header(&report.stats, &avatar_for(&report.stats, assets)),
        section("Weapons", &report.weapons, usize::MAX, weapon_row),
    ]
    .concat();
    page(background_color(report.game), &banner_for(report, assets), &body)
}

pub fn vehicles_card(report: &PlayerReport, assets: &Assets) -> String {
    let body = [
        header(&report.stats, &avatar_for(&report.stats, assets)),
        section("Vehicles", &report.vehicles, usize::MAX, vehicle_row),
    ]
    .concat();
    page(background_color(report.game), &banner_for(report, assets), &body)
}

pub fn soldiers_card(report: &PlayerReport, assets: &Assets) -> String {
    let body = [
        header(&report.stats, &avatar_for(&report.stats, assets)),
        section("Soldiers", &report.soldiers, usize::MAX, soldier_row),
    ]
    .concat();
    page(background_color(report.game), &banner_for(report, assets), &body)
}

pub fn servers_card(game: Game, servers: &[Server], assets: &Assets) -> String {
    let rows: String = servers
        .iter()
        .map(|s| {
            format!(
                "<div class=\"item\"><img src=\"{}\"><div><b>{}</b><br>{} · {}<br>\
                 Players {} · {}<br><small>{}</small></div></div>",
                esc(&s.image_url),
                esc(&s.name),
                esc(&s.map),
                esc(&s.mode),
                esc(&s.occupancy),
                esc(&s.region),
                esc(&s.description)
            )
        })
        .collect();
    let body = format!(
        "<img src=\"{}\" style=\"height:40px\">{rows}",
        esc(&assets.logo(game))
    );
    page(background_color(game), &assets.banner(game), &body)
}

pub fn matches_card(report: &MatchReport, commentary: &Commentary, assets: &Assets) -> String {
    let modes: String = report
        .modes
        .iter()
        .take(MATCH_MODES)
        .map(|m| {
            cell(
                &m.name,
                &format!("{} W / {} L · {} min", m.matches_won, m.matches_lost, m.time_played),
            )
        })
        .collect();
    let maps: String = report
        .maps
        .iter()
        .map(|m| cell(&m.name, &format!("{} W / {} L", m.matches_won, m.matches_lost)))
        .collect();
    let stats = &report.stats;
    let overview = [
        cell("Kills", &stats.kills),
        cell("Player kills", &stats.player_kills),
        cell("Deaths", &stats.deaths),
        cell("K/D", &stats.kill_death),
        cell("KPM", &stats.kills_per_minute),
        cell("Assists", &stats.assists),
        cell("Revives", &stats.revives),
        cell("Minutes", &stats.time_played),
    ]
    .concat();

    let body = [
        format!(
            "<h2>{}</h2><p>{} · {} matches, {} W / {} L</p>",
            esc(&stats.user_name),
            esc(&report.timestamp),
            report.matches,
            report.wins,
            report.losses
        ),
        format!(
            "<h3>{}</h3><p>{}</p>",
            esc(&commentary.title),
            esc(&commentary.body)
        ),
        format!("<div class=\"grid\">{overview}</div>"),
        format!("<h3>Modes</h3><div class=\"grid\">{modes}</div>"),
        format!("<h3>Maps</h3><div class=\"grid\">{maps}</div>"),
        section("Weapons", &report.weapons, MATCH_WEAPONS, weapon_row),
        section("Vehicles", &report.vehicles, MATCH_VEHICLES, vehicle_row),
        section("Soldiers", &report.soldiers, MATCH_SOLDIERS, soldier_row),
    ]
    .concat();
    page(background_color(Game::Bf6), &assets.bf6_background(), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(name: &str) -> Weapon {
        Weapon {
            name: name.to_string(),
            category: "突击步枪".to_string(),
            image_url: String::new(),
            kills: "10".to_string(),
            kills_per_minute: "1.0".to_string(),
            accuracy: "--".to_string(),
            headshot_percentage: "--".to_string(),
            damage_dealt: "--".to_string(),
            shots_fired: "--".to_string(),
            shots_hit: "--".to_string(),
            headshot_kills: "--".to_string(),
            multi_kills: "--".to_string(),
            time_played: "1.0".to_string(),
        }
    }

    fn report(game: Game, weapons: usize) -> PlayerReport {
        PlayerReport {
            game,
            stats: PlayerStats {
                user_name: "<Shadow>".to_string(),
                ..PlayerStats::default()
            },
            weapons: (0..weapons).map(|i| weapon(&format!("gun-{i}"))).collect(),
            vehicles: Vec::new(),
            soldiers: Vec::new(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(esc("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_summary_shows_three_weapons() {
        let assets = Assets::new("https://assets.test");
        let html = summary_card(&report(Game::Bfv, 5), &assets);
        assert!(html.contains("gun-2"));
        assert!(!html.contains("gun-3"));
        assert!(html.contains("&lt;Shadow&gt;"));
        assert!(html.contains("https://assets.test/banners/bfv.jpg"));
        assert!(html.contains("https://assets.test/avatar/default.png"));
    }

    #[test]
    fn test_weapons_card_shows_all() {
        let assets = Assets::new("https://assets.test");
        let html = weapons_card(&report(Game::Bf2042, 12), &assets);
        assert!(html.contains("gun-11"));
    }

    #[test]
    fn test_bf6_banner_without_soldiers_falls_back() {
        let assets = Assets::new("https://assets.test");
        let html = summary_card(&report(Game::Bf6, 0), &assets);
        assert!(html.contains("https://assets.test/banners/bf6.jpg"));
        assert!(!html.contains("<h3>Weapons</h3>"));
    }
}
