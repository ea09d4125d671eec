// Display formatting shared by every view-model: numbers, durations,
// percentiles, timestamps and rank tiers.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike, Utc};

const RANK_IMAGE_BASE: &str = "http://tutu.shooting-star-c.top/i/2025/10/13";

/// Compact a large value: `1.5G`, `2.5M`, `1.2K`, otherwise the plain number.
/// Thresholds are strict, so exactly one thousand stays `1000`.
pub fn format_large_number(value: f64) -> String {
    if value > 1_000_000_000.0 {
        format!("{:.1}G", value / 1_000_000_000.0)
    } else if value > 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value > 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format_plain(value)
    }
}

/// Print a number without a trailing `.0` when it is whole.
pub fn format_plain(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Seconds to hours, one decimal. Used for lifetime (profile) figures.
pub fn seconds_to_hours(seconds: f64) -> String {
    format!("{:.1}", seconds / 3600.0)
}

/// Seconds to minutes, one decimal. Used for single-match figures.
pub fn seconds_to_minutes(seconds: f64) -> String {
    format!("{:.1}", seconds / 60.0)
}

/// Upstream percentiles count from the bottom; the cards show "top x %".
pub fn top_percent(percentile: Option<f64>) -> String {
    let top = ((100.0 - percentile.unwrap_or(0.0)) * 100.0).round() / 100.0;
    format_plain(top)
}

fn day_period(hour: u32) -> &'static str {
    match hour {
        0..=4 => "凌晨",
        5..=8 => "早上",
        9..=11 => "上午",
        12 => "中午",
        13..=17 => "下午",
        _ => "晚上",
    }
}

/// Render an ISO-8601 timestamp in UTC+8 as `YYYY/MM/DD <period>hh:mm`
/// on a 12-hour clock. A timestamp without an offset is taken as UTC.
pub fn format_match_time(raw: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
        });
    let (Ok(utc), Some(tz)) = (parsed, FixedOffset::east_opt(8 * 3600)) else {
        return format!("Invalid datetime: {raw}");
    };
    let local = utc.with_timezone(&tz);
    let hour = local.hour();
    let clock = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!(
        "{} {}{:02}:{:02}",
        local.format("%Y/%m/%d"),
        day_period(hour),
        clock,
        local.minute()
    )
}

/// Timestamp printed in the footer of every card.
pub fn update_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Bucket a career level into its rank-badge tier.
///
/// Tiers are per level up to 50, per 5 up to 90, per 10 up to 490 and
/// per 500 up to 5000. Levels 491 to 499 share the 490 badge, and
/// anything above 5000 uses the 5000 badge.
///
/// The 491 to 499 range intentionally differs from the original plugin,
/// which showed the `000` badge there. Keep it on 490.
pub fn rank_tier(level: i64) -> String {
    let level = level.max(0);
    match level {
        0..=50 => format!("{level:03}"),
        51..=90 => format!("{:03}", level / 5 * 5),
        91..=490 => format!("{:03}", level / 10 * 10),
        491..=499 => "490".to_string(),
        500..=5000 => format!("{:03}", (level / 500 * 500).min(5000)),
        _ => "5000".to_string(),
    }
}

/// Badge image for a level as displayed upstream (`"1,234"` is accepted).
pub fn rank_image_url(display_level: &str) -> Option<String> {
    let digits: String = display_level.chars().filter(|c| *c != ',').collect();
    let level = digits.trim().parse::<i64>().ok()?;
    Some(format!(
        "{RANK_IMAGE_BASE}/t_ui_rank_{}_lg.png",
        rank_tier(level)
    ))
}
