// Command-argument parser: `name[,game=G][,pider=P][,page=N]`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::PluginError;

/// Largest page a user can ask for in the recent-matches feed.
pub const MAX_PAGE: u32 = 25;

lazy_static! {
    static ref ARGS_PATTERN: Regex = Regex::new(
        r"^([\w-]*)(?:[，,]?game=([\w\-+.]+))?(?:[，,]?pider=([\w\-+.]+))?(?:[，,]?page=(\d+))?$"
    )
    .expect("valid regex");
}

pub const FORMAT_HINT: &str =
    "Invalid format, expected: [name][,game=code][,pider=id][,page=n]";

/// Arguments recovered from one command message. Nothing is resolved yet:
/// absent values are filled from bindings and channel defaults later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    pub name: Option<String>,
    pub game: Option<String>,
    pub pider: Option<String>,
    pub page: u32,
}

/// Remove every trigger word and all whitespace from `message`.
///
/// Stripping repeats until nothing changes, so a remainder never still
/// contains a trigger that a second pass would remove.
pub fn strip_triggers(triggers: &[&str], message: &str) -> String {
    let mut current: String = message.chars().filter(|c| !c.is_whitespace()).collect();
    loop {
        let mut next = current.clone();
        for trigger in triggers.iter().filter(|t| !t.is_empty()) {
            next = next.replace(trigger, "");
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Parse the free-text argument of a command.
pub fn parse_command_args(triggers: &[&str], message: &str) -> Result<CommandArgs, PluginError> {
    let clean = strip_triggers(triggers, message);
    let caps = ARGS_PATTERN
        .captures(&clean)
        .ok_or_else(|| PluginError::UserInput(FORMAT_HINT.to_string()))?;

    let non_empty = |i: usize| {
        caps.get(i)
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty())
    };

    let page = match caps.get(4) {
        Some(m) => m
            .as_str()
            .parse::<u32>()
            .map_err(|_| PluginError::PageLimitExceeded { max: MAX_PAGE })?,
        None => 1,
    };

    Ok(CommandArgs {
        name: non_empty(1),
        game: non_empty(2),
        pider: non_empty(3),
        page,
    })
}
