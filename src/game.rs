// Supported game catalogue: codes, aliases, API family and query language.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported game. The set is closed; anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Bf4,
    Bf1,
    Bfv,
    Bf6,
    Bf2042,
}

/// Which upstream statistics service serves a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    /// The gametools API (bf4, bf1, bfv).
    Legacy,
    /// The tracker API (bf2042, bf6).
    Tracker,
}

impl Game {
    pub const ALL: [Game; 5] = [Game::Bf4, Game::Bf1, Game::Bfv, Game::Bf6, Game::Bf2042];

    pub fn code(self) -> &'static str {
        match self {
            Game::Bf4 => "bf4",
            Game::Bf1 => "bf1",
            Game::Bfv => "bfv",
            Game::Bf6 => "bf6",
            Game::Bf2042 => "bf2042",
        }
    }

    /// Resolve a user-typed code, applying the legacy aliases.
    pub fn parse(input: &str) -> Option<Game> {
        let code = input.trim().to_ascii_lowercase();
        let code = match code.as_str() {
            "bf5" => "bfv",
            "2042" => "bf2042",
            other => other,
        };
        Game::ALL.into_iter().find(|g| g.code() == code)
    }

    pub fn family(self) -> ApiFamily {
        match self {
            Game::Bf4 | Game::Bf1 | Game::Bfv => ApiFamily::Legacy,
            Game::Bf6 | Game::Bf2042 => ApiFamily::Tracker,
        }
    }

    /// Query language sent upstream. bf1 data is published in traditional Chinese.
    pub fn lang(self) -> &'static str {
        match self {
            Game::Bf1 => "zh-tw",
            _ => "zh-cn",
        }
    }

    pub fn supported_codes() -> String {
        Game::ALL
            .iter()
            .map(|g| g.code())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn legacy_codes() -> String {
        Game::ALL
            .iter()
            .filter(|g| g.family() == ApiFamily::Legacy)
            .map(|g| g.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
