// Game back-ends: one per upstream API family, selected once per request.

pub mod legacy;
pub mod tracker;

pub use legacy::LegacyBackend;
pub use tracker::TrackerBackend;

use async_trait::async_trait;

use crate::error::PluginError;
use crate::game::Game;
use crate::models::{MatchReport, PlayerStats, Server, Soldier, Vehicle, Weapon};
use crate::parser::MAX_PAGE;
use crate::request::PlayerDataRequest;

/// Shape of a player lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Summary,
    Weapons,
    Vehicles,
    Soldiers,
}

impl Query {
    pub fn name(self) -> &'static str {
        match self {
            Query::Summary => "stat",
            Query::Weapons => "weapons",
            Query::Vehicles => "vehicles",
            Query::Soldiers => "soldiers",
        }
    }
}

/// Normalized player data. Lists are curated and sorted, longest first;
/// lists the query did not ask for are empty.
#[derive(Debug, Clone)]
pub struct PlayerReport {
    pub game: Game,
    pub stats: PlayerStats,
    pub weapons: Vec<Weapon>,
    pub vehicles: Vec<Vehicle>,
    pub soldiers: Vec<Soldier>,
}

/// One page of the recent-matches feed.
#[derive(Debug, Clone)]
pub struct MatchPage {
    pub report: MatchReport,
    pub page: u32,
    /// Set when the feed holds another match and the page limit allows it.
    pub next_page: Option<u32>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameBackend: Send + Sync {
    async fn player_report(
        &self,
        request: &PlayerDataRequest,
        query: Query,
    ) -> Result<PlayerReport, PluginError>;

    async fn servers(&self, request: &PlayerDataRequest) -> Result<Vec<Server>, PluginError> {
        Err(unsupported(request.game, "Server lookup", &[Game::Bf4, Game::Bf1, Game::Bfv]))
    }

    async fn recent_match(&self, request: &PlayerDataRequest) -> Result<MatchPage, PluginError> {
        Err(unsupported(request.game, "Recent match lookup", &[Game::Bf6]))
    }
}

pub(crate) fn unsupported(game: Game, operation: &str, supported: &[Game]) -> PluginError {
    PluginError::GameNotSupportedForOperation {
        game: game.code().to_string(),
        operation: operation.to_string(),
        supported: supported.to_vec(),
    }
}

// ── Pagination ────────────────────────────────────────────────────────

/// Clamp a requested page into `1..=MAX_PAGE`.
pub fn clamp_page(page: u32) -> u32 {
    page.clamp(1, MAX_PAGE)
}

/// Index of a 1-based page in a list of `len` entries, if it exists.
pub fn select_page(len: usize, page: u32) -> Option<usize> {
    let page = page as usize;
    (page >= 1 && page <= len).then(|| page - 1)
}

/// Next page number, offered only below the limit and when it holds data.
pub fn next_page(len: usize, page: u32) -> Option<u32> {
    (page < MAX_PAGE && len > page as usize).then(|| page + 1)
}

/// Command a user can send to fetch the next recent-match page.
pub fn next_page_command(prefix: &str, name: &str, pider: Option<&str>, page: u32) -> String {
    match pider.filter(|p| !p.is_empty()) {
        Some(pider) => format!("{prefix}recent {name},game=bf6,pider={pider},page={page}"),
        None => format!("{prefix}recent {name},game=bf6,page={page}"),
    }
}
