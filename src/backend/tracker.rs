// bf2042 / bf6 through the tracker API.

use async_trait::async_trait;
use serde_json::Value;

use super::{clamp_page, next_page, select_page, unsupported, GameBackend, MatchPage, PlayerReport, Query};
use crate::error::{AccountCandidate, PluginError};
use crate::game::Game;
use crate::models::curate::{curate_by_path, into_items, split_segments};
use crate::models::wire::{decode, MatchesResponse, Scalar, TrackerProfile};
use crate::models::{MatchReport, PlayerStats, Soldier, Vehicle, Weapon};
use crate::request::PlayerDataRequest;
use crate::upstream::tracker::TrackerClient;
use crate::upstream::Params;

const PROFILE_SORT_KEY: &str = "stats.kills.value";

pub struct TrackerBackend {
    client: TrackerClient,
    /// Wake prefix echoed in the multi-account hint.
    prefix: String,
}

impl TrackerBackend {
    pub fn new(client: TrackerClient, prefix: &str) -> Self {
        Self {
            client,
            prefix: prefix.to_string(),
        }
    }

    fn identity(request: &PlayerDataRequest) -> Params {
        vec![
            ("player_name", request.ea_name.clone().unwrap_or_default()),
            ("game", request.game.code().to_string()),
            ("pider", request.pider.clone().unwrap_or_default()),
        ]
    }

    async fn profile(
        &self,
        path: &str,
        request: &PlayerDataRequest,
    ) -> Result<TrackerProfile, PluginError> {
        let body = self.client.get(path, Self::identity(request)).await?;
        check_profile(body, request.display_name(), &self.prefix)
    }

    async fn list(&self, path: &str, request: &PlayerDataRequest) -> Result<Vec<Value>, PluginError> {
        let body = self.client.get(path, Self::identity(request)).await?;
        if let Value::String(text) = &body {
            if is_private(text) {
                return Err(PluginError::PrivateData);
            }
        }
        Ok(into_items(body))
    }

    async fn bf2042_report(
        &self,
        request: &PlayerDataRequest,
        query: Query,
    ) -> Result<PlayerReport, PluginError> {
        let profile = self.profile("/player/stat", request).await?;
        let stats = PlayerStats::from_bf2042(&profile)?;

        let wants = |q: Query| query == Query::Summary || query == q;
        let mut report = PlayerReport {
            game: request.game,
            stats,
            weapons: Vec::new(),
            vehicles: Vec::new(),
            soldiers: Vec::new(),
        };
        if wants(Query::Weapons) {
            let raw = self.list("/player/weapons", request).await?;
            report.weapons = build_all(curate_by_path(raw, PROFILE_SORT_KEY), Weapon::from_bf2042)?;
        }
        if wants(Query::Vehicles) {
            let raw = self.list("/player/vehicles", request).await?;
            report.vehicles = build_all(curate_by_path(raw, PROFILE_SORT_KEY), Vehicle::from_bf2042)?;
        }
        if wants(Query::Soldiers) {
            let raw = self.list("/player/soldiers", request).await?;
            report.soldiers = build_all(curate_by_path(raw, PROFILE_SORT_KEY), Soldier::from_bf2042)?;
        }
        Ok(report)
    }

    async fn bf6_report(
        &self,
        request: &PlayerDataRequest,
        query: Query,
    ) -> Result<PlayerReport, PluginError> {
        let profile = self.profile("/bf6/stat", request).await?;
        let stats = PlayerStats::from_bf6(&profile)?;
        let segments = split_segments(&profile.segments);

        let wants = |q: Query| query == Query::Summary || query == q;
        // The summary banner depends on the top soldier, so it is always built.
        let soldiers = build_all(curate_by_path(segments.kits, PROFILE_SORT_KEY), Soldier::from_bf6)?;
        Ok(PlayerReport {
            game: request.game,
            stats,
            weapons: if wants(Query::Weapons) {
                build_all(curate_by_path(segments.weapons, PROFILE_SORT_KEY), Weapon::from_bf6)?
            } else {
                Vec::new()
            },
            vehicles: if wants(Query::Vehicles) {
                build_all(curate_by_path(segments.vehicles, PROFILE_SORT_KEY), Vehicle::from_bf6)?
            } else {
                Vec::new()
            },
            soldiers: if wants(Query::Soldiers) { soldiers } else { Vec::new() },
        })
    }
}

fn build_all<T>(
    items: Vec<Value>,
    build: fn(&Value) -> Result<T, PluginError>,
) -> Result<Vec<T>, PluginError> {
    items.iter().map(build).collect()
}

fn is_private(text: &str) -> bool {
    text.contains("私有") || text.to_lowercase().contains("private")
}

/// Decode a profile body, short-circuiting the two terminal replies:
/// a list of candidate accounts and a privacy notice.
pub(crate) fn check_profile(
    body: Value,
    name: &str,
    prefix: &str,
) -> Result<TrackerProfile, PluginError> {
    match body {
        Value::Array(list) => {
            let candidates = list
                .iter()
                .map(|user| AccountCandidate {
                    handle: candidate_field(user, "platformUserHandle"),
                    identifier: candidate_field(user, "platformUserIdentifier"),
                })
                .collect();
            tracing::info!(name, "Account name matched several players");
            Err(PluginError::MultipleUsers {
                name: name.to_string(),
                candidates,
                prefix: prefix.to_string(),
            })
        }
        Value::String(text) if is_private(&text) => Err(PluginError::PrivateData),
        Value::String(text) => Err(PluginError::Api {
            status: 200,
            body: text,
        }),
        other => decode(&other, "player profile"),
    }
}

fn candidate_field(user: &Value, key: &str) -> String {
    user.get(key)
        .and_then(|v| serde_json::from_value::<Scalar>(v.clone()).ok())
        .map(|s| s.display())
        .unwrap_or_else(|| "unknown".to_string())
}

#[async_trait]
impl GameBackend for TrackerBackend {
    async fn player_report(
        &self,
        request: &PlayerDataRequest,
        query: Query,
    ) -> Result<PlayerReport, PluginError> {
        match request.game {
            Game::Bf6 => self.bf6_report(request, query).await,
            Game::Bf2042 => self.bf2042_report(request, query).await,
            other => Err(unsupported(other, "This lookup", &[Game::Bf2042, Game::Bf6])),
        }
    }

    async fn recent_match(&self, request: &PlayerDataRequest) -> Result<MatchPage, PluginError> {
        if request.game != Game::Bf6 {
            return Err(unsupported(request.game, "Recent match lookup", &[Game::Bf6]));
        }
        let profile = self.profile("/bf6/stat", request).await?;
        let update_hash = profile.metadata.update_hash.clone().unwrap_or_default();
        let user_name = request
            .ea_name
            .clone()
            .unwrap_or_else(|| profile.handle());

        let body = self
            .client
            .get(
                "/bf6/matches",
                vec![
                    ("player_name", request.ea_name.clone().unwrap_or_default()),
                    ("pider", request.pider.clone().unwrap_or_default()),
                    ("update_hash", update_hash),
                ],
            )
            .await?;
        let feed: MatchesResponse = decode(&body, "match feed")?;

        let page = clamp_page(request.page);
        let index = select_page(feed.matches.len(), page)
            .ok_or_else(|| PluginError::NoData("data".to_string()))?;
        let report = MatchReport::from_entry(&feed.matches[index], &user_name)?;
        Ok(MatchPage {
            report,
            page,
            next_page: next_page(feed.matches.len(), page),
        })
    }
}
