// bf4 / bf1 / bfv through the gametools API.

use async_trait::async_trait;
use serde_json::Value;

use super::{unsupported, GameBackend, PlayerReport, Query};
use crate::error::PluginError;
use crate::game::Game;
use crate::models::curate::curate_by_path;
use crate::models::wire::{decode, GtProfile, GtServerList};
use crate::models::{PlayerStats, Server, Vehicle, Weapon};
use crate::request::PlayerDataRequest;
use crate::upstream::gametools::{GametoolsClient, LegacyResponse};
use crate::upstream::Params;

/// List pages show at most this many weapons or vehicles.
const LIST_CAP: usize = 50;
const SERVER_LIMIT: &str = "30";

pub struct LegacyBackend {
    client: GametoolsClient,
    platform: String,
}

impl LegacyBackend {
    pub fn new(client: GametoolsClient, platform: &str) -> Self {
        Self {
            client,
            platform: platform.to_string(),
        }
    }

    fn player_params(&self, request: &PlayerDataRequest) -> Result<Params, PluginError> {
        let mut params: Params = Vec::new();
        match (request.ea_name.as_deref(), request.pider.as_deref()) {
            (Some(name), _) => params.push(("name", name.to_string())),
            (None, Some(pider)) => params.push(("playerid", pider.to_string())),
            (None, None) => {
                return Err(PluginError::InvalidParameter {
                    parameter: "ea_name".to_string(),
                    value: None,
                    expected: None,
                })
            }
        }
        params.push(("lang", request.game.lang().to_string()));
        params.push(("platform", self.platform.clone()));
        Ok(params)
    }

    async fn profile(
        &self,
        request: &PlayerDataRequest,
        prop: &str,
    ) -> Result<GtProfile, PluginError> {
        let params = self.player_params(request)?;
        match self.client.get(request.game, prop, &params).await? {
            LegacyResponse::Ok(body) => decode(&body, "player profile"),
            rejected @ LegacyResponse::Rejected { .. } => Err(PluginError::PlayerNotFound {
                name: request.display_name().to_string(),
                game: request.game.code().to_string(),
                detail: rejected.detail(),
            }),
        }
    }
}

fn curated<T>(
    raw: &[Value],
    cap: Option<usize>,
    build: fn(&Value) -> Result<T, PluginError>,
) -> Result<Vec<T>, PluginError> {
    let items = curate_by_path(raw.to_vec(), "kills");
    items
        .iter()
        .take(cap.unwrap_or(usize::MAX))
        .map(build)
        .collect()
}

#[async_trait]
impl GameBackend for LegacyBackend {
    async fn player_report(
        &self,
        request: &PlayerDataRequest,
        query: Query,
    ) -> Result<PlayerReport, PluginError> {
        let prop = match query {
            Query::Summary => "all",
            Query::Weapons => "weapons",
            Query::Vehicles => "vehicles",
            Query::Soldiers => {
                return Err(unsupported(
                    request.game,
                    "Soldier lookup",
                    &[Game::Bf2042, Game::Bf6],
                ))
            }
        };
        let profile = self.profile(request, prop).await?;
        tracing::debug!(game = %request.game, player = %profile.user_name, "Legacy profile decoded");

        let (weapons, vehicles) = match query {
            Query::Summary => (
                curated(&profile.weapons, None, Weapon::from_gametools)?,
                curated(&profile.vehicles, None, Vehicle::from_gametools)?,
            ),
            Query::Weapons => (
                curated(&profile.weapons, Some(LIST_CAP), Weapon::from_gametools)?,
                Vec::new(),
            ),
            _ => (
                Vec::new(),
                curated(&profile.vehicles, Some(LIST_CAP), Vehicle::from_gametools)?,
            ),
        };

        Ok(PlayerReport {
            game: request.game,
            stats: PlayerStats::from_gametools(&profile),
            weapons,
            vehicles,
            soldiers: Vec::new(),
        })
    }

    async fn servers(&self, request: &PlayerDataRequest) -> Result<Vec<Server>, PluginError> {
        let name = request
            .server_name
            .clone()
            .ok_or_else(|| PluginError::InvalidParameter {
                parameter: "server_name".to_string(),
                value: None,
                expected: None,
            })?;
        let params: Params = vec![
            ("name", name),
            ("lang", request.game.lang().to_string()),
            ("platform", self.platform.clone()),
            ("region", "all".to_string()),
            ("limit", SERVER_LIMIT.to_string()),
        ];
        let body = match self.client.get(request.game, "servers", &params).await? {
            LegacyResponse::Ok(body) => body,
            LegacyResponse::Rejected { status, body } => {
                return Err(PluginError::Api {
                    status,
                    body: body.to_string(),
                })
            }
        };
        let list: GtServerList = decode(&body, "server list")?;
        if list.servers.is_empty() {
            return Err(PluginError::NoData("matching servers".to_string()));
        }
        Ok(list.servers.iter().map(Server::from_gametools).collect())
    }
}
