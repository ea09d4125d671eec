// Community server listing entry (legacy games only).

use serde::Serialize;

use super::wire::{GtServer, Scalar};

#[derive(Debug, Clone, Serialize)]
pub struct Server {
    pub name: String,
    pub description: String,
    pub map: String,
    pub mode: String,
    pub image_url: String,
    /// `"<players>/<max>"`, with `[<queue>]` appended when a queue exists.
    pub occupancy: String,
    pub region: String,
}

impl Server {
    pub fn from_gametools(server: &GtServer) -> Self {
        let n = |v: &Option<Scalar>| v.as_ref().map(Scalar::as_f64).unwrap_or(0.0) as i64;
        let queue = n(&server.in_que);
        let mut occupancy = format!("{}/{}", n(&server.player_amount), n(&server.max_players));
        if queue > 0 {
            occupancy.push_str(&format!(" [{queue}]"));
        }
        let region = match (&server.region, &server.country) {
            (Some(r), Some(c)) if !c.is_empty() => format!("{r} / {c}"),
            (Some(r), _) => r.clone(),
            (None, Some(c)) => c.clone(),
            (None, None) => "--".to_string(),
        };
        Server {
            name: server.prefix.clone().unwrap_or_else(|| "--".to_string()),
            description: server.description.clone().unwrap_or_default(),
            map: server.current_map.clone().unwrap_or_else(|| "--".to_string()),
            mode: server.mode.clone().unwrap_or_else(|| "--".to_string()),
            image_url: server.url.clone().unwrap_or_default(),
            occupancy,
            region,
        }
    }
}
