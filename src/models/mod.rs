// View-models built from upstream JSON.

pub mod curate;
pub mod loadout;
pub mod matches;
pub mod player;
pub mod server;
pub mod wire;

pub use loadout::{Soldier, Vehicle, Weapon};
pub use matches::{Map, MatchReport, Mode};
pub use player::PlayerStats;
pub use server::Server;
