//! Records exchanged with the backend
//!
//! The server omits fields it has no value for, so everything optional
//! defaults instead of failing deserialization.

use serde::{Deserialize, Serialize};

use crate::core::types::{Coordinates, LocationId, TeamId, UserId};

/// A player's public profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub username: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub strength: i64,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub image: Option<String>,
}

/// A capturable location as the server lists it
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRecord {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub owner_team: TeamId,
    #[serde(default)]
    pub owner_team_color: String,
    #[serde(default)]
    pub owner_team_name: String,
    #[serde(default)]
    pub owner_count: u32,
    #[serde(default)]
    pub owned_since: String,
    #[serde(default)]
    pub strongest_owner_id: u32,
}

impl LocationRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// The defender to fight, if the location has one. The server sends
    /// zero when nobody holds the location.
    pub fn strongest_owner(&self) -> Option<UserId> {
        (self.strongest_owner_id > 0).then(|| UserId(self.strongest_owner_id))
    }
}
