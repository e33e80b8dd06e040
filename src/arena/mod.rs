//! Arena entry gating
//!
//! Three gates, checked in order: the player must be signed in, the
//! location must not be cooling down from a recent battle, and the
//! player must be inside the arena radius. The first gate that fails
//! names the refusal; later gates are not evaluated.

use tokio::sync::oneshot;

use crate::api::auth::AuthSession;
use crate::api::client::ApiClient;
use crate::api::models::{LocationRecord, PlayerProfile};
use crate::battle::combatant::Combatant;
use crate::battle::session::{format_elapsed, BattleReport, BattleSession};
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{now_ms, Coordinates, UnixMillis, UserId};
use crate::geofence::haversine_meters;
use crate::resolution::cooldown::CooldownLedger;

/// Why the player may not battle here right now
#[derive(Debug, Clone, PartialEq)]
pub enum EntryRefusal {
    NotSignedIn,
    CoolingDown { remaining_ms: u64 },
    OutOfRange { distance_m: f64, radius_m: f64 },
}

impl std::fmt::Display for EntryRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSignedIn => write!(f, "sign in before battling"),
            Self::CoolingDown { remaining_ms } => write!(
                f,
                "location is cooling down, try again in {}",
                format_elapsed(remaining_ms.div_ceil(1000))
            ),
            Self::OutOfRange {
                distance_m,
                radius_m,
            } => write!(
                f,
                "too far away: {:.0}m from the arena ({:.0}m radius)",
                distance_m, radius_m
            ),
        }
    }
}

impl From<EntryRefusal> for GameError {
    fn from(refusal: EntryRefusal) -> Self {
        GameError::ValidationFailure(refusal.to_string())
    }
}

/// Run the entry gates without touching the network
pub fn check_entry<'a>(
    auth: Option<&'a AuthSession>,
    location: &LocationRecord,
    position: Coordinates,
    ledger: &CooldownLedger,
    config: &GameConfig,
    now: UnixMillis,
) -> std::result::Result<&'a AuthSession, EntryRefusal> {
    let auth = auth.ok_or(EntryRefusal::NotSignedIn)?;

    match ledger.remaining(location.id, now) {
        Ok(Some(remaining_ms)) => return Err(EntryRefusal::CoolingDown { remaining_ms }),
        Ok(None) => {}
        Err(e) => {
            // An unreadable ledger must not lock the player out
            tracing::warn!("Cooldown check failed, allowing entry: {}", e);
        }
    }

    let distance_m = haversine_meters(position, location.coordinates());
    if distance_m > config.arena_radius_m {
        return Err(EntryRefusal::OutOfRange {
            distance_m,
            radius_m: config.arena_radius_m,
        });
    }

    Ok(auth)
}

/// A gated, ready-to-start battle
pub struct ArenaEntry {
    pub session: BattleSession,
    pub report_rx: oneshot::Receiver<BattleReport>,
    pub player_profile: PlayerProfile,
}

/// Pass the gates, fetch both combatants, and stage a battle session
pub async fn enter(
    client: &ApiClient,
    auth: Option<&AuthSession>,
    ledger: &CooldownLedger,
    config: &GameConfig,
    location: &LocationRecord,
    position: Coordinates,
) -> Result<ArenaEntry> {
    let auth = check_entry(auth, location, position, ledger, config, now_ms())?;

    let player_profile = client.get_profile(auth.user_id).await?;
    let player = Combatant::new(player_profile.username.clone(), player_profile.strength);
    let opponent = fetch_defender(client, location, config, auth.user_id).await;

    let (session, report_rx) = BattleSession::new(location.id, player, opponent, config);
    tracing::info!(
        "Entered the arena at {} against {}",
        location.name,
        session.snapshot().opponent_name
    );
    Ok(ArenaEntry {
        session,
        report_rx,
        player_profile,
    })
}

/// Resolve the defending combatant
///
/// Fights the strongest owner when the location has one that is not
/// the player; otherwise a stand-in defender with the configured
/// fallback strength holds the location.
async fn fetch_defender(
    client: &ApiClient,
    location: &LocationRecord,
    config: &GameConfig,
    own_id: UserId,
) -> Combatant {
    if let Some(owner_id) = location.strongest_owner() {
        if owner_id != own_id {
            match client.get_profile(owner_id).await {
                Ok(profile) => return Combatant::new(profile.username, profile.strength),
                Err(e) => {
                    tracing::warn!("Failed to fetch defender profile: {}", e);
                }
            }
        }
    }

    let name = if location.owner_team_name.is_empty() {
        format!("{} defender", location.name)
    } else {
        location.owner_team_name.clone()
    };
    Combatant::new(name, config.fallback_defender_strength)
}
