//! Optimistic profile stat updates
//!
//! Wins and losses are applied locally as soon as the battle ends, then
//! staged in the store for the profile screen to pick up. The staged
//! copy is consumed on read.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::api::models::PlayerProfile;
use crate::battle::session::BattleOutcome;
use crate::core::error::Result;
use crate::core::types::UnixMillis;
use crate::storage::KeyValueStore;

pub const STAGED_PROFILE_KEY: &str = "updated_profile";

/// A locally updated profile waiting to be displayed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedProfile {
    pub profile: PlayerProfile,
    pub updated_at_ms: UnixMillis,
}

/// Fold one battle result into the profile
///
/// A win adds one to three strength; a loss sheds up to two, never
/// dropping below one.
pub fn apply_battle_stats(
    profile: &mut PlayerProfile,
    outcome: BattleOutcome,
    rng: &mut impl Rng,
) {
    match outcome {
        BattleOutcome::Victory => {
            profile.wins += 1;
            profile.strength += rng.gen_range(1..=3);
        }
        BattleOutcome::Defeat => {
            profile.losses += 1;
            profile.strength = (profile.strength - rng.gen_range(0..=2)).max(1);
        }
    }
}

pub fn stage_profile(
    store: &dyn KeyValueStore,
    profile: &PlayerProfile,
    now: UnixMillis,
) -> Result<()> {
    let staged = StagedProfile {
        profile: profile.clone(),
        updated_at_ms: now,
    };
    store.set(STAGED_PROFILE_KEY, &serde_json::to_string(&staged)?)
}

/// Take the staged profile, if any. The entry is removed either way;
/// an unparseable entry reads as absent.
pub fn take_staged_profile(store: &dyn KeyValueStore) -> Result<Option<StagedProfile>> {
    let Some(raw) = store.get(STAGED_PROFILE_KEY)? else {
        return Ok(None);
    };
    store.remove(STAGED_PROFILE_KEY)?;
    Ok(serde_json::from_str(&raw).ok())
}
