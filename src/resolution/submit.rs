//! Battle result submission
//!
//! Runs the post-battle pipeline in order: score, cooldown, optimistic
//! stats, remote report. Each step that can fail is fail-soft; its
//! error is logged, recorded in the summary, and the pipeline moves on.
//! Claiming ownership of the location is a separate call the caller
//! makes only after a confirmed capture.

use rand::Rng;

use crate::api::models::PlayerProfile;
use crate::battle::score::battle_score;
use crate::battle::session::{BattleOutcome, BattleReport};
use crate::core::error::Result;
use crate::core::types::{now_ms, LocationId};
use crate::resolution::cooldown::CooldownLedger;
use crate::resolution::stats::{apply_battle_stats, stage_profile};
use crate::storage::KeyValueStore;

/// Backend that adjudicates battle reports
#[allow(async_fn_in_trait)]
pub trait BattleAuthority {
    /// Report a finished battle; returns the server's verdict message.
    async fn report_battle(&self, location: LocationId, score: u32) -> Result<String>;

    /// Claim ownership of a captured location.
    async fn claim_ownership(&self, location: LocationId) -> Result<()>;
}

/// How the capture attempt landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Local victory confirmed by the server; ownership can be claimed
    Captured,
    /// Local victory, but the server scored someone else higher
    Contested,
    /// Local defeat
    Defeated,
    /// The report never reached the server
    Unreported,
}

/// Everything the caller needs to show after a battle
#[derive(Debug, Clone)]
pub struct ResolutionSummary {
    pub score: u32,
    pub capture: CaptureOutcome,
    pub updated_profile: PlayerProfile,
    pub failures: Vec<String>,
}

pub async fn submit_battle_result(
    report: &BattleReport,
    profile: &PlayerProfile,
    authority: &impl BattleAuthority,
    ledger: &CooldownLedger,
    store: &dyn KeyValueStore,
    rng: &mut impl Rng,
) -> ResolutionSummary {
    let score = battle_score(report.outcome, report.elapsed_seconds, report.player_health);
    let mut failures = Vec::new();
    let now = now_ms();

    if let Err(e) = ledger.record(report.location_id, now) {
        tracing::warn!("Failed to record battle cooldown: {}", e);
        failures.push(format!("cooldown: {e}"));
    }

    let mut updated_profile = profile.clone();
    apply_battle_stats(&mut updated_profile, report.outcome, rng);
    if let Err(e) = stage_profile(store, &updated_profile, now) {
        tracing::warn!("Failed to stage profile update: {}", e);
        failures.push(format!("profile: {e}"));
    }

    let capture = match authority.report_battle(report.location_id, score).await {
        Ok(verdict) => classify_capture(report.outcome, &verdict),
        Err(e) => {
            tracing::warn!("Failed to report battle result: {}", e);
            failures.push(format!("report: {e}"));
            CaptureOutcome::Unreported
        }
    };

    ResolutionSummary {
        score,
        capture,
        updated_profile,
        failures,
    }
}

fn classify_capture(outcome: BattleOutcome, verdict: &str) -> CaptureOutcome {
    match outcome {
        BattleOutcome::Victory if verdict == "win" => CaptureOutcome::Captured,
        BattleOutcome::Victory => CaptureOutcome::Contested,
        BattleOutcome::Defeat => CaptureOutcome::Defeated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_capture() {
        assert_eq!(
            classify_capture(BattleOutcome::Victory, "win"),
            CaptureOutcome::Captured
        );
        assert_eq!(
            classify_capture(BattleOutcome::Victory, "lose"),
            CaptureOutcome::Contested
        );
        // A defeat is a defeat no matter what the server says
        assert_eq!(
            classify_capture(BattleOutcome::Defeat, "win"),
            CaptureOutcome::Defeated
        );
    }
}
