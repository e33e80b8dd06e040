//! Battle score calculation
//!
//! The score feeds the backend's capture decision, so its exact values
//! matter: a fast, healthy win outranks a slow scrape, and a loss is
//! worth a flat participation score.

use crate::battle::session::BattleOutcome;

/// Points for fighting at all
pub const BASE_SCORE: u32 = 50;

/// Extra points for winning
pub const VICTORY_BONUS: u32 = 50;

/// Wins faster than this many seconds earn the remainder as a bonus
pub const SPEED_BONUS_WINDOW_S: u64 = 30;

/// Deduction applied to a losing score
pub const LOSS_PENALTY: u32 = 20;

/// A loss never scores below this
pub const LOSS_FLOOR: u32 = 10;

/// Score a resolved battle
///
/// A win earns the base, the victory bonus, up to 30 points of speed
/// bonus, and the player's remaining health. A loss always comes out
/// to the same flat score.
pub fn battle_score(outcome: BattleOutcome, elapsed_seconds: u64, player_health: u32) -> u32 {
    match outcome {
        BattleOutcome::Victory => {
            let speed_bonus = SPEED_BONUS_WINDOW_S.saturating_sub(elapsed_seconds) as u32;
            BASE_SCORE + VICTORY_BONUS + speed_bonus + player_health
        }
        BattleOutcome::Defeat => (BASE_SCORE - LOSS_PENALTY).max(LOSS_FLOOR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_healthy_win() {
        assert_eq!(battle_score(BattleOutcome::Victory, 10, 80), 200);
    }

    #[test]
    fn test_instant_flawless_win_is_the_ceiling() {
        assert_eq!(battle_score(BattleOutcome::Victory, 0, 100), 230);
    }

    #[test]
    fn test_slow_win_earns_no_speed_bonus() {
        assert_eq!(battle_score(BattleOutcome::Victory, 45, 20), 120);
        assert_eq!(battle_score(BattleOutcome::Victory, 30, 20), 120);
    }

    #[test]
    fn test_every_loss_scores_thirty() {
        assert_eq!(battle_score(BattleOutcome::Defeat, 0, 0), 30);
        assert_eq!(battle_score(BattleOutcome::Defeat, 500, 99), 30);
    }
}
