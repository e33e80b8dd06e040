//! Battle system - timer-driven duels against a location's defender
//!
//! A battle is a session between the player and one opponent. The player
//! attacks on demand; the opponent strikes back on a randomized schedule.
//! First combatant to reach zero health loses.

pub mod combatant;
pub mod damage;
pub mod score;
pub mod session;

// Re-exports for convenient access
pub use combatant::{Combatant, FULL_HEALTH};
pub use damage::{damage_roll, DAMAGE_CAP, RANDOM_FACTOR_MAX, RANDOM_FACTOR_MIN};
pub use score::{battle_score, BASE_SCORE, LOSS_FLOOR, SPEED_BONUS_WINDOW_S, VICTORY_BONUS};
pub use session::{
    format_elapsed, BattleOutcome, BattlePhase, BattleReport, BattleSession, BattleSnapshot,
};
