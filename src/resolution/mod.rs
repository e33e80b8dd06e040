//! Post-battle resolution: scoring, cooldowns, stat updates, reporting
//!
//! Every step after the score is fail-soft. A dead network or a full
//! disk never takes the battle result away from the player; it just
//! lands in the summary's failure list.

pub mod cooldown;
pub mod stats;
pub mod submit;

pub use cooldown::{CooldownLedger, CooldownRecord};
pub use stats::{apply_battle_stats, stage_profile, take_staged_profile, StagedProfile};
pub use submit::{submit_battle_result, BattleAuthority, CaptureOutcome, ResolutionSummary};
