//! Game configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their
//! purpose and how they interact with each other.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the battle client
///
/// These values have been tuned to match the live game's pacing.
/// Changing them will affect battle feel and capture churn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === ARENA GATING ===
    /// Radius around a location within which a battle may start (meters)
    ///
    /// Locations are real-world landmarks a few tens of meters apart,
    /// so the radius has to be tight enough that players commit to one.
    pub arena_radius_m: f64,

    /// How long a location stays locked after a battle there (seconds)
    ///
    /// Applies to wins and losses alike, so a winner cannot immediately
    /// farm the same location and a loser gets time to recover.
    pub cooldown_seconds: u64,

    // === BATTLE TIMERS ===
    /// Shortest delay before the next opponent strike (milliseconds, inclusive)
    pub opponent_attack_min_ms: u64,

    /// Longest delay before the next opponent strike (milliseconds, exclusive)
    ///
    /// Each strike re-arms with a fresh draw from
    /// [opponent_attack_min_ms, opponent_attack_max_ms), so the rhythm
    /// stays unpredictable within the window.
    pub opponent_attack_max_ms: u64,

    // === COMBAT ===
    /// Strength assumed for a defender with no readable profile
    ///
    /// At 50 the matchup is dead even, so an unowned or freshly synced
    /// location is neither free nor punishing.
    pub fallback_defender_strength: i64,

    // === BACKEND ===
    /// Base URL of the remote game backend
    pub api_base_url: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Gating
            arena_radius_m: 100.0,
            cooldown_seconds: 60,

            // Opponent strike window
            opponent_attack_min_ms: 1200,
            opponent_attack_max_ms: 3000,

            // Combat
            fallback_defender_strength: 50,

            // Backend
            api_base_url: "http://localhost:5000".into(),
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let config: GameConfig = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.arena_radius_m <= 0.0 {
            return Err(format!(
                "arena_radius_m ({}) must be positive",
                self.arena_radius_m
            ));
        }

        if self.cooldown_seconds == 0 {
            return Err("cooldown_seconds must be positive".into());
        }

        // The strike window must be a non-empty half-open range
        if self.opponent_attack_min_ms == 0
            || self.opponent_attack_min_ms >= self.opponent_attack_max_ms
        {
            return Err(format!(
                "opponent attack window [{}, {}) is not a valid range",
                self.opponent_attack_min_ms, self.opponent_attack_max_ms
            ));
        }

        if !(1..=100).contains(&self.fallback_defender_strength) {
            return Err(format!(
                "fallback_defender_strength ({}) must be within [1, 100]",
                self.fallback_defender_strength
            ));
        }

        if self.api_base_url.is_empty() {
            return Err("api_base_url must not be empty".into());
        }

        Ok(())
    }
}
