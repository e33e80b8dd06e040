//! Battle participants

/// Health both sides hold at the start of a battle
pub const FULL_HEALTH: u32 = 100;

/// One side of a battle, built from a profile snapshot
#[derive(Debug, Clone)]
pub struct Combatant {
    pub display_name: String,
    /// Strength as the backend reports it; clamped at use by the damage model
    pub strength: i64,
    pub current_health: u32,
}

impl Combatant {
    pub fn new(display_name: impl Into<String>, strength: i64) -> Self {
        Self {
            display_name: display_name.into(),
            strength,
            current_health: FULL_HEALTH,
        }
    }

    pub fn reset_health(&mut self) {
        self.current_health = FULL_HEALTH;
    }

    /// Apply a hit, flooring health at zero. True when this hit knocked
    /// the combatant out.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.current_health = self.current_health.saturating_sub(amount);
        self.current_health == 0
    }

    pub fn is_defeated(&self) -> bool {
        self.current_health == 0
    }
}
