//! Damage model for a single attack exchange
//!
//! Damage scales with the strength differential between attacker and
//! defender: an even matchup chips for 1-2 points, a maximal mismatch
//! lands up to the cap, and a hopelessly outmatched attacker lands
//! nothing at all.

use rand::Rng;

/// Lowest strength the model will consider
pub const STRENGTH_FLOOR: i64 = 1;

/// Highest strength the model will consider
pub const STRENGTH_CEIL: i64 = 100;

/// Largest hit a single exchange can land
pub const DAMAGE_CAP: u32 = 4;

/// Lower bound of the per-hit random factor (inclusive)
pub const RANDOM_FACTOR_MIN: f64 = 0.3;

/// Upper bound of the per-hit random factor (exclusive)
pub const RANDOM_FACTOR_MAX: f64 = 1.0;

/// Roll damage for one attack
///
/// The strength differential is normalized from [-99, 99] onto [0, 1],
/// scaled by a fresh random factor and the damage cap, then rounded.
/// With the maximal differential the factor floor guarantees at least
/// one point lands; with the minimal differential nothing ever does.
pub fn damage_roll(attacker_strength: i64, defender_strength: i64, rng: &mut impl Rng) -> u32 {
    let attacker = attacker_strength.clamp(STRENGTH_FLOOR, STRENGTH_CEIL);
    let defender = defender_strength.clamp(STRENGTH_FLOOR, STRENGTH_CEIL);

    let diff = (attacker - defender) as f64;
    let normalized = (diff + 99.0) / 198.0;
    let factor = rng.gen_range(RANDOM_FACTOR_MIN..RANDOM_FACTOR_MAX);

    let raw = normalized * factor * DAMAGE_CAP as f64;
    (raw.round() as u32).min(DAMAGE_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Swings needed to take 100 health down to zero
    fn swings_to_finish(attacker: i64, defender: i64, rng: &mut impl Rng) -> u32 {
        let mut health = 100i64;
        let mut swings = 0;
        while health > 0 {
            health -= damage_roll(attacker, defender, rng) as i64;
            swings += 1;
            assert!(swings <= 10_000, "matchup cannot finish");
        }
        swings
    }

    #[test]
    fn test_damage_stays_within_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(damage_roll(100, 1, &mut rng) <= DAMAGE_CAP);
            assert!(damage_roll(50, 50, &mut rng) <= DAMAGE_CAP);
        }
    }

    #[test]
    fn test_max_differential_always_lands() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..1000 {
            assert!(damage_roll(100, 1, &mut rng) >= 1);
        }
    }

    #[test]
    fn test_min_differential_never_lands() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1000 {
            assert_eq!(damage_roll(1, 100, &mut rng), 0);
        }
    }

    #[test]
    fn test_out_of_range_strengths_clamp() {
        let mut a = ChaCha8Rng::seed_from_u64(4);
        let mut b = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..100 {
            assert_eq!(damage_roll(5_000, -20, &mut a), damage_roll(100, 1, &mut b));
        }
    }

    #[test]
    fn test_even_matchup_chips_in_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let total: u32 = (0..10_000).map(|_| damage_roll(50, 50, &mut rng)).sum();
        let mean = total as f64 / 10_000.0;
        assert!(mean > 1.0 && mean < 2.0, "mean damage was {}", mean);
    }

    #[test]
    fn test_stronger_attacker_finishes_no_later() {
        // Same factor stream for both matchups, so the comparison is
        // exact: a bigger differential can only shorten the fight.
        for seed in 0..20 {
            let mut strong = ChaCha8Rng::seed_from_u64(seed);
            let mut even = ChaCha8Rng::seed_from_u64(seed);
            assert!(
                swings_to_finish(100, 1, &mut strong) <= swings_to_finish(50, 50, &mut even)
            );
        }
    }
}
