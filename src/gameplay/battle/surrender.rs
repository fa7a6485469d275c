//! When the battle pauses to offer the enemy's surrender.

use bevy::prelude::*;

use crate::config::BattleConfig;

/// Roster sizes captured at battle start, divided down into trigger points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct SurrenderThresholds {
    /// Offer once enemies are at or below this (and above zero).
    pub enemies: usize,
    /// ...provided at least this many friendlies remain.
    pub friendlies: usize,
}

impl SurrenderThresholds {
    /// Integer division of the starting counts; a zero divisor is treated as one.
    #[must_use]
    pub fn from_start(friendly_count: usize, enemy_count: usize, config: &BattleConfig) -> Self {
        Self {
            enemies: enemy_count / config.enemy_surrender_divisor.max(1),
            friendlies: friendly_count / config.friendly_surrender_divisor.max(1),
        }
    }

    #[must_use]
    pub const fn should_offer(&self, friendly_remaining: usize, enemy_remaining: usize) -> bool {
        enemy_remaining != 0
            && enemy_remaining <= self.enemies
            && friendly_remaining >= self.friendlies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn thresholds() -> SurrenderThresholds {
        SurrenderThresholds::from_start(10, 9, &BattleConfig::default())
    }

    #[test]
    fn thresholds_divide_starting_counts() {
        assert_eq!(
            thresholds(),
            SurrenderThresholds {
                enemies: 3,
                friendlies: 5
            }
        );
    }

    #[test]
    fn offer_at_enemy_threshold_with_enough_friendlies() {
        assert!(thresholds().should_offer(5, 3));
        assert!(!thresholds().should_offer(5, 4));
    }

    #[test]
    fn no_offer_when_friendlies_are_depleted() {
        assert!(!thresholds().should_offer(4, 2));
    }

    #[test]
    fn no_offer_once_enemies_are_gone() {
        assert!(!thresholds().should_offer(10, 0));
    }

    #[test]
    fn small_enemy_roster_never_offers() {
        let small = SurrenderThresholds::from_start(4, 2, &BattleConfig::default());
        assert_eq!(small.enemies, 0);
        assert!(!small.should_offer(4, 1));
    }
}
