//! Attack loop: an explicit per-unit state machine advanced once per tick, plus the
//! variant-specific strike effects.

pub mod projectile;

use std::time::Duration;

use bevy::prelude::*;

use crate::BattleState;
use crate::gameplay::battle::Battle;
use crate::gameplay::units::{Unit, UnitId, UnitType};
use projectile::Projectile;

// === State ===

/// Where a unit is in its attack loop.
#[derive(Debug, Clone, PartialEq, Default, Reflect)]
pub enum AttackPhase {
    #[default]
    Idle,
    /// Attack started; the first strike lands on the next advance while the battle is running.
    Windup,
    /// Waiting out one attack period before striking again.
    Recovering(Timer),
}

impl AttackPhase {
    fn recovering(period: f32) -> Self {
        Self::Recovering(Timer::from_seconds(period, TimerMode::Once))
    }
}

/// Coarse per-unit activity derived from attack phase and navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum UnitActivity {
    Idle,
    Moving,
    AttackWindup,
    Attacking,
}

/// What a single strike achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrikeOutcome {
    /// Target survived, or the hit is still in flight.
    Continue,
    /// Target died from this strike.
    TargetDown,
}

// === Attack loop ===

/// Advances `unit`'s attack loop by `dt`.
///
/// `unit` must already be detached from `battle` (the caller owns it for the duration of its tick).
/// Strikes only while the battle is `Battling`; otherwise the loop holds its position.
pub fn advance_attack(unit: &mut Unit, battle: &mut Battle, dt: Duration) {
    if battle.state() != BattleState::Battling {
        return;
    }

    let strike_now = match unit.attack_phase_mut() {
        AttackPhase::Idle => return,
        AttackPhase::Windup => true,
        AttackPhase::Recovering(timer) => {
            timer.tick(dt);
            timer.just_finished()
        }
    };
    if !strike_now {
        return;
    }

    let Some(target) = unit.target().filter(|id| battle.is_alive(*id)) else {
        unit.disengage();
        return;
    };

    match strike(unit, target, battle) {
        StrikeOutcome::TargetDown => {
            debug!("{} finished off {target}", unit.id());
            unit.disengage();
        }
        StrikeOutcome::Continue => {
            *unit.attack_phase_mut() = AttackPhase::recovering(unit.stats().attack_period);
        }
    }
}

/// Warriors hurt the target directly; archers loose a projectile along their facing.
fn strike(unit: &Unit, target: UnitId, battle: &mut Battle) -> StrikeOutcome {
    match unit.unit_type() {
        UnitType::Warrior => {
            if battle.apply_damage(target, unit.stats().damage) {
                StrikeOutcome::TargetDown
            } else {
                StrikeOutcome::Continue
            }
        }
        UnitType::Archer => {
            let projectile = Projectile::launch(
                unit.id(),
                unit.side(),
                unit.position(),
                unit.facing(),
                unit.stats().damage,
                battle.config(),
            );
            battle.launch_projectile(projectile);
            StrikeOutcome::Continue
        }
    }
}
