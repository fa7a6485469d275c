//! The enemy force waiting on the field when the game starts.

use bevy::prelude::*;
use rand::Rng;

use crate::gameplay::battle::{Battle, BattleError};
use crate::gameplay::units::{Side, UnitId, UnitType};

// === Constants ===

/// Centre of the enemy formation.
pub const ENEMY_CENTER: Vec2 = Vec2::new(10.0, 0.0);

pub const ENEMY_WARRIORS: usize = 4;
pub const ENEMY_ARCHERS: usize = 2;

/// Spacing between ranks of a formation.
const RANK_SPACING: f32 = 2.5;

/// Random offset applied to each unit so formations don't look stamped out.
const JITTER: f32 = 0.4;

/// Places `count` units of one type in a vertical rank centred on `center`.
pub fn deploy_rank(
    battle: &mut Battle,
    unit_type: UnitType,
    side: Side,
    count: usize,
    center: Vec2,
    rng: &mut impl Rng,
) -> Result<Vec<UnitId>, BattleError> {
    #[allow(clippy::cast_precision_loss)]
    let top = RANK_SPACING * (count.saturating_sub(1) as f32) / 2.0;
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let slot = center + Vec2::new(0.0, top - i as f32 * RANK_SPACING);
            let jitter = Vec2::new(
                rng.random_range(-JITTER..=JITTER),
                rng.random_range(-JITTER..=JITTER),
            );
            battle.add_unit(unit_type, side, slot + jitter)
        })
        .collect()
}

/// Warriors in front, archers one rank behind.
pub fn deploy_enemy_force(battle: &mut Battle, rng: &mut impl Rng) -> Result<(), BattleError> {
    deploy_rank(
        battle,
        UnitType::Warrior,
        Side::Enemy,
        ENEMY_WARRIORS,
        ENEMY_CENTER,
        rng,
    )?;
    deploy_rank(
        battle,
        UnitType::Archer,
        Side::Enemy,
        ENEMY_ARCHERS,
        ENEMY_CENTER + Vec2::new(RANK_SPACING, 0.0),
        rng,
    )?;
    info!("Enemy force deployed: {ENEMY_WARRIORS} warriors, {ENEMY_ARCHERS} archers");
    Ok(())
}

// === Systems ===

fn spawn_enemy_force(mut battle: ResMut<Battle>) {
    if let Err(err) = deploy_enemy_force(&mut battle, &mut rand::rng()) {
        warn!("Could not deploy enemy force: {err}");
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        PostStartup,
        spawn_enemy_force.run_if(resource_exists::<Battle>),
    );
}
