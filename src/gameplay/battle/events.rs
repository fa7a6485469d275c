//! What the battle tells presentation. Pushed, never polled.

use bevy::prelude::*;

use crate::BattleState;
use crate::gameplay::units::{Side, UnitId, UnitType};

#[derive(Message, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    UnitSpawned {
        id: UnitId,
        unit_type: UnitType,
        side: Side,
        position: Vec2,
    },
    /// Taken off the field before the battle started. No death is implied.
    UnitRemoved { id: UnitId },
    HealthChanged { id: UnitId, current: f32, max: f32 },
    UnitDied { id: UnitId, side: Side },
    ProjectileLaunched {
        owner: UnitId,
        origin: Vec2,
        direction: Vec2,
    },
    StateChanged { from: BattleState, to: BattleState },
    /// The UI should ask the player whether to accept the enemy's surrender.
    SurrenderRequested { friendlies: usize, enemies: usize },
}
