//! Tactical battle library: behaviour-tree driven units, trigger-zone targeting, and the
//! battle-wide state machine that decides when a fight pauses for surrender or ends.

pub mod config;
pub mod gameplay;
pub mod inventory;
#[cfg(test)]
pub mod testing;

use bevy::prelude::*;

/// Z-layer for unit sprites.
pub const Z_UNIT: f32 = 2.0;

/// Battle-wide state machine.
///
/// `PreparingPhase → Battling → {Paused → Battling | BattleOver} → BattleOver`.
/// The authoritative value lives on [`gameplay::battle::Battle`]; this Bevy state mirrors it
/// one frame later so other plugins can use `OnEnter`/`in_state`.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum BattleState {
    /// Rosters are being composed; units are idle.
    #[default]
    PreparingPhase,
    /// Units tick every frame.
    Battling,
    /// Surrender offer pending; units and projectiles are frozen.
    Paused,
    /// Terminal.
    BattleOver,
}

/// Per-frame ordering of gameplay systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Translate player input into battle commands.
    Input,
    /// Advance the battle by one tick and publish what happened.
    Simulation,
    /// Mirror battle state into sprites and other presentation.
    Presentation,
}

/// Installs the whole battle layer. Expects `StatesPlugin` (or `DefaultPlugins`) to be present.
pub fn plugin(app: &mut App) {
    app.init_state::<BattleState>();
    app.register_type::<BattleState>();
    app.configure_sets(
        Update,
        (GameSet::Input, GameSet::Simulation, GameSet::Presentation).chain(),
    );
    app.add_plugins((config::plugin, inventory::plugin, gameplay::plugin));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn battle_state_default_is_preparing() {
        assert_eq!(BattleState::default(), BattleState::PreparingPhase);
    }

    #[test]
    fn battle_states_are_distinct() {
        assert_ne!(BattleState::PreparingPhase, BattleState::Battling);
        assert_ne!(BattleState::Battling, BattleState::Paused);
        assert_ne!(BattleState::Paused, BattleState::BattleOver);
    }
}
