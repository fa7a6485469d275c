//! Testing utilities for Bevy systems.

#![cfg(test)]

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::config::BattleConfig;
use crate::{BattleState, GameSet};

/// Creates a minimal app for testing with essential plugins.
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app
}

/// Minimal app with the battle state machine, system sets, default config and the battle plugin.
/// Skips config and inventory file I/O.
pub fn create_battle_app() -> App {
    let mut app = create_test_app();
    app.add_plugins(StatesPlugin);
    app.init_state::<BattleState>();
    app.configure_sets(
        Update,
        (GameSet::Input, GameSet::Simulation, GameSet::Presentation).chain(),
    );
    app.init_resource::<BattleConfig>();
    app.add_plugins(crate::gameplay::battle::plugin);
    app
}

/// Helper to advance the app by one frame.
pub fn tick(app: &mut App) {
    app.update();
}

/// Asserts how many entities match `F`.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let mut query = app.world_mut().query_filtered::<(), F>();
    let actual = query.iter(app.world()).count();
    assert_eq!(actual, expected, "unexpected entity count");
}
