//! Gameplay domain plugins: the battle coordinator and everything that feeds or mirrors it.

pub mod battle;
pub mod behaviour;
pub mod combat;
pub mod input;
pub mod loadout;
pub mod scenario;
pub mod spatial;
pub mod units;
pub mod view;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        battle::plugin,
        loadout::plugin,
        input::plugin,
        scenario::plugin,
        view::plugin,
    ));
}
