//! Player commands: keyboard mapping and the system that feeds them to the battle.
//!
//! | Key       | Command                    |
//! |-----------|----------------------------|
//! | Space     | start the battle           |
//! | Y / N     | accept / decline surrender |
//! | Tab       | select the next tile       |
//! | 0 / 1 / 2 | clear / warrior / archer   |

use bevy::prelude::*;

use crate::GameSet;
use crate::gameplay::battle::{Battle, BattleError};
use crate::gameplay::loadout::{Loadout, LoadoutOption};
use crate::inventory::Inventory;

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleCommand {
    StartBattle,
    AnswerSurrender { accepted: bool },
    SelectTile(usize),
    CycleTile,
    ChooseOption(usize),
}

const OPTION_KEYS: [KeyCode; 3] = [KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2];

fn read_keyboard(keyboard: Res<ButtonInput<KeyCode>>, mut commands: MessageWriter<BattleCommand>) {
    if keyboard.just_pressed(KeyCode::Space) {
        commands.write(BattleCommand::StartBattle);
    }
    if keyboard.just_pressed(KeyCode::KeyY) {
        commands.write(BattleCommand::AnswerSurrender { accepted: true });
    }
    if keyboard.just_pressed(KeyCode::KeyN) {
        commands.write(BattleCommand::AnswerSurrender { accepted: false });
    }
    if keyboard.just_pressed(KeyCode::Tab) {
        commands.write(BattleCommand::CycleTile);
    }
    for (index, key) in OPTION_KEYS.into_iter().enumerate() {
        if keyboard.just_pressed(key) {
            commands.write(BattleCommand::ChooseOption(index));
        }
    }
}

fn apply_command(
    command: BattleCommand,
    battle: &mut Battle,
    loadout: &mut Loadout,
    inventory: &mut Inventory,
) -> Result<(), BattleError> {
    match command {
        BattleCommand::StartBattle => battle.start_battle(),
        BattleCommand::AnswerSurrender { accepted } => {
            battle.handle_surrender(accepted).map(|_| ())
        }
        BattleCommand::SelectTile(index) => loadout.select_tile(index),
        BattleCommand::CycleTile => {
            loadout.cycle_selection();
            Ok(())
        }
        BattleCommand::ChooseOption(index) => match LoadoutOption::from_index(index) {
            Some(option) => loadout.choose_option(option, battle, inventory),
            None => {
                debug!("Ignoring unknown loadout option {index}");
                Ok(())
            }
        },
    }
}

/// Rejected commands are logged and dropped; they never change battle state.
fn apply_battle_commands(
    mut commands: MessageReader<BattleCommand>,
    mut battle: ResMut<Battle>,
    mut loadout: ResMut<Loadout>,
    mut inventory: ResMut<Inventory>,
) {
    for &command in commands.read() {
        if let Err(err) = apply_command(command, &mut battle, &mut loadout, &mut inventory) {
            warn!("{command:?} rejected: {err}");
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_message::<BattleCommand>();
    app.add_systems(
        Update,
        (
            read_keyboard.run_if(resource_exists::<ButtonInput<KeyCode>>),
            apply_battle_commands.run_if(
                resource_exists::<Battle>
                    .and(resource_exists::<Loadout>)
                    .and(resource_exists::<Inventory>),
            ),
        )
            .chain()
            .in_set(GameSet::Input),
    );
}
