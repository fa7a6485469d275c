//! Full app runs: config, inventory, loadout commands and the battle loop together.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use pretty_assertions::assert_eq;
use tactics_battle::BattleState;
use tactics_battle::config::ConfigPath;
use tactics_battle::gameplay::battle::Battle;
use tactics_battle::gameplay::input::BattleCommand;
use tactics_battle::gameplay::loadout::Loadout;
use tactics_battle::gameplay::scenario::{ENEMY_ARCHERS, ENEMY_WARRIORS};
use tactics_battle::gameplay::units::{Side, UnitType};
use tactics_battle::inventory::{Inventory, STARTER_ARCHERS, STARTER_WARRIORS};

/// Temp files for one test; removed on drop.
struct Scratch {
    config: PathBuf,
    inventory: PathBuf,
}

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir();
        let id = std::process::id();
        let scratch = Self {
            config: dir.join(format!("tactics-battle-{name}-{id}.toml")),
            inventory: dir.join(format!("tactics-battle-{name}-{id}.json")),
        };
        let _ = fs::remove_file(&scratch.inventory);
        fs::write(
            &scratch.config,
            format!("inventory_path = {:?}", scratch.inventory.display().to_string()),
        )
        .expect("writable temp dir");
        scratch
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.config);
        let _ = fs::remove_file(&self.inventory);
    }
}

fn create_game_app(scratch: &Scratch) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.insert_resource(ConfigPath(scratch.config.clone()));
    app.add_plugins(tactics_battle::plugin);
    app.update();
    app
}

fn send(app: &mut App, command: BattleCommand) {
    app.world_mut()
        .resource_mut::<Messages<BattleCommand>>()
        .write(command);
    app.update();
}

#[test]
fn game_starts_preparing_with_enemies_deployed() {
    let scratch = Scratch::new("startup");
    let app = create_game_app(&scratch);

    let battle = app.world().resource::<Battle>();
    assert_eq!(battle.state(), BattleState::PreparingPhase);
    assert_eq!(
        battle.roster().count(Side::Enemy),
        ENEMY_WARRIORS + ENEMY_ARCHERS
    );
    assert_eq!(battle.roster().count(Side::Friendly), 0);

    let inventory = app.world().resource::<Inventory>();
    assert_eq!(
        inventory.available_count(UnitType::Warrior),
        STARTER_WARRIORS
    );
    assert!(scratch.inventory.exists());
}

#[test]
fn loadout_commands_place_friendlies() {
    let scratch = Scratch::new("loadout");
    let mut app = create_game_app(&scratch);

    send(&mut app, BattleCommand::ChooseOption(1));
    send(&mut app, BattleCommand::CycleTile);
    send(&mut app, BattleCommand::ChooseOption(2));
    send(&mut app, BattleCommand::SelectTile(4));
    send(&mut app, BattleCommand::ChooseOption(1));

    let battle = app.world().resource::<Battle>();
    assert_eq!(battle.roster().count(Side::Friendly), 3);
    let occupied = app
        .world()
        .resource::<Loadout>()
        .tiles()
        .iter()
        .filter(|tile| tile.occupant.is_some())
        .count();
    assert_eq!(occupied, 3);

    let inventory = app.world().resource::<Inventory>();
    assert_eq!(
        inventory.available_count(UnitType::Warrior),
        STARTER_WARRIORS - 2
    );
    assert_eq!(
        inventory.available_count(UnitType::Archer),
        STARTER_ARCHERS - 1
    );
}

#[test]
fn battle_runs_to_completion_and_saves_inventory() {
    let scratch = Scratch::new("full");
    let mut app = create_game_app(&scratch);

    for tile in 0..STARTER_WARRIORS {
        send(&mut app, BattleCommand::SelectTile(tile));
        send(&mut app, BattleCommand::ChooseOption(1));
    }
    send(&mut app, BattleCommand::StartBattle);
    assert_eq!(
        app.world().resource::<Battle>().state(),
        BattleState::Battling
    );

    for _ in 0..6_000 {
        let state = app.world().resource::<Battle>().state();
        match state {
            BattleState::BattleOver => break,
            BattleState::Paused => send(&mut app, BattleCommand::AnswerSurrender { accepted: false }),
            BattleState::PreparingPhase | BattleState::Battling => app.update(),
        }
    }
    app.update();
    app.update();

    assert_eq!(
        app.world().resource::<Battle>().state(),
        BattleState::BattleOver
    );
    assert_eq!(
        *app.world().resource::<State<BattleState>>().get(),
        BattleState::BattleOver
    );

    // Only warriors were deployed, so every friendly left standing is one.
    let survivors = app.world().resource::<Battle>().roster().count(Side::Friendly);
    let inventory = app.world().resource::<Inventory>();
    assert_eq!(inventory.total_count(UnitType::Warrior), STARTER_WARRIORS);
    assert_eq!(inventory.available_count(UnitType::Warrior), survivors);
    assert_eq!(
        inventory.available_count(UnitType::Archer),
        STARTER_ARCHERS
    );

    let saved: Inventory =
        serde_json::from_str(&fs::read_to_string(&scratch.inventory).expect("saved"))
            .expect("valid json");
    assert_eq!(&saved, inventory);
    assert!(
        !saved
            .items()
            .iter()
            .any(|item| item.active && !item.available)
    );
}
