//! Player inventory: unlocked units, which of them are free to deploy, and the JSON file they
//! live in between battles.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BattleConfig;
use crate::{BattleState, GameSet};
use crate::gameplay::battle::Battle;
use crate::gameplay::units::{Side, UnitType};

/// Warriors a brand new inventory starts with.
pub const STARTER_WARRIORS: usize = 3;

/// Archers a brand new inventory starts with.
pub const STARTER_ARCHERS: usize = 2;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("inventory file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("inventory file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub struct InventoryItem {
    pub unit_type: UnitType,
    pub level: u32,
    /// Not currently placed on a loadout tile.
    pub available: bool,
    /// Inactive items are kept for history but never deployed.
    pub active: bool,
}

impl InventoryItem {
    #[must_use]
    pub const fn new(unit_type: UnitType, level: u32) -> Self {
        Self {
            unit_type,
            level,
            available: true,
            active: true,
        }
    }
}

/// An item of `unit_type` was deployed (`available: false`) or handed back.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityChanged {
    pub unit_type: UnitType,
    pub available: bool,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    /// Availability flips not yet published.
    #[serde(skip)]
    #[reflect(ignore)]
    changes: Vec<AvailabilityChanged>,
}

impl Inventory {
    /// What a first-time player gets.
    #[must_use]
    pub fn starter() -> Self {
        let warriors = (0..STARTER_WARRIORS).map(|_| InventoryItem::new(UnitType::Warrior, 1));
        let archers = (0..STARTER_ARCHERS).map(|_| InventoryItem::new(UnitType::Archer, 1));
        Self {
            items: warriors.chain(archers).collect(),
            changes: Vec::new(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn add(&mut self, item: InventoryItem) {
        debug!(
            "Inventory gained a level {} {}",
            item.level,
            item.unit_type.display_name()
        );
        self.items.push(item);
    }

    /// Flips the first active item of `unit_type` whose availability differs from `available`.
    /// Returns `false` when there is nothing to flip.
    pub fn set_availability(&mut self, unit_type: UnitType, available: bool) -> bool {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.unit_type == unit_type && item.active && item.available != available)
        else {
            return false;
        };
        item.available = available;
        self.changes.push(AvailabilityChanged {
            unit_type,
            available,
        });
        debug!(
            "{} availability now {} ({} left)",
            unit_type.display_name(),
            available,
            self.available_count(unit_type)
        );
        true
    }

    #[must_use]
    pub fn any_available(&self, unit_type: UnitType) -> bool {
        self.available_count(unit_type) > 0
    }

    #[must_use]
    pub fn any_active(&self, unit_type: UnitType) -> bool {
        self.items
            .iter()
            .any(|item| item.unit_type == unit_type && item.active)
    }

    /// Active items of `unit_type` that are not deployed.
    #[must_use]
    pub fn available_count(&self, unit_type: UnitType) -> usize {
        self.items
            .iter()
            .filter(|item| item.unit_type == unit_type && item.active && item.available)
            .count()
    }

    #[must_use]
    pub fn total_count(&self, unit_type: UnitType) -> usize {
        self.items
            .iter()
            .filter(|item| item.unit_type == unit_type)
            .count()
    }

    /// Closes out a deployment of `unit_type`. `survivors` deployed items are handed back; the
    /// rest belonged to units that died and are retired. Returns how many were retired.
    pub fn settle(&mut self, unit_type: UnitType, survivors: usize) -> usize {
        let mut returned = 0;
        let mut retired = 0;
        for item in self
            .items
            .iter_mut()
            .filter(|item| item.unit_type == unit_type && item.active && !item.available)
        {
            if returned < survivors {
                item.available = true;
                returned += 1;
            } else {
                item.active = false;
                retired += 1;
            }
        }
        self.changes.extend((0..returned).map(|_| AvailabilityChanged {
            unit_type,
            available: true,
        }));
        if returned + retired > 0 {
            debug!(
                "{} deployment settled: {returned} back, {retired} retired",
                unit_type.display_name()
            );
        }
        retired
    }

    /// Availability flips since the last drain, oldest first.
    pub fn drain_changes(&mut self) -> Vec<AvailabilityChanged> {
        std::mem::take(&mut self.changes)
    }
}

/// Where the inventory is persisted.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct InventoryStore {
    path: PathBuf,
}

impl InventoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the inventory, writing the starter inventory first if there is no file yet.
    pub fn load_or_create(&self) -> Result<Inventory, InventoryError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let inventory = Inventory::starter();
                self.save(&inventory)?;
                info!("Created starter inventory at {}", self.path.display());
                Ok(inventory)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, inventory: &Inventory) -> Result<(), InventoryError> {
        let json = serde_json::to_string_pretty(inventory)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Settles every deployed item against the friendlies still standing in `battle`.
pub fn settle_deployment(inventory: &mut Inventory, battle: &Battle) {
    for &unit_type in UnitType::ALL {
        let survivors = battle
            .units()
            .filter(|unit| unit.side() == Side::Friendly && unit.unit_type() == unit_type)
            .count();
        let retired = inventory.settle(unit_type, survivors);
        if retired > 0 {
            info!("Lost {retired} {} in battle", unit_type.display_name());
        }
    }
}

// === Systems ===

fn load_inventory(mut commands: Commands, config: Res<BattleConfig>) {
    let store = InventoryStore::new(config.inventory_path.clone());
    let inventory = match store.load_or_create() {
        Ok(inventory) => inventory,
        Err(err) => {
            error!(
                "Could not load inventory from {}: {err}",
                store.path().display()
            );
            Inventory::default()
        }
    };
    commands.insert_resource(inventory);
    commands.insert_resource(store);
}

fn settle_after_battle(
    config: Res<BattleConfig>,
    battle: Res<Battle>,
    store: Res<InventoryStore>,
    mut inventory: ResMut<Inventory>,
) {
    settle_deployment(&mut inventory, &battle);
    if !config.auto_save_inventory {
        return;
    }
    match store.save(&inventory) {
        Ok(()) => info!("Saved inventory to {}", store.path().display()),
        Err(err) => error!("Could not save inventory: {err}"),
    }
}

fn publish_inventory_changes(
    mut inventory: ResMut<Inventory>,
    mut writer: MessageWriter<AvailabilityChanged>,
) {
    for change in inventory.drain_changes() {
        writer.write(change);
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Inventory>();
    app.add_plugins(changes_plugin);
    app.add_systems(Startup, load_inventory);
    app.add_systems(
        OnEnter(BattleState::BattleOver),
        settle_after_battle.run_if(
            resource_exists::<Battle>
                .and(resource_exists::<Inventory>)
                .and(resource_exists::<InventoryStore>),
        ),
    );
}

/// Publishes [`AvailabilityChanged`] without touching the inventory file.
pub(crate) fn changes_plugin(app: &mut App) {
    app.add_message::<AvailabilityChanged>();
    app.add_systems(
        Update,
        publish_inventory_changes
            .in_set(GameSet::Simulation)
            .run_if(resource_exists::<Inventory>),
    );
}
