//! Pre-battle loadout: a row of tiles on the friendly side, each holding at most one unit drawn
//! from the inventory.

use bevy::prelude::*;

use crate::BattleState;
use crate::gameplay::battle::{Battle, BattleError};
use crate::gameplay::units::{Side, UnitId, UnitType};
use crate::inventory::Inventory;

// === Constants ===

/// Tiles in the default loadout row.
pub const TILE_COUNT: usize = 5;

/// World x of the default loadout row.
pub const ROW_X: f32 = -8.0;

/// Vertical gap between tiles.
pub const TILE_SPACING: f32 = 3.0;

// === Types ===

/// What the player picked for the selected tile. Index 0 clears it; the rest place a unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadoutOption {
    Clear,
    Place(UnitType),
}

impl LoadoutOption {
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Clear),
            n => UnitType::ALL.get(n - 1).copied().map(Self::Place),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Tile {
    pub position: Vec2,
    pub occupant: Option<(UnitId, UnitType)>,
}

#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct Loadout {
    tiles: Vec<Tile>,
    selected: usize,
}

impl Default for Loadout {
    #[allow(clippy::cast_precision_loss)]
    fn default() -> Self {
        let top = TILE_SPACING * (TILE_COUNT as f32 - 1.0) / 2.0;
        Self::new((0..TILE_COUNT).map(|i| Vec2::new(ROW_X, top - i as f32 * TILE_SPACING)))
    }
}

impl Loadout {
    pub fn new(positions: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            tiles: positions
                .into_iter()
                .map(|position| Tile {
                    position,
                    occupant: None,
                })
                .collect(),
            selected: 0,
        }
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_tile(&mut self, index: usize) -> Result<(), BattleError> {
        if index >= self.tiles.len() {
            return Err(BattleError::TileOutOfRange(index));
        }
        self.selected = index;
        Ok(())
    }

    /// Moves the selection to the next tile, wrapping around.
    pub fn cycle_selection(&mut self) {
        if !self.tiles.is_empty() {
            self.selected = (self.selected + 1) % self.tiles.len();
        }
    }

    /// Applies `option` to the selected tile. Placing consumes an available inventory item;
    /// clearing or replacing hands the previous one back. Only allowed while preparing.
    pub fn choose_option(
        &mut self,
        option: LoadoutOption,
        battle: &mut Battle,
        inventory: &mut Inventory,
    ) -> Result<(), BattleError> {
        if battle.state() != BattleState::PreparingPhase {
            return Err(BattleError::InvalidTransition {
                state: battle.state(),
                action: "change the loadout",
            });
        }
        let index = self.selected;
        let tile = self
            .tiles
            .get_mut(index)
            .ok_or(BattleError::TileOutOfRange(index))?;

        match option {
            LoadoutOption::Clear => {
                if let Some((id, unit_type)) = tile.occupant.take() {
                    battle.remove_unit(id)?;
                    inventory.set_availability(unit_type, true);
                    debug!("Cleared loadout tile {index}");
                }
            }
            LoadoutOption::Place(unit_type) => {
                if tile.occupant.is_some_and(|(_, current)| current == unit_type) {
                    return Ok(());
                }
                if !inventory.any_available(unit_type) {
                    return Err(BattleError::Unavailable(unit_type));
                }
                if let Some((id, previous)) = tile.occupant.take() {
                    battle.remove_unit(id)?;
                    inventory.set_availability(previous, true);
                }
                let id = battle.add_unit(unit_type, Side::Friendly, tile.position)?;
                inventory.set_availability(unit_type, false);
                tile.occupant = Some((id, unit_type));
                debug!(
                    "Placed {} {id} on loadout tile {index}",
                    unit_type.display_name()
                );
            }
        }
        Ok(())
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Loadout>().init_resource::<Loadout>();
}
