//! Friendly and enemy membership lists.

use crate::gameplay::units::{Side, UnitId};

/// Two disjoint ordered lists of unit ids. Insertion order is tick order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    friendly: Vec<UnitId>,
    enemy: Vec<UnitId>,
}

impl Roster {
    /// Adds `id` to `side`. Returns `false` if it is already on either side.
    pub fn insert(&mut self, id: UnitId, side: Side) -> bool {
        if self.contains(id) {
            return false;
        }
        self.side_mut(side).push(id);
        true
    }

    /// Removes `id` from whichever side holds it.
    pub fn remove(&mut self, id: UnitId) -> Option<Side> {
        let side = self.side_of(id)?;
        self.side_mut(side).retain(|member| *member != id);
        Some(side)
    }

    #[must_use]
    pub fn side_of(&self, id: UnitId) -> Option<Side> {
        if self.friendly.contains(&id) {
            Some(Side::Friendly)
        } else if self.enemy.contains(&id) {
            Some(Side::Enemy)
        } else {
            None
        }
    }

    #[must_use]
    pub fn contains(&self, id: UnitId) -> bool {
        self.side_of(id).is_some()
    }

    #[must_use]
    pub fn members(&self, side: Side) -> &[UnitId] {
        match side {
            Side::Friendly => &self.friendly,
            Side::Enemy => &self.enemy,
        }
    }

    #[must_use]
    pub fn count(&self, side: Side) -> usize {
        self.members(side).len()
    }

    /// Either side has nobody left.
    #[must_use]
    pub fn any_side_empty(&self) -> bool {
        self.friendly.is_empty() || self.enemy.is_empty()
    }

    /// Friendly members then enemy members, each in insertion order.
    #[must_use]
    pub fn tick_order(&self) -> Vec<UnitId> {
        self.friendly.iter().chain(&self.enemy).copied().collect()
    }

    const fn side_mut(&mut self, side: Side) -> &mut Vec<UnitId> {
        match side {
            Side::Friendly => &mut self.friendly,
            Side::Enemy => &mut self.enemy,
        }
    }
}
