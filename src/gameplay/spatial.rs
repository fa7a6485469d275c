//! Trigger-zone overlap detection between opposing units.
//!
//! Every unit carries a circular zone of its trigger radius. Two opposing zones touching is a
//! contact; contacts starting and ending are reported as [`ZoneEvent`]s for the battle to turn
//! into queue updates.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::gameplay::units::{Side, UnitId};

/// A unit as the zone tracker sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBody {
    pub id: UnitId,
    pub side: Side,
    pub position: Vec2,
    pub radius: f32,
}

/// Contact changes between two opposing units. Order inside the pair follows the body slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneEvent {
    Enter(UnitId, UnitId),
    Exit(UnitId, UnitId),
}

/// Current contacts, keyed by `(lower id, higher id)`.
#[derive(Debug, Clone, Default)]
pub struct TriggerZones {
    contacts: HashSet<(UnitId, UnitId)>,
}

const fn contact_key(a: UnitId, b: UnitId) -> (UnitId, UnitId) {
    if a.0 <= b.0 { (a, b) } else { (b, a) }
}

fn overlapping(a: &ZoneBody, b: &ZoneBody) -> bool {
    a.position.distance(b.position) <= a.radius + b.radius
}

impl TriggerZones {
    /// Recomputes contacts from `bodies` and returns what changed. Entries come in body order,
    /// followed by exits sorted by id.
    pub fn update(&mut self, bodies: &[ZoneBody]) -> Vec<ZoneEvent> {
        let mut current = HashSet::default();
        let mut events = Vec::new();

        for (index, a) in bodies.iter().enumerate() {
            for b in &bodies[index + 1..] {
                if a.side == b.side || !overlapping(a, b) {
                    continue;
                }
                let key = contact_key(a.id, b.id);
                current.insert(key);
                if !self.contacts.contains(&key) {
                    events.push(ZoneEvent::Enter(a.id, b.id));
                }
            }
        }

        let mut ended: Vec<_> = self.contacts.difference(&current).copied().collect();
        ended.sort_unstable();
        events.extend(ended.into_iter().map(|(a, b)| ZoneEvent::Exit(a, b)));

        self.contacts = current;
        events
    }

    /// Drops every contact involving `id` without reporting exits.
    pub fn forget(&mut self, id: UnitId) {
        self.contacts.retain(|(a, b)| *a != id && *b != id);
    }

    #[must_use]
    pub fn in_contact(&self, a: UnitId, b: UnitId) -> bool {
        self.contacts.contains(&contact_key(a, b))
    }
}
