//! Per-unit queues of opposing units inside the trigger radius.

use std::collections::VecDeque;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::gameplay::units::UnitId;

/// `owner → candidates`, in arrival order. Only the battle mutates this.
#[derive(Debug, Clone, Default)]
pub struct TriggerQueues {
    queues: HashMap<UnitId, VecDeque<UnitId>>,
}

impl TriggerQueues {
    /// Appends `candidate` to `owner`'s queue unless it is already queued there.
    pub fn enqueue(&mut self, owner: UnitId, candidate: UnitId) {
        let queue = self.queues.entry(owner).or_default();
        if !queue.contains(&candidate) {
            queue.push_back(candidate);
        }
    }

    /// Drops `candidate` from `owner`'s queue, keeping the order of everything else.
    pub fn remove(&mut self, owner: UnitId, candidate: UnitId) {
        if let Some(queue) = self.queues.get_mut(&owner) {
            queue.retain(|queued| *queued != candidate);
        }
    }

    /// Removes and returns the queued candidate nearest to `origin`.
    ///
    /// `locate` resolves a candidate's position and returns `None` for units that no longer
    /// exist; those stale entries are discarded along the way. Ties keep the earliest entry.
    pub fn take_nearest(
        &mut self,
        owner: UnitId,
        origin: Vec2,
        locate: impl Fn(UnitId) -> Option<Vec2>,
    ) -> Option<UnitId> {
        let queue = self.queues.get_mut(&owner)?;

        let before = queue.len();
        queue.retain(|candidate| locate(*candidate).is_some());
        let stale = before - queue.len();
        if stale > 0 {
            debug!("Skipped {stale} stale trigger entries for {owner}");
        }

        let (index, _) = queue
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                locate(*candidate).map(|position| (index, origin.distance(position)))
            })
            .fold(None, |nearest: Option<(usize, f32)>, (index, distance)| {
                match nearest {
                    Some((_, best)) if best <= distance => nearest,
                    _ => Some((index, distance)),
                }
            })?;
        queue.remove(index)
    }

    /// Forgets `id` entirely: its own queue and every entry naming it.
    pub fn purge(&mut self, id: UnitId) {
        self.queues.remove(&id);
        for queue in self.queues.values_mut() {
            queue.retain(|queued| *queued != id);
        }
    }

    /// Snapshot of `owner`'s queue, front first.
    #[must_use]
    pub fn queued(&self, owner: UnitId) -> Vec<UnitId> {
        self.queues
            .get(&owner)
            .map(|queue| queue.iter().copied().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, owner: UnitId, candidate: UnitId) -> bool {
        self.queues
            .get(&owner)
            .is_some_and(|queue| queue.contains(&candidate))
    }

    /// Whether `id` appears anywhere, as owner or as a queued entry.
    #[must_use]
    pub fn mentions(&self, id: UnitId) -> bool {
        self.queues.contains_key(&id) || self.queues.values().any(|queue| queue.contains(&id))
    }
}
