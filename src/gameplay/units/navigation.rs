//! Movement collaborator: an opaque "walk toward a point" capability.

use std::fmt::Debug;

use bevy::prelude::*;

/// Distance below which an agent counts as arrived.
const ARRIVAL_EPSILON: f32 = 0.01;

/// What the decision layer needs from a pathing backend.
pub trait NavigationAgent: Send + Sync + Debug {
    fn set_destination(&mut self, destination: Vec2);
    fn stop(&mut self);
    fn is_stopped(&self) -> bool;
    /// Distance still to cover at the last `advance`, or to a freshly set destination.
    fn remaining_distance(&self) -> f32;
    /// Moves `position` toward the current destination for `dt` seconds and returns the new
    /// position. A stopped agent returns `position` unchanged.
    fn advance(&mut self, position: Vec2, dt: f32) -> Vec2;
}

/// Walks in a straight line at constant speed. Stopped until given a destination.
#[derive(Debug, Clone, Reflect)]
pub struct StraightLineAgent {
    speed: f32,
    destination: Option<Vec2>,
    stopped: bool,
    remaining: f32,
}

impl StraightLineAgent {
    #[must_use]
    pub const fn new(speed: f32) -> Self {
        Self {
            speed,
            destination: None,
            stopped: true,
            remaining: 0.0,
        }
    }

    #[must_use]
    pub const fn destination(&self) -> Option<Vec2> {
        self.destination
    }
}

impl NavigationAgent for StraightLineAgent {
    fn set_destination(&mut self, destination: Vec2) {
        // Remaining distance is only known after the next advance.
        if self.destination != Some(destination) {
            self.remaining = f32::INFINITY;
        }
        self.destination = Some(destination);
        self.stopped = false;
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn advance(&mut self, position: Vec2, dt: f32) -> Vec2 {
        let Some(destination) = self.destination else {
            return position;
        };
        if self.stopped {
            return position;
        }

        let offset = destination - position;
        let distance = offset.length();
        let step = self.speed * dt;
        if distance <= step || distance <= ARRIVAL_EPSILON {
            self.remaining = 0.0;
            self.stopped = true;
            return destination;
        }

        self.remaining = distance - step;
        position + offset / distance * step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_agent_is_stopped() {
        let agent = StraightLineAgent::new(2.0);
        assert!(agent.is_stopped());
        assert_eq!(agent.destination(), None);
    }

    #[test]
    fn advance_moves_by_speed_times_dt() {
        let mut agent = StraightLineAgent::new(2.0);
        agent.set_destination(Vec2::new(10.0, 0.0));
        let next = agent.advance(Vec2::ZERO, 0.5);
        assert_eq!(next, Vec2::new(1.0, 0.0));
        assert_eq!(agent.remaining_distance(), 9.0);
        assert!(!agent.is_stopped());
    }

    #[test]
    fn advance_snaps_to_destination_and_stops() {
        let mut agent = StraightLineAgent::new(10.0);
        agent.set_destination(Vec2::new(1.0, 0.0));
        let next = agent.advance(Vec2::ZERO, 1.0);
        assert_eq!(next, Vec2::new(1.0, 0.0));
        assert!(agent.is_stopped());
        assert_eq!(agent.remaining_distance(), 0.0);
    }

    #[test]
    fn stopped_agent_does_not_move() {
        let mut agent = StraightLineAgent::new(10.0);
        agent.set_destination(Vec2::new(5.0, 0.0));
        agent.stop();
        assert_eq!(agent.advance(Vec2::ZERO, 1.0), Vec2::ZERO);
    }

    #[test]
    fn pending_destination_reports_unknown_distance() {
        let mut agent = StraightLineAgent::new(1.0);
        agent.set_destination(Vec2::new(3.0, 4.0));
        assert!(agent.remaining_distance().is_infinite());
    }
}
