//! Arrows: fly straight at constant speed and hit the first opposing unit on their path.

use bevy::prelude::*;

use crate::config::BattleConfig;
use crate::gameplay::units::{Side, UnitId};

/// An arrow in flight. Owned by the battle until it hits or runs out of range.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Projectile {
    owner: UnitId,
    side: Side,
    origin: Vec2,
    position: Vec2,
    direction: Vec2,
    travelled: f32,
    max_distance: f32,
    speed: f32,
    damage: f32,
    hit_radius: f32,
}

impl Projectile {
    /// Creates a projectile at `origin` flying along `direction`. A zero direction falls back to
    /// +X so the arrow still expires normally.
    #[must_use]
    pub fn launch(
        owner: UnitId,
        side: Side,
        origin: Vec2,
        direction: Vec2,
        damage: f32,
        config: &BattleConfig,
    ) -> Self {
        Self {
            owner,
            side,
            origin,
            position: origin,
            direction: direction.try_normalize().unwrap_or(Vec2::X),
            travelled: 0.0,
            max_distance: config.projectile_max_distance,
            speed: config.projectile_speed,
            damage,
            hit_radius: config.projectile_hit_radius,
        }
    }

    #[must_use]
    pub const fn owner(&self) -> UnitId {
        self.owner
    }

    /// Side of the unit that fired it. Only the opposing side can be hit.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    #[must_use]
    pub const fn travelled(&self) -> f32 {
        self.travelled
    }

    /// Reached its maximum range.
    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.travelled >= self.max_distance
    }

    /// Moves forward for `dt` seconds, never past the range limit, and returns the swept segment.
    pub fn advance(&mut self, dt: f32) -> (Vec2, Vec2) {
        let start = self.position;
        let step = (self.speed * dt).min(self.max_distance - self.travelled).max(0.0);
        self.position += self.direction * step;
        self.travelled += step;
        (start, self.position)
    }

    /// Whether a unit centred at `center` was touched by the segment `start..end`.
    #[must_use]
    pub fn sweeps(&self, start: Vec2, end: Vec2, center: Vec2) -> bool {
        distance_to_segment(center, start, end) <= self.hit_radius
    }
}

fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let length_squared = segment.length_squared();
    if length_squared <= f32::EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_squared).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
