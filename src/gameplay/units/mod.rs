//! Unit entity: identity, stats, health, and the per-unit state the brain and attack loop drive.

pub mod brain;
pub mod navigation;

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::gameplay::behaviour::strategies::MoveOrder;
use crate::gameplay::combat::{AttackPhase, UnitActivity};
use brain::{UnitBrain, UnitCtx};
use navigation::{NavigationAgent, StraightLineAgent};

// === Identity ===

/// Stable handle to a unit owned by the battle. Never reused within a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which roster a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum Side {
    Friendly,
    Enemy,
}

impl Side {
    #[must_use]
    pub const fn opposing(self) -> Self {
        match self {
            Self::Friendly => Self::Enemy,
            Self::Enemy => Self::Friendly,
        }
    }
}

// === Unit Type System ===

/// Character variants. They differ only in how an attack lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum UnitType {
    /// Melee; damage applies the moment the strike happens.
    Warrior,
    /// Ranged; each strike launches a projectile.
    Archer,
}

impl UnitType {
    /// All unit types, for iteration.
    pub const ALL: &[Self] = &[Self::Warrior, Self::Archer];

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Warrior => "Warrior",
            Self::Archer => "Archer",
        }
    }
}

/// Stats for a unit type. All values are compile-time constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitStats {
    pub hp: f32,
    pub damage: f32,
    /// Seconds between strikes.
    pub attack_period: f32,
    pub move_speed: f32,
    pub trigger_radius: f32,
}

/// Look up stats for a unit type.
#[must_use]
pub const fn unit_stats(unit_type: UnitType) -> UnitStats {
    match unit_type {
        UnitType::Warrior => UnitStats {
            hp: 100.0,
            damage: 10.0,
            attack_period: 1.0,
            move_speed: 3.5,
            trigger_radius: 1.3,
        },
        UnitType::Archer => UnitStats {
            hp: 80.0,
            damage: 8.0,
            attack_period: 1.5,
            move_speed: 3.5,
            trigger_radius: 4.0,
        },
    }
}

// === Health ===

/// Hit points. `current` never drops below zero.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Subtracts `amount`, clamped at zero, and returns how much was actually removed.
    /// Non-positive and NaN amounts are ignored; there is no healing.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// `current / max` in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.current / self.max).clamp(0.0, 1.0)
    }
}

/// Per-unit combat numbers, copied from [`UnitStats`] at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CombatStats {
    pub damage: f32,
    pub attack_period: f32,
    pub move_speed: f32,
    pub trigger_radius: f32,
}

impl From<UnitStats> for CombatStats {
    fn from(stats: UnitStats) -> Self {
        Self {
            damage: stats.damage,
            attack_period: stats.attack_period,
            move_speed: stats.move_speed,
            trigger_radius: stats.trigger_radius,
        }
    }
}

// === Unit ===

/// A combatant. Owned by [`Battle`](crate::gameplay::battle::Battle); everything else refers to
/// it by [`UnitId`].
#[derive(Debug)]
pub struct Unit {
    id: UnitId,
    unit_type: UnitType,
    side: Side,
    position: Vec2,
    facing: Vec2,
    health: Health,
    stats: CombatStats,
    /// Weak reference; resolved through the battle every time it is used.
    target: Option<UnitId>,
    attack: AttackPhase,
    move_order: MoveOrder,
    agent: Box<dyn NavigationAgent>,
    brain: Option<UnitBrain>,
}

impl Unit {
    /// Creates a unit with the stock stats for `unit_type` and a straight-line walker.
    #[must_use]
    pub fn new(id: UnitId, unit_type: UnitType, side: Side, position: Vec2) -> Self {
        let stats = unit_stats(unit_type);
        let facing = match side {
            Side::Friendly => Vec2::X,
            Side::Enemy => Vec2::NEG_X,
        };
        Self {
            id,
            unit_type,
            side,
            position,
            facing,
            health: Health::new(stats.hp),
            stats: stats.into(),
            target: None,
            attack: AttackPhase::Idle,
            move_order: MoveOrder::default(),
            agent: Box::new(StraightLineAgent::new(stats.move_speed)),
            brain: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    #[must_use]
    pub const fn unit_type(&self) -> UnitType {
        self.unit_type
    }

    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) const fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Unit vector the unit is looking along. Projectiles fly this way.
    #[must_use]
    pub const fn facing(&self) -> Vec2 {
        self.facing
    }

    /// Turns toward `point`; a zero-length offset keeps the current facing.
    pub(crate) fn look_at(&mut self, point: Vec2) {
        if let Some(direction) = (point - self.position).try_normalize() {
            self.facing = direction;
        }
    }

    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    #[must_use]
    pub const fn stats(&self) -> CombatStats {
        self.stats
    }

    #[must_use]
    pub const fn target(&self) -> Option<UnitId> {
        self.target
    }

    pub(crate) const fn set_target(&mut self, target: Option<UnitId>) {
        self.target = target;
    }

    #[must_use]
    pub const fn attack_phase(&self) -> &AttackPhase {
        &self.attack
    }

    pub(crate) const fn attack_phase_mut(&mut self) -> &mut AttackPhase {
        &mut self.attack
    }

    /// An attack loop is in progress (winding up or recovering).
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        !matches!(self.attack, AttackPhase::Idle)
    }

    /// Navigation has an outstanding destination.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        !self.agent.is_stopped()
    }

    /// Coarse state for presentation and tests.
    #[must_use]
    pub fn activity(&self) -> UnitActivity {
        match self.attack {
            AttackPhase::Windup => UnitActivity::AttackWindup,
            AttackPhase::Recovering(_) => UnitActivity::Attacking,
            AttackPhase::Idle if self.is_moving() => UnitActivity::Moving,
            AttackPhase::Idle => UnitActivity::Idle,
        }
    }

    #[must_use]
    pub const fn move_order(&self) -> MoveOrder {
        self.move_order
    }

    pub(crate) const fn move_order_mut(&mut self) -> &mut MoveOrder {
        &mut self.move_order
    }

    #[must_use]
    pub fn agent(&self) -> &dyn NavigationAgent {
        self.agent.as_ref()
    }

    pub(crate) fn agent_mut(&mut self) -> &mut dyn NavigationAgent {
        self.agent.as_mut()
    }

    /// Whether [`Unit::start_battle`] has run.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        self.brain.is_some()
    }

    pub(crate) const fn take_brain(&mut self) -> Option<UnitBrain> {
        self.brain.take()
    }

    pub(crate) fn restore_brain(&mut self, brain: UnitBrain) {
        self.brain = Some(brain);
    }

    /// Removes up to `amount` hit points and returns how many were removed.
    pub(crate) fn take_damage(&mut self, amount: f32) -> f32 {
        self.health.take_damage(amount)
    }

    /// How close to get to a target before stopping: own trigger radius plus the smaller of the
    /// two radii. Without a target only the unit's own radius counts.
    #[must_use]
    pub fn min_distance_to_stop(&self, target_trigger_radius: Option<f32>) -> f32 {
        let own = self.stats.trigger_radius;
        own + own.min(target_trigger_radius.unwrap_or(0.0))
    }

    /// Installs a fresh decision tree. Units do nothing until this runs.
    pub fn start_battle(&mut self) {
        self.brain = Some(brain::build_brain());
    }

    /// Cancels the attack loop and halts navigation now. Movement leaves also see `force_stop`
    /// on their next evaluation.
    pub fn stop_attacking(&mut self) {
        self.attack = AttackPhase::Idle;
        self.move_order.force_stop = true;
        self.agent.stop();
    }

    /// [`Unit::stop_attacking`] plus dropping the target and any move progress toward it; used
    /// when the target is gone.
    pub fn disengage(&mut self) {
        self.stop_attacking();
        self.target = None;
        self.move_order.destination = None;
        if let Some(tree) = self.brain.as_mut() {
            tree.reset::<UnitCtx<'_>>();
        }
    }
}
