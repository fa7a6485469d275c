//! Per-unit decision tree.
//!
//! ```text
//! root (priority selector, run forever)
//! ├── attack_target      (100)  no target → find_and_attack
//! ├── seek_target        (90)   no target, not attacking → nearest opponent
//! └── move_to_target     (80)   target, not attacking → track → move → find_and_attack
//!
//! find_and_attack = pull triggered target → ready? → in range? (else requeue) → begin attack
//! ```

use bevy::prelude::*;

use crate::BattleState;
use crate::gameplay::battle::Battle;
use crate::gameplay::behaviour::strategies::{
    Check, Effect, MoveOrder, MoveToPoint, Predicate, Steering, Strategy,
};
use crate::gameplay::behaviour::{BehaviourTree, Leaf, PrioritySelector, Sequence, Status};
use crate::gameplay::combat::AttackPhase;
use crate::gameplay::units::navigation::NavigationAgent;

use super::Unit;

pub type UnitStrategy = Strategy<UnitCondition, UnitAction, UnitCheck>;
pub type UnitBrain = BehaviourTree<UnitStrategy>;

/// What a unit's brain sees while it is evaluated: the unit itself plus the battle it fights in.
/// The unit is detached from the battle for the duration.
pub struct UnitCtx<'a> {
    pub unit: &'a mut Unit,
    pub battle: &'a mut Battle,
}

impl Steering for UnitCtx<'_> {
    fn position(&self) -> Vec2 {
        self.unit.position()
    }

    fn move_order(&self) -> MoveOrder {
        self.unit.move_order()
    }

    fn agent(&mut self) -> &mut dyn NavigationAgent {
        self.unit.agent_mut()
    }

    fn movement_suspended(&self) -> bool {
        self.battle.state() == BattleState::Paused
    }
}

// === Leaves ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCondition {
    NoTarget,
    /// Has a target and no attack in progress.
    TargetAndIdle,
    /// No target and no attack in progress.
    NoTargetAndIdle,
    /// Has a target, no attack in progress, and is standing still.
    ReadyToEngage,
}

impl<'a> Predicate<UnitCtx<'a>> for UnitCondition {
    fn check(&self, ctx: &UnitCtx<'a>) -> bool {
        let unit = &ctx.unit;
        match self {
            Self::NoTarget => unit.target().is_none(),
            Self::TargetAndIdle => unit.target().is_some() && !unit.is_attacking(),
            Self::NoTargetAndIdle => unit.target().is_none() && !unit.is_attacking(),
            Self::ReadyToEngage => {
                unit.target().is_some() && !unit.is_attacking() && !unit.is_moving()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitAction {
    /// Replace the target with the nearest queued trigger candidate (possibly none).
    PullTriggeredTarget,
    /// Replace the target with the nearest opponent on the field.
    SeekNewTarget,
    /// Point the move order at the current target.
    TrackTarget,
    BeginAttack,
}

impl<'a> Effect<UnitCtx<'a>> for UnitAction {
    fn apply(&self, ctx: &mut UnitCtx<'a>) {
        match self {
            Self::PullTriggeredTarget => {
                let target = ctx.battle.next_triggered_target(ctx.unit);
                ctx.unit.set_target(target);
            }
            Self::SeekNewTarget => {
                let target = ctx.battle.new_target(ctx.unit);
                ctx.unit.set_target(target);
            }
            Self::TrackTarget => {
                let target = ctx.unit.target().and_then(|id| ctx.battle.unit(id));
                let destination = target.map(Unit::position);
                let min_stop_distance = ctx
                    .unit
                    .min_distance_to_stop(target.map(|t| t.stats().trigger_radius));
                *ctx.unit.move_order_mut() = MoveOrder {
                    destination,
                    min_stop_distance,
                    force_stop: false,
                };
            }
            Self::BeginAttack => {
                if let Some(target) = ctx.unit.target() {
                    trace!("{} engaging {target}", ctx.unit.id());
                }
                *ctx.unit.attack_phase_mut() = AttackPhase::Windup;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCheck {
    /// Success if the target is within stopping distance; otherwise hands it back to the
    /// trigger queue, clears it, and fails.
    TargetInRange,
}

impl<'a> Check<UnitCtx<'a>> for UnitCheck {
    fn run(&self, ctx: &mut UnitCtx<'a>) -> Status {
        match self {
            Self::TargetInRange => {
                let Some(target_id) = ctx.unit.target() else {
                    return Status::Failure;
                };
                let Some(target) = ctx.battle.unit(target_id) else {
                    ctx.unit.set_target(None);
                    return Status::Failure;
                };
                let distance = ctx.unit.position().distance(target.position());
                let reach = ctx
                    .unit
                    .min_distance_to_stop(Some(target.stats().trigger_radius));
                if distance > reach {
                    ctx.battle.requeue_target(ctx.unit.id(), target_id);
                    ctx.unit.set_target(None);
                    return Status::Failure;
                }
                Status::Success
            }
        }
    }
}

// === Tree ===

fn find_and_attack() -> Sequence<UnitStrategy> {
    Sequence::new("find_and_attack")
        .child(Leaf::new(
            "pull_triggered_target",
            Strategy::Action(UnitAction::PullTriggeredTarget),
        ))
        .child(Leaf::new(
            "ready_to_engage",
            Strategy::Condition(UnitCondition::ReadyToEngage),
        ))
        .child(Leaf::new(
            "target_in_range",
            Strategy::StatusAction(UnitCheck::TargetInRange),
        ))
        .child(Leaf::new(
            "begin_attack",
            Strategy::Action(UnitAction::BeginAttack),
        ))
}

/// Builds a fresh brain. Every unit owns its own copy.
#[must_use]
pub fn build_brain() -> UnitBrain {
    let attack_target = Sequence::with_priority("attack_target", 100)
        .child(Leaf::new(
            "no_target",
            Strategy::Condition(UnitCondition::NoTarget),
        ))
        .child(find_and_attack());

    let move_to_target = Sequence::with_priority("move_to_target", 80)
        .child(Leaf::new(
            "target_and_idle",
            Strategy::Condition(UnitCondition::TargetAndIdle),
        ))
        .child(Leaf::new(
            "track_target",
            Strategy::Action(UnitAction::TrackTarget),
        ))
        .child(Leaf::new(
            "move_to_target",
            Strategy::MoveTo(MoveToPoint::default()),
        ))
        .child(find_and_attack());

    let seek_target = Sequence::with_priority("seek_target", 90)
        .child(Leaf::new(
            "no_target_and_idle",
            Strategy::Condition(UnitCondition::NoTargetAndIdle),
        ))
        .child(Leaf::new(
            "seek_new_target",
            Strategy::Action(UnitAction::SeekNewTarget),
        ));

    let root = PrioritySelector::new("root")
        .child(attack_target)
        .child(move_to_target)
        .child(seek_target);

    BehaviourTree::new("unit_brain", root)
}
