//! Reusable leaf strategies.
//!
//! Leaves are a tagged variant rather than boxed closures: a [`Strategy`] is either a predicate,
//! a side effect, a status-reporting check, or [`MoveToPoint`]. The first three are generic over
//! small capability traits so a domain can supply its own enums (see `units::brain`), while tests
//! can use plain function pointers.

use bevy::prelude::*;

use super::{Process, Status};
use crate::gameplay::units::navigation::NavigationAgent;

/// Side-effect-free test against the context.
pub trait Predicate<C> {
    fn check(&self, ctx: &C) -> bool;
}

/// Side effect that always counts as success.
pub trait Effect<C> {
    fn apply(&self, ctx: &mut C);
}

/// Side effect that reports its own status.
pub trait Check<C> {
    fn run(&self, ctx: &mut C) -> Status;
}

impl<C> Predicate<C> for fn(&C) -> bool {
    fn check(&self, ctx: &C) -> bool {
        self(ctx)
    }
}

impl<C> Effect<C> for fn(&mut C) {
    fn apply(&self, ctx: &mut C) {
        self(ctx);
    }
}

impl<C> Check<C> for fn(&mut C) -> Status {
    fn run(&self, ctx: &mut C) -> Status {
        self(ctx)
    }
}

/// What a context must expose for [`MoveToPoint`] to steer it.
pub trait Steering {
    fn position(&self) -> Vec2;
    fn move_order(&self) -> MoveOrder;
    fn agent(&mut self) -> &mut dyn NavigationAgent;
    /// True while the battle is paused; outstanding movement is cancelled.
    fn movement_suspended(&self) -> bool;
}

/// Runtime-adjustable parameters of a move leaf. Owned by the steered unit so other leaves can
/// retarget it between ticks without touching the leaf itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct MoveOrder {
    pub destination: Option<Vec2>,
    pub min_stop_distance: f32,
    pub force_stop: bool,
}

/// Walks toward `MoveOrder::destination` until within `min_stop_distance`.
///
/// - `Failure` with no destination.
/// - `Success` once within range or when force-stopped; the agent is stopped and no new
///   destination is issued that tick.
/// - `Running` otherwise, re-issuing the destination so a moving target is followed.
#[derive(Debug, Clone, Default)]
pub struct MoveToPoint {
    path_requested: bool,
}

impl MoveToPoint {
    /// Whether a destination has been issued since the last arrival or reset.
    #[must_use]
    pub const fn path_requested(&self) -> bool {
        self.path_requested
    }

    pub fn process<C: Steering>(&mut self, ctx: &mut C) -> Status {
        let order = ctx.move_order();
        let Some(destination) = order.destination else {
            return Status::Failure;
        };

        let distance = ctx.position().distance(destination);
        if order.force_stop || distance <= order.min_stop_distance {
            ctx.agent().stop();
            self.path_requested = false;
            return Status::Success;
        }

        if ctx.movement_suspended() {
            ctx.agent().stop();
            return Status::Running;
        }

        ctx.agent().set_destination(destination);
        self.path_requested = true;
        Status::Running
    }
}

/// Leaf strategy kinds.
#[derive(Debug, Clone)]
pub enum Strategy<P, E, F> {
    Condition(P),
    Action(E),
    StatusAction(F),
    MoveTo(MoveToPoint),
}

impl<C, P, E, F> Process<C> for Strategy<P, E, F>
where
    C: Steering,
    P: Predicate<C>,
    E: Effect<C>,
    F: Check<C>,
{
    fn process(&mut self, ctx: &mut C) -> Status {
        match self {
            Self::Condition(predicate) => {
                if predicate.check(ctx) {
                    Status::Success
                } else {
                    Status::Failure
                }
            }
            Self::Action(effect) => {
                effect.apply(ctx);
                Status::Success
            }
            Self::StatusAction(check) => check.run(ctx),
            Self::MoveTo(mover) => mover.process(ctx),
        }
    }

    fn reset(&mut self) {
        if let Self::MoveTo(mover) = self {
            mover.path_requested = false;
        }
    }
}
