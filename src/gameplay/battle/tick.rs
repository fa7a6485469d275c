//! One simulation step: trigger zones, then every unit in roster order, then projectiles.

use std::mem;
use std::time::Duration;

use crate::BattleState;
use crate::gameplay::combat::advance_attack;
use crate::gameplay::spatial::{ZoneBody, ZoneEvent};
use crate::gameplay::units::brain::UnitCtx;
use crate::gameplay::units::{Unit, UnitId};

use super::Battle;

impl Battle {
    /// Advances the battle by `dt`. Does nothing unless the battle is `Battling`, and stops
    /// processing units as soon as a death or surrender offer changes that.
    pub fn tick(&mut self, dt: Duration) {
        if self.state != BattleState::Battling {
            return;
        }

        self.update_trigger_zones();

        for id in self.roster.tick_order() {
            if self.state != BattleState::Battling {
                return;
            }
            self.tick_unit(id, dt);
        }

        if self.state == BattleState::Battling {
            self.advance_projectiles(dt.as_secs_f32());
        }
    }

    fn update_trigger_zones(&mut self) {
        let bodies: Vec<ZoneBody> = self
            .roster
            .tick_order()
            .into_iter()
            .filter_map(|id| self.units.get(&id))
            .map(|unit| ZoneBody {
                id: unit.id(),
                side: unit.side(),
                position: unit.position(),
                radius: unit.stats().trigger_radius,
            })
            .collect();

        for event in self.zones.update(&bodies) {
            match event {
                ZoneEvent::Enter(a, b) => {
                    self.on_trigger_enter(a, b);
                    self.on_trigger_enter(b, a);
                }
                ZoneEvent::Exit(a, b) => {
                    self.on_trigger_exit(a, b);
                    self.on_trigger_exit(b, a);
                }
            }
        }
    }

    /// Decide, walk, attack. The unit is detached for the duration so its brain can borrow the
    /// rest of the battle mutably.
    fn tick_unit(&mut self, id: UnitId, dt: Duration) {
        // Died earlier in this tick.
        if !self.roster.contains(id) {
            return;
        }
        let Some(mut unit) = self.detach(id) else {
            return;
        };

        if let Some(mut brain) = unit.take_brain() {
            brain.process(&mut UnitCtx {
                unit: &mut unit,
                battle: &mut *self,
            });
            unit.restore_brain(brain);
        }

        if let Some(target) = unit.target().and_then(|target| self.position_of(target)) {
            unit.look_at(target);
        }
        let position = unit.position();
        let next = unit.agent_mut().advance(position, dt.as_secs_f32());
        unit.set_position(next);

        advance_attack(&mut unit, self, dt);

        if unit.target().is_some_and(|target| !self.is_alive(target)) {
            unit.disengage();
        }
        self.attach(unit);
    }

    /// Flies every arrow; the first opposing unit on its path takes the damage.
    /// Arrows outlive the archer that fired them.
    fn advance_projectiles(&mut self, dt: f32) {
        let mut in_flight = mem::take(&mut self.projectiles);
        in_flight.retain_mut(|projectile| {
            let (start, end) = projectile.advance(dt);
            let victim = self
                .roster
                .members(projectile.side().opposing())
                .iter()
                .filter_map(|id| self.units.get(id))
                .filter(|unit| projectile.sweeps(start, end, unit.position()))
                .min_by(|a, b| {
                    start
                        .distance(a.position())
                        .total_cmp(&start.distance(b.position()))
                })
                .map(Unit::id);

            if let Some(victim) = victim {
                self.apply_damage(victim, projectile.damage());
                return false;
            }
            !projectile.is_spent()
        });
        // Nothing launches during this pass, but keep anything that did.
        in_flight.append(&mut self.projectiles);
        self.projectiles = in_flight;
    }
}
