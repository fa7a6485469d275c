//! Battle coordinator: owns every unit, both rosters, the trigger queues, and the battle state.
//!
//! Units never touch shared state directly; they go through the operations here, which keep the
//! roster and queue invariants intact. Death is processed synchronously inside
//! [`Battle::apply_damage`], so no later unit in the same tick can observe a dead unit.

pub mod events;
pub mod roster;
pub mod surrender;
mod tick;
pub mod trigger_queue;

use std::collections::VecDeque;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use thiserror::Error;

use crate::config::BattleConfig;
use crate::gameplay::combat::projectile::Projectile;
use crate::gameplay::spatial::TriggerZones;
use crate::gameplay::units::{Side, Unit, UnitId, UnitType};
use crate::{BattleState, GameSet};
use events::BattleEvent;
use roster::Roster;
use surrender::SurrenderThresholds;
use trigger_queue::TriggerQueues;

/// Undrained events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 4096;

/// Rejected coordinator commands. None of these leave the battle in a changed state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        state: BattleState,
        action: &'static str,
    },
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),
    #[error("loadout tile {0} does not exist")]
    TileOutOfRange(usize),
    #[error("no {} left in the inventory", .0.display_name())]
    Unavailable(UnitType),
}

#[derive(Resource, Debug)]
pub struct Battle {
    config: BattleConfig,
    state: BattleState,
    units: HashMap<UnitId, Unit>,
    roster: Roster,
    triggers: TriggerQueues,
    zones: TriggerZones,
    projectiles: Vec<Projectile>,
    thresholds: SurrenderThresholds,
    surrender_answered: bool,
    next_id: u32,
    events: VecDeque<BattleEvent>,
    events_overflowed: bool,
}

impl FromWorld for Battle {
    fn from_world(world: &mut World) -> Self {
        let config = world
            .get_resource::<BattleConfig>()
            .cloned()
            .unwrap_or_default();
        Self::new(config)
    }
}

impl Battle {
    #[must_use]
    pub fn new(config: BattleConfig) -> Self {
        Self {
            config,
            state: BattleState::PreparingPhase,
            units: HashMap::default(),
            roster: Roster::default(),
            triggers: TriggerQueues::default(),
            zones: TriggerZones::default(),
            projectiles: Vec::new(),
            thresholds: SurrenderThresholds::default(),
            surrender_answered: false,
            next_id: 0,
            events: VecDeque::new(),
            events_overflowed: false,
        }
    }

    // === Queries ===

    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> BattleState {
        self.state
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub const fn triggers(&self) -> &TriggerQueues {
        &self.triggers
    }

    #[must_use]
    pub const fn thresholds(&self) -> SurrenderThresholds {
        self.thresholds
    }

    #[must_use]
    pub const fn surrender_answered(&self) -> bool {
        self.surrender_answered
    }

    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// All units currently on the field, in no particular order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Alive means still on a roster.
    #[must_use]
    pub fn is_alive(&self, id: UnitId) -> bool {
        self.roster.contains(id)
    }

    #[must_use]
    pub fn position_of(&self, id: UnitId) -> Option<Vec2> {
        self.units.get(&id).map(Unit::position)
    }

    // === Roster editing ===

    /// Places a new unit. If the battle is already running the unit starts fighting at once.
    pub fn add_unit(
        &mut self,
        unit_type: UnitType,
        side: Side,
        position: Vec2,
    ) -> Result<UnitId, BattleError> {
        if self.state == BattleState::BattleOver {
            return Err(self.invalid("add a unit"));
        }

        let id = UnitId(self.next_id);
        self.next_id += 1;

        let mut unit = Unit::new(id, unit_type, side, position);
        if matches!(self.state, BattleState::Battling | BattleState::Paused) {
            unit.start_battle();
        }
        self.roster.insert(id, side);
        self.units.insert(id, unit);
        self.push_event(BattleEvent::UnitSpawned {
            id,
            unit_type,
            side,
            position,
        });
        debug!("Added {side:?} {} {id}", unit_type.display_name());
        Ok(id)
    }

    /// Takes a unit off the field before the battle starts. Fires no death notification.
    pub fn remove_unit(&mut self, id: UnitId) -> Result<(), BattleError> {
        if self.state != BattleState::PreparingPhase {
            return Err(self.invalid("remove a unit"));
        }
        if self.roster.remove(id).is_none() {
            return Err(BattleError::UnknownUnit(id));
        }
        self.forget(id);
        self.units.remove(&id);
        self.push_event(BattleEvent::UnitRemoved { id });
        debug!("Removed {id}");
        Ok(())
    }

    // === State machine ===

    /// Snapshots roster sizes into surrender thresholds and sets every unit going.
    /// A battle with an empty side ends immediately.
    pub fn start_battle(&mut self) -> Result<(), BattleError> {
        if self.state != BattleState::PreparingPhase {
            return Err(self.invalid("start the battle"));
        }

        let friendlies = self.roster.count(Side::Friendly);
        let enemies = self.roster.count(Side::Enemy);
        self.thresholds = SurrenderThresholds::from_start(friendlies, enemies, &self.config);
        self.surrender_answered = false;
        info!(
            "Battle starting: {friendlies} friendlies vs {enemies} enemies, surrender offered at \
             {} enemies with {} friendlies",
            self.thresholds.enemies, self.thresholds.friendlies
        );

        for unit in self.units.values_mut() {
            unit.start_battle();
        }
        self.transition(BattleState::Battling);

        if self.roster.any_side_empty() {
            self.transition(BattleState::BattleOver);
        }
        Ok(())
    }

    /// Applies the player's answer to a pending surrender offer.
    pub fn handle_surrender(&mut self, accepted: bool) -> Result<BattleState, BattleError> {
        if self.state != BattleState::Paused {
            return Err(self.invalid("answer a surrender offer"));
        }
        self.surrender_answered = true;
        info!(
            "Surrender {}",
            if accepted { "accepted" } else { "declined" }
        );
        let next = if accepted {
            BattleState::BattleOver
        } else {
            BattleState::Battling
        };
        self.transition(next);
        Ok(next)
    }

    // === Targeting ===

    /// Nearest unit on the opposing roster, or `None` if that roster is empty.
    /// Queued trigger candidates are not excluded.
    #[must_use]
    pub fn new_target(&self, unit: &Unit) -> Option<UnitId> {
        let origin = unit.position();
        let mut nearest: Option<(UnitId, f32)> = None;
        for &candidate in self.roster.members(unit.side().opposing()) {
            let Some(position) = self.position_of(candidate) else {
                continue;
            };
            let distance = origin.distance(position);
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((candidate, distance));
            }
        }
        nearest.map(|(id, _)| id)
    }

    /// Pops the nearest live entry from `unit`'s trigger queue, discarding stale ones.
    pub fn next_triggered_target(&mut self, unit: &Unit) -> Option<UnitId> {
        let roster = &self.roster;
        let units = &self.units;
        self.triggers
            .take_nearest(unit.id(), unit.position(), |candidate| {
                if roster.contains(candidate) {
                    units.get(&candidate).map(Unit::position)
                } else {
                    None
                }
            })
    }

    /// Puts a target that turned out to be out of reach back in `owner`'s queue.
    pub fn requeue_target(&mut self, owner: UnitId, target: UnitId) {
        if self.is_alive(target) {
            self.triggers.enqueue(owner, target);
        }
    }

    // === Damage and death ===

    /// Damages `id` and runs the death cascade if this brings it to zero.
    /// Returns `true` only when this call killed the unit.
    pub fn apply_damage(&mut self, id: UnitId, amount: f32) -> bool {
        if !self.roster.contains(id) {
            return false;
        }
        let Some(unit) = self.units.get_mut(&id) else {
            return false;
        };
        if unit.take_damage(amount) <= 0.0 {
            return false;
        }
        let health = unit.health();
        self.push_event(BattleEvent::HealthChanged {
            id,
            current: health.current,
            max: health.max,
        });
        if health.is_depleted() {
            return self.on_unit_died(id);
        }
        false
    }

    /// Removes a dead unit everywhere and re-evaluates the battle state.
    /// Calling it again for the same unit is a no-op that returns `false`.
    pub fn on_unit_died(&mut self, id: UnitId) -> bool {
        if !self.roster.contains(id) {
            return false;
        }

        for attacker in self.units.values_mut() {
            if attacker.target() == Some(id) {
                attacker.disengage();
            }
        }
        let Some(side) = self.roster.remove(id) else {
            return false;
        };
        self.forget(id);
        self.units.remove(&id);
        self.push_event(BattleEvent::UnitDied { id, side });

        let friendlies = self.roster.count(Side::Friendly);
        let enemies = self.roster.count(Side::Enemy);
        info!("{side:?} unit {id} died ({friendlies} friendlies, {enemies} enemies left)");

        if self.roster.any_side_empty() {
            self.transition(BattleState::BattleOver);
        } else if self.state == BattleState::Battling
            && !self.surrender_answered
            && self.thresholds.should_offer(friendlies, enemies)
        {
            info!("Offering surrender");
            self.transition(BattleState::Paused);
            self.push_event(BattleEvent::SurrenderRequested { friendlies, enemies });
        }
        true
    }

    // === Trigger zones ===

    /// `other` entered `owner`'s trigger zone.
    pub fn on_trigger_enter(&mut self, owner: UnitId, other: UnitId) {
        let (Some(owner_side), Some(other_side)) =
            (self.roster.side_of(owner), self.roster.side_of(other))
        else {
            return;
        };
        if owner_side != other_side {
            self.triggers.enqueue(owner, other);
        }
    }

    /// `other` left `owner`'s trigger zone.
    pub fn on_trigger_exit(&mut self, owner: UnitId, other: UnitId) {
        self.triggers.remove(owner, other);
    }

    // === Projectiles ===

    pub fn launch_projectile(&mut self, projectile: Projectile) {
        self.push_event(BattleEvent::ProjectileLaunched {
            owner: projectile.owner(),
            origin: projectile.origin(),
            direction: projectile.direction(),
        });
        self.projectiles.push(projectile);
    }

    // === Presentation ===

    /// Everything that happened since the last drain, oldest first.
    ///
    /// Whoever drives [`Battle::tick`] must drain regularly. The plugin does so every frame; a
    /// caller running the battle on its own keeps only the newest [`MAX_PENDING_EVENTS`].
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.events_overflowed = false;
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // === Internals ===

    /// Takes a unit out of the map so it can be mutated alongside the rest of the battle.
    /// It stays on its roster; [`Battle::attach`] puts it back.
    pub(crate) fn detach(&mut self, id: UnitId) -> Option<Unit> {
        self.units.remove(&id)
    }

    /// Returns a detached unit, unless it left the roster in the meantime.
    pub(crate) fn attach(&mut self, unit: Unit) {
        if self.roster.contains(unit.id()) {
            self.units.insert(unit.id(), unit);
        }
    }

    fn push_event(&mut self, event: BattleEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            if !self.events_overflowed {
                warn!("Battle events are not being drained; dropping the oldest");
                self.events_overflowed = true;
            }
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn forget(&mut self, id: UnitId) {
        self.triggers.purge(id);
        self.zones.forget(id);
    }

    fn transition(&mut self, to: BattleState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!("Battle state {from:?} -> {to:?}");
        self.push_event(BattleEvent::StateChanged { from, to });
    }

    const fn invalid(&self, action: &'static str) -> BattleError {
        BattleError::InvalidTransition {
            state: self.state,
            action,
        }
    }
}

// === Systems ===

/// Builds the battle from the loaded config unless one was inserted already.
fn init_battle(mut commands: Commands, config: Res<BattleConfig>, battle: Option<Res<Battle>>) {
    if battle.is_none() {
        commands.insert_resource(Battle::new(config.clone()));
    }
}

fn tick_battle(time: Res<Time>, mut battle: ResMut<Battle>) {
    battle.tick(time.delta());
}

fn publish_battle_events(mut battle: ResMut<Battle>, mut writer: MessageWriter<BattleEvent>) {
    for event in battle.drain_events() {
        writer.write(event);
    }
}

/// Mirrors the coordinator's state into the Bevy state machine.
fn sync_battle_state(
    battle: Res<Battle>,
    state: Res<State<BattleState>>,
    mut next: ResMut<NextState<BattleState>>,
) {
    if *state.get() != battle.state() {
        next.set(battle.state());
    }
}

// === Plugin ===

pub(crate) fn plugin(app: &mut App) {
    app.add_message::<BattleEvent>();
    app.add_systems(Startup, init_battle);
    app.add_systems(
        Update,
        (tick_battle, publish_battle_events, sync_battle_state)
            .chain()
            .in_set(GameSet::Simulation)
            .run_if(resource_exists::<Battle>),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn battle() -> Battle {
        Battle::new(BattleConfig::default())
    }

    /// `friendlies` and `enemies` warriors spread far apart so nothing touches.
    fn populated(friendlies: usize, enemies: usize) -> (Battle, Vec<UnitId>, Vec<UnitId>) {
        let mut battle = battle();
        let mut spawn = |side: Side, x: f32, count: usize| -> Vec<UnitId> {
            (0..count)
                .map(|i| {
                    battle
                        .add_unit(UnitType::Warrior, side, Vec2::new(x, i as f32 * 10.0))
                        .expect("preparing accepts units")
                })
                .collect()
        };
        let friendly = spawn(Side::Friendly, -100.0, friendlies);
        let enemy = spawn(Side::Enemy, 100.0, enemies);
        (battle, friendly, enemy)
    }

    #[test]
    fn new_battle_is_preparing() {
        let battle = battle();
        assert_eq!(battle.state(), BattleState::PreparingPhase);
        assert_eq!(battle.units().count(), 0);
    }

    #[test]
    fn add_unit_assigns_distinct_ids_and_rosters() {
        let (battle, friendly, enemy) = populated(2, 1);
        assert_eq!(friendly, vec![UnitId(0), UnitId(1)]);
        assert_eq!(enemy, vec![UnitId(2)]);
        assert_eq!(battle.roster().side_of(UnitId(2)), Some(Side::Enemy));
    }

    #[test]
    fn add_unit_during_battle_starts_it() {
        let (mut battle, _, _) = populated(1, 1);
        battle.start_battle().expect("can start");
        let late = battle
            .add_unit(UnitType::Archer, Side::Friendly, Vec2::ZERO)
            .expect("running battle accepts units");
        assert!(battle.unit(late).is_some_and(Unit::is_engaged));
    }

    #[test]
    fn add_unit_rejected_after_battle_over() {
        let mut battle = battle();
        battle.start_battle().expect("can start");
        assert_eq!(battle.state(), BattleState::BattleOver);
        assert!(matches!(
            battle.add_unit(UnitType::Warrior, Side::Friendly, Vec2::ZERO),
            Err(BattleError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn remove_unit_only_while_preparing() {
        let (mut battle, friendly, _) = populated(2, 1);
        battle.remove_unit(friendly[0]).expect("preparing allows removal");
        assert!(!battle.is_alive(friendly[0]));
        assert_eq!(
            battle.remove_unit(friendly[0]),
            Err(BattleError::UnknownUnit(friendly[0]))
        );

        battle.start_battle().expect("can start");
        assert!(matches!(
            battle.remove_unit(friendly[1]),
            Err(BattleError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn remove_unit_fires_no_death_event() {
        let (mut battle, friendly, _) = populated(1, 1);
        battle.drain_events();
        battle.remove_unit(friendly[0]).expect("preparing allows removal");
        assert_eq!(
            battle.drain_events(),
            vec![BattleEvent::UnitRemoved { id: friendly[0] }]
        );
    }

    #[test]
    fn start_battle_engages_units_and_snapshots_thresholds() {
        let (mut battle, friendly, _) = populated(10, 9);
        battle.start_battle().expect("can start");
        assert_eq!(battle.state(), BattleState::Battling);
        assert_eq!(
            battle.thresholds(),
            SurrenderThresholds {
                enemies: 3,
                friendlies: 5
            }
        );
        assert!(battle.unit(friendly[0]).is_some_and(Unit::is_engaged));
    }

    #[test]
    fn start_battle_twice_is_rejected() {
        let (mut battle, _, _) = populated(1, 1);
        battle.start_battle().expect("can start");
        assert_eq!(
            battle.start_battle(),
            Err(BattleError::InvalidTransition {
                state: BattleState::Battling,
                action: "start the battle",
            })
        );
    }

    #[test]
    fn new_target_is_nearest_opponent() {
        let mut battle = battle();
        let me = battle
            .add_unit(UnitType::Warrior, Side::Friendly, Vec2::ZERO)
            .expect("add");
        let far = battle
            .add_unit(UnitType::Warrior, Side::Enemy, Vec2::new(9.0, 0.0))
            .expect("add");
        let near = battle
            .add_unit(UnitType::Warrior, Side::Enemy, Vec2::new(0.0, -4.0))
            .expect("add");
        battle.on_trigger_enter(me, near);

        let unit = battle.unit(me).expect("exists");
        assert_eq!(battle.new_target(unit), Some(near));
        assert_ne!(battle.new_target(unit), Some(far));
    }

    #[test]
    fn new_target_with_empty_roster_is_none() {
        let mut battle = battle();
        let me = battle
            .add_unit(UnitType::Warrior, Side::Friendly, Vec2::ZERO)
            .expect("add");
        assert_eq!(battle.new_target(battle.unit(me).expect("exists")), None);
    }

    #[test]
    fn trigger_enter_ignores_allies() {
        let (mut battle, friendly, enemy) = populated(2, 1);
        battle.on_trigger_enter(friendly[0], friendly[1]);
        battle.on_trigger_enter(friendly[0], enemy[0]);
        assert_eq!(battle.triggers().queued(friendly[0]), vec![enemy[0]]);

        battle.on_trigger_exit(friendly[0], enemy[0]);
        assert!(battle.triggers().queued(friendly[0]).is_empty());
    }

    #[test]
    fn next_triggered_target_pops_nearest() {
        let mut battle = battle();
        let me = battle
            .add_unit(UnitType::Archer, Side::Friendly, Vec2::ZERO)
            .expect("add");
        let far = battle
            .add_unit(UnitType::Warrior, Side::Enemy, Vec2::new(3.0, 0.0))
            .expect("add");
        let near = battle
            .add_unit(UnitType::Warrior, Side::Enemy, Vec2::new(1.0, 0.0))
            .expect("add");
        battle.on_trigger_enter(me, far);
        battle.on_trigger_enter(me, near);

        let unit = battle.detach(me).expect("exists");
        assert_eq!(battle.next_triggered_target(&unit), Some(near));
        assert_eq!(battle.next_triggered_target(&unit), Some(far));
        assert_eq!(battle.next_triggered_target(&unit), None);
    }

    #[test]
    fn death_cascade_cleans_everything() {
        let (mut battle, friendly, enemy) = populated(2, 2);
        battle.start_battle().expect("can start");
        for &f in &friendly {
            battle.on_trigger_enter(f, enemy[0]);
            battle.on_trigger_enter(enemy[0], f);
        }
        let victim = enemy[0];
        battle.drain_events();

        assert!(battle.apply_damage(victim, 1_000.0));
        assert!(!battle.is_alive(victim));
        assert!(battle.unit(victim).is_none());
        assert!(!battle.triggers().mentions(victim));

        let deaths = battle
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, BattleEvent::UnitDied { .. }))
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn death_notification_is_idempotent() {
        let (mut battle, _, enemy) = populated(1, 2);
        battle.start_battle().expect("can start");
        assert!(battle.on_unit_died(enemy[0]));
        assert!(!battle.on_unit_died(enemy[0]));
        assert!(!battle.apply_damage(enemy[0], 10.0));
    }

    #[test]
    fn attackers_of_dead_unit_are_disengaged() {
        let (mut battle, friendly, enemy) = populated(1, 2);
        battle.start_battle().expect("can start");
        let mut attacker = battle.detach(friendly[0]).expect("exists");
        attacker.set_target(Some(enemy[0]));
        battle.attach(attacker);

        battle.on_unit_died(enemy[0]);
        assert_eq!(battle.unit(friendly[0]).and_then(Unit::target), None);
    }

    #[test]
    fn undrained_events_keep_only_the_newest() {
        let mut battle = battle();
        let extra = 10;
        for _ in 0..MAX_PENDING_EVENTS + extra {
            battle
                .add_unit(UnitType::Warrior, Side::Enemy, Vec2::ZERO)
                .expect("preparing accepts units");
        }
        assert_eq!(battle.pending_events(), MAX_PENDING_EVENTS);

        let events = battle.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(
            events.first(),
            Some(&BattleEvent::UnitSpawned {
                id: UnitId(extra as u32),
                unit_type: UnitType::Warrior,
                side: Side::Enemy,
                position: Vec2::ZERO,
            })
        );
        assert_eq!(battle.pending_events(), 0);
    }

    #[test]
    fn health_never_goes_negative() {
        let (mut battle, friendly, _) = populated(1, 2);
        battle.apply_damage(friendly[0], 30.0);
        assert_eq!(
            battle.unit(friendly[0]).map(|u| u.health().current),
            Some(70.0)
        );
        assert!(!battle.apply_damage(friendly[0], -5.0));
        assert_eq!(
            battle.unit(friendly[0]).map(|u| u.health().current),
            Some(70.0)
        );
    }

    #[test]
    fn surrender_offered_once_at_threshold() {
        let (mut battle, _, enemy) = populated(10, 9);
        battle.start_battle().expect("can start");

        for &id in &enemy[..5] {
            battle.on_unit_died(id);
            assert_eq!(battle.state(), BattleState::Battling);
        }
        battle.drain_events();
        battle.on_unit_died(enemy[5]);
        assert_eq!(battle.state(), BattleState::Paused);
        assert!(battle.drain_events().contains(&BattleEvent::SurrenderRequested {
            friendlies: 10,
            enemies: 3,
        }));

        battle.on_unit_died(enemy[6]);
        assert_eq!(battle.state(), BattleState::Paused);
        assert!(
            !battle
                .drain_events()
                .iter()
                .any(|event| matches!(event, BattleEvent::SurrenderRequested { .. }))
        );
    }

    #[test]
    fn no_surrender_offer_when_friendlies_below_threshold() {
        let (mut battle, friendly, enemy) = populated(10, 9);
        battle.start_battle().expect("can start");
        for &id in &friendly[..6] {
            battle.on_unit_died(id);
        }
        for &id in &enemy[..6] {
            battle.on_unit_died(id);
        }
        assert_eq!(battle.state(), BattleState::Battling);
    }

    #[test]
    fn declined_surrender_resumes_and_never_asks_again() {
        let (mut battle, _, enemy) = populated(10, 9);
        battle.start_battle().expect("can start");
        for &id in &enemy[..6] {
            battle.on_unit_died(id);
        }
        assert_eq!(battle.handle_surrender(false), Ok(BattleState::Battling));
        assert!(battle.surrender_answered());

        battle.on_unit_died(enemy[6]);
        assert_eq!(battle.state(), BattleState::Battling);
    }

    #[test]
    fn accepted_surrender_ends_battle() {
        let (mut battle, _, enemy) = populated(10, 9);
        battle.start_battle().expect("can start");
        for &id in &enemy[..6] {
            battle.on_unit_died(id);
        }
        assert_eq!(battle.handle_surrender(true), Ok(BattleState::BattleOver));
    }

    #[test]
    fn surrender_answer_outside_pause_is_rejected() {
        let (mut battle, _, _) = populated(1, 1);
        battle.start_battle().expect("can start");
        assert!(battle.handle_surrender(true).is_err());
        assert_eq!(battle.state(), BattleState::Battling);
        assert!(!battle.surrender_answered());
    }

    #[test]
    fn emptying_a_side_ends_battle_regardless_of_thresholds() {
        let (mut battle, _, enemy) = populated(10, 1);
        battle.start_battle().expect("can start");
        battle.on_unit_died(enemy[0]);
        assert_eq!(battle.state(), BattleState::BattleOver);
    }

    #[test]
    fn starting_with_empty_side_ends_immediately() {
        let (mut battle, _, _) = populated(3, 0);
        battle.start_battle().expect("can start");
        assert_eq!(battle.state(), BattleState::BattleOver);
    }
}
