//! World presence for units: one sprite per unit, following the battle's positions.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::gameplay::battle::Battle;
use crate::gameplay::battle::events::BattleEvent;
use crate::gameplay::units::{Side, UnitId, UnitType};
use crate::{GameSet, Z_UNIT};

// === Constants ===

/// Screen pixels per world unit.
pub const PIXELS_PER_UNIT: f32 = 24.0;

pub const WARRIOR_SPRITE_SIZE: f32 = 20.0;
pub const ARCHER_SPRITE_SIZE: f32 = 14.0;

/// Alpha of a sprite at zero health; full health is opaque.
const MIN_ALPHA: f32 = 0.3;

// === Components ===

/// Marks the sprite entity showing a unit.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct UnitView {
    pub id: UnitId,
    pub side: Side,
    pub unit_type: UnitType,
}

/// Which entity shows which unit.
#[derive(Resource, Debug, Default)]
pub struct UnitViews(HashMap<UnitId, Entity>);

impl UnitViews {
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<Entity> {
        self.0.get(&id).copied()
    }
}

// === Helper Functions ===

#[must_use]
pub const fn unit_color(side: Side, unit_type: UnitType) -> Color {
    match (side, unit_type) {
        (Side::Friendly, UnitType::Warrior) => Color::srgb(0.2, 0.6, 0.9),
        (Side::Friendly, UnitType::Archer) => Color::srgb(0.3, 0.9, 0.6),
        (Side::Enemy, UnitType::Warrior) => Color::srgb(0.9, 0.25, 0.2),
        (Side::Enemy, UnitType::Archer) => Color::srgb(0.95, 0.6, 0.2),
    }
}

#[must_use]
pub const fn sprite_size(unit_type: UnitType) -> f32 {
    match unit_type {
        UnitType::Warrior => WARRIOR_SPRITE_SIZE,
        UnitType::Archer => ARCHER_SPRITE_SIZE,
    }
}

#[must_use]
pub fn world_to_screen(position: Vec2) -> Vec3 {
    (position * PIXELS_PER_UNIT).extend(Z_UNIT)
}

// === Systems ===

fn react_to_battle_events(
    mut commands: Commands,
    mut events: MessageReader<BattleEvent>,
    mut views: ResMut<UnitViews>,
    mut sprites: Query<(&UnitView, &mut Sprite)>,
) {
    for event in events.read() {
        match *event {
            BattleEvent::UnitSpawned {
                id,
                unit_type,
                side,
                position,
            } => {
                let entity = commands
                    .spawn((
                        Name::new(format!("{side:?} {} {id}", unit_type.display_name())),
                        UnitView {
                            id,
                            side,
                            unit_type,
                        },
                        Sprite::from_color(
                            unit_color(side, unit_type),
                            Vec2::splat(sprite_size(unit_type)),
                        ),
                        Transform::from_translation(world_to_screen(position)),
                    ))
                    .id();
                views.0.insert(id, entity);
            }
            BattleEvent::UnitDied { id, .. } | BattleEvent::UnitRemoved { id } => {
                if let Some(entity) = views.0.remove(&id) {
                    commands.entity(entity).despawn();
                }
            }
            BattleEvent::HealthChanged { id, current, max } => {
                let Some(entity) = views.get(id) else {
                    continue;
                };
                let Ok((view, mut sprite)) = sprites.get_mut(entity) else {
                    continue;
                };
                let fraction = if max > 0.0 { current / max } else { 0.0 };
                sprite.color = unit_color(view.side, view.unit_type)
                    .with_alpha((1.0 - MIN_ALPHA).mul_add(fraction, MIN_ALPHA));
            }
            BattleEvent::ProjectileLaunched { .. }
            | BattleEvent::StateChanged { .. }
            | BattleEvent::SurrenderRequested { .. } => {}
        }
    }
}

fn sync_unit_transforms(battle: Res<Battle>, mut views: Query<(&UnitView, &mut Transform)>) {
    for (view, mut transform) in &mut views {
        if let Some(position) = battle.position_of(view.id) {
            transform.translation = world_to_screen(position);
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<UnitView>().init_resource::<UnitViews>();
    app.add_systems(
        Update,
        (
            react_to_battle_events,
            sync_unit_transforms.run_if(resource_exists::<Battle>),
        )
            .chain()
            .in_set(GameSet::Presentation),
    );
}
