//! Property tests for the health and death invariants.

use bevy::prelude::*;
use proptest::prelude::*;
use tactics_battle::config::BattleConfig;
use tactics_battle::gameplay::battle::Battle;
use tactics_battle::gameplay::battle::events::BattleEvent;
use tactics_battle::gameplay::units::{Health, Side, UnitType};

fn damage() -> impl Strategy<Value = f32> {
    prop_oneof![
        -50.0f32..250.0,
        Just(0.0),
        Just(f32::NAN),
        Just(f32::INFINITY),
    ]
}

proptest! {
    #[test]
    fn health_never_rises_or_goes_negative(hits in prop::collection::vec(damage(), 0..40)) {
        let mut health = Health::new(100.0);
        for hit in hits {
            let before = health.current;
            let applied = health.take_damage(hit);
            prop_assert!(health.current >= 0.0);
            prop_assert!(health.current <= before);
            prop_assert!(applied >= 0.0);
        }
    }

    #[test]
    fn death_is_reported_exactly_once(hits in prop::collection::vec(damage(), 1..40)) {
        let mut battle = Battle::new(BattleConfig::default());
        battle.add_unit(UnitType::Warrior, Side::Friendly, Vec2::ZERO).expect("add");
        let victim = battle.add_unit(UnitType::Warrior, Side::Enemy, Vec2::new(50.0, 0.0)).expect("add");
        battle.add_unit(UnitType::Archer, Side::Enemy, Vec2::new(50.0, 10.0)).expect("add");
        battle.start_battle().expect("can start");

        let mut kills = 0;
        for hit in hits {
            if battle.apply_damage(victim, hit) {
                kills += 1;
            }
        }
        let deaths = battle
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, BattleEvent::UnitDied { id, .. } if *id == victim))
            .count();

        prop_assert!(kills <= 1);
        prop_assert_eq!(deaths, kills);
        prop_assert_eq!(battle.is_alive(victim), kills == 0);
        prop_assert!(!battle.triggers().mentions(victim) || kills == 0);
    }
}
