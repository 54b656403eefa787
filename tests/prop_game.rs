//! Property-based tests for game mechanics.
//!
//! These tests verify properties of damage, capture and action validation.
//! Run with: `cargo test --release prop_game`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

mod support;

use proptest::prelude::*;

use skirmish::game::{Engagement, MAX_CAPTURE, Property, PropertyKind, check_invariants};
use skirmish::selfplay::RandomAgent;
use skirmish::{Action, Battlefield, Coord, MapDocument, Offset, render_ascii};
use support::commanders;

fn small_map() -> Battlefield {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("maps")
        .join("two_player_small.json");
    let document = MapDocument::from_path(&path).unwrap();
    Battlefield::from_document(&document, commanders())
        .unwrap()
        .with_funds('B', 5000)
        .with_funds('O', 5000)
}

fn engagement(
    base: u16,
    attack: i32,
    luck: u32,
    attacker_hp: u8,
    defense: i32,
    stars: u8,
    defender_hp: u8,
) -> Engagement {
    Engagement {
        base_damage: base,
        attack_modifier: attack,
        luck,
        attacker_display_health: attacker_hp,
        defense_modifier: defense,
        terrain_stars: stars,
        defender_display_health: defender_hp,
    }
}

/// Any action that can be built from a handful of small integers.
fn arb_action() -> impl Strategy<Value = Action> {
    let pos = (0u16..6, 0u16..9).prop_map(|(r, c)| Coord::new(r, c));
    let off = (-3i32..=3, -3i32..=3).prop_map(|(r, c)| Offset::new(r, c));
    let near = (-1i32..=1, -1i32..=1).prop_map(|(r, c)| Offset::new(r, c));
    prop_oneof![
        (pos.clone(), off.clone()).prop_map(|(p, o)| Action::move_unit(p, o)),
        (pos.clone(), off.clone()).prop_map(|(p, o)| Action::move_combine_load(p, o)),
        (pos.clone(), off.clone(), off.clone()).prop_map(|(p, o, t)| Action::attack(p, o, t)),
        (pos.clone(), off.clone()).prop_map(|(p, o)| Action::capture(p, o)),
        (pos.clone(), off.clone(), near.clone()).prop_map(|(p, o, t)| Action::repair(p, o, t)),
        (pos.clone(), off, near, 0usize..2)
            .prop_map(|(at, by, drop, slot)| Action::unload(at, by, drop, slot)),
        pos.prop_map(|p| Action::build_code(p, "INF").unwrap()),
        Just(Action::end_turn()),
        Just(Action::commander_power()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Damage never panics and is never negative, whatever the inputs.
    #[test]
    fn prop_damage_total(
        base in 0u16..=200,
        attack in 0i32..=300,
        luck in 0u32..=9,
        attacker_hp in 0u8..=10,
        defense in 0i32..=400,
        stars in 0u8..=4,
        defender_hp in 0u8..=10,
    ) {
        let damage =
            engagement(base, attack, luck, attacker_hp, defense, stars, defender_hp).damage();
        // Raw damage cannot exceed (base * attack / 100 + luck) * 2.
        let ceiling = (u32::from(base) * u32::try_from(attack).unwrap() / 100 + luck + 1) * 2;
        prop_assert!(damage <= ceiling, "{damage} > {ceiling}");
    }

    /// With positive cover left, more luck or a healthier attacker never
    /// deals less damage.
    #[test]
    fn prop_damage_monotone(
        base in 1u16..=200,
        luck in 0u32..9,
        attacker_hp in 0u8..10,
        defense in 50i32..=130,
        stars in 0u8..=4,
        defender_hp in 0u8..=10,
    ) {
        let at = |luck, attacker_hp| {
            engagement(base, 100, luck, attacker_hp, defense, stars, defender_hp).damage()
        };
        prop_assert!(at(luck + 1, attacker_hp) >= at(luck, attacker_hp));
        prop_assert!(at(luck, attacker_hp + 1) >= at(luck, attacker_hp));
    }

    /// Capture progress stays within bounds and flips exactly when it
    /// would reach zero.
    #[test]
    fn prop_capture_progress(steps in prop::collection::vec(1u8..=10, 1..12)) {
        let mut property = Property::new(PropertyKind::City, None);
        let mut remaining = i32::from(MAX_CAPTURE);
        for strength in steps {
            remaining -= i32::from(strength);
            let flipped = property.change_capture('B', -i32::from(strength));
            prop_assert_eq!(flipped, remaining <= 0);
            if flipped {
                prop_assert_eq!(property.owner(), Some('B'));
                prop_assert_eq!(property.capture_progress(), MAX_CAPTURE);
                break;
            }
            prop_assert_eq!(i32::from(property.capture_progress()), remaining);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Validation never changes the battlefield and gives the same verdict
    /// when repeated.
    #[test]
    fn prop_validate_is_pure(action in arb_action()) {
        let field = small_map();
        let before = render_ascii(&field);

        let mut first = action.clone();
        let verdict = first.validate(&field);
        let mut second = action;
        prop_assert_eq!(second.validate(&field), verdict);
        prop_assert_eq!(first.invalid_reason(), second.invalid_reason());
        prop_assert_eq!(render_ascii(&field), before);
    }

    /// Executing whatever validates keeps every invariant.
    #[test]
    fn prop_actions_preserve_invariants(actions in prop::collection::vec(arb_action(), 1..40)) {
        let mut field = small_map();
        for mut action in actions {
            if action.validate(&field) {
                action.execute(&mut field).unwrap();
                let violations = check_invariants(&field);
                prop_assert!(violations.is_empty(), "{action}: {violations:?}");
            }
        }
    }

    /// Random agents only ever pick actions that execute cleanly.
    #[test]
    fn prop_agent_moves_are_legal(seed in any::<u64>()) {
        let mut field = small_map();
        let mut agent = RandomAgent::new(seed);
        for _ in 0..120 {
            if field.check_winner().is_some() {
                break;
            }
            let mut action = agent.choose(&field);
            prop_assert!(action.validate(&field), "{action}: {:?}", action.invalid_reason());
            action.execute(&mut field).unwrap();
            let violations = check_invariants(&field);
            prop_assert!(violations.is_empty(), "{violations:?}");
        }
    }
}
