#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skirmish::game::Engagement;

/// Raw damage inputs, unconstrained except for display health.
#[derive(Arbitrary, Debug)]
struct DamageInput {
    base_damage: u16,
    attack_modifier: i32,
    luck: u32,
    attacker_display_health: u8,
    defense_modifier: i32,
    terrain_stars: u8,
    defender_display_health: u8,
}

fuzz_target!(|input: DamageInput| {
    let engagement = Engagement {
        base_damage: input.base_damage,
        attack_modifier: input.attack_modifier,
        luck: input.luck % 10,
        attacker_display_health: input.attacker_display_health % 11,
        defense_modifier: input.defense_modifier,
        terrain_stars: input.terrain_stars % 5,
        defender_display_health: input.defender_display_health % 11,
    };

    // Must never panic, whatever the modifiers
    let damage = engagement.damage();

    if input.attacker_display_health % 11 == 0 {
        assert_eq!(damage, 0, "a destroyed attacker dealt damage: {engagement:?}");
    }
});
