//! Benchmarks for the engine hot paths: battlefield setup, move validation,
//! damage, and complete self-play games.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::hint::black_box;
use std::path::Path;

use criterion::{Criterion, criterion_group, criterion_main};
use skirmish::game::{CommanderProfile, Engagement, Luck};
use skirmish::selfplay::{SelfPlayConfig, run_game};
use skirmish::{Action, Battlefield, Coord, MapDocument, Offset, PlayerId};

fn commanders() -> BTreeMap<PlayerId, CommanderProfile> {
    BTreeMap::from([
        ('B', CommanderProfile::base(Luck::Fixed(0))),
        ('O', CommanderProfile::base(Luck::Fixed(0))),
    ])
}

fn load(name: &str) -> MapDocument {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("maps").join(name);
    MapDocument::from_path(&path).unwrap()
}

fn bench_battlefield_setup(c: &mut Criterion) {
    let document = load("crossroads_15.json");

    c.bench_function("battlefield_from_document_15x15", |b| {
        b.iter(|| {
            let field = Battlefield::from_document(black_box(&document), commanders()).unwrap();
            black_box(field)
        });
    });
}

fn bench_end_turn(c: &mut Criterion) {
    // End of turn rebuilds every reachable set for the next player
    let field = Battlefield::from_document(&load("crossroads_15.json"), commanders()).unwrap();

    c.bench_function("end_turn_15x15", |b| {
        b.iter(|| {
            let mut field = field.clone();
            let mut action = Action::end_turn();
            action.validate(&field);
            action.execute(&mut field).unwrap();
            black_box(field)
        });
    });
}

fn bench_validate_moves(c: &mut Criterion) {
    let field = Battlefield::from_document(&load("two_player_small.json"), commanders()).unwrap();
    let origins: Vec<Coord> = field.units(Some('B')).map(|(at, _)| at).collect();

    c.bench_function("validate_moves_small", |b| {
        b.iter(|| {
            let mut valid = 0;
            for origin in &origins {
                for row in -3..=3 {
                    for col in -3..=3 {
                        let mut action = Action::move_unit(*origin, Offset::new(row, col));
                        valid += usize::from(action.validate(black_box(&field)));
                    }
                }
            }
            black_box(valid)
        });
    });
}

fn bench_damage(c: &mut Criterion) {
    let engagement = Engagement {
        base_damage: 55,
        attack_modifier: 110,
        luck: 7,
        attacker_display_health: 8,
        defense_modifier: 100,
        terrain_stars: 3,
        defender_display_health: 6,
    };

    c.bench_function("damage", |b| b.iter(|| black_box(&engagement).damage()));
}

fn bench_selfplay_game(c: &mut Criterion) {
    let field = Battlefield::from_document(&load("two_player_small.json"), commanders())
        .unwrap()
        .with_funds('B', 3000)
        .with_funds('O', 3000);
    let config = SelfPlayConfig {
        max_days: 20,
        ..SelfPlayConfig::default()
    };

    c.bench_function("selfplay_game_small", |b| {
        b.iter(|| {
            let result = run_game(black_box(42), black_box(&field), black_box(&config));
            black_box(result)
        });
    });
}

criterion_group!(
    benches,
    bench_battlefield_setup,
    bench_end_turn,
    bench_validate_moves,
    bench_damage,
    bench_selfplay_game
);
criterion_main!(benches);
