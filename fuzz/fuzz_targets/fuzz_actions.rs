#![no_main]

//! Feed arbitrary action sequences to a small battlefield and check that
//! validation never panics, validated actions always execute, and the
//! battlefield invariants hold after every step.

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skirmish::game::{CommanderProfile, Luck, TerrainCatalog, UnitKind, check_invariants};
use skirmish::{Action, Battlefield, Coord, Offset, Unit};

const TERRAIN: [&str; 6] = ["PLN", "ROD", "WOD", "MTN", "NCT", "SEA"];

#[derive(Arbitrary, Debug)]
enum FuzzAction {
    Move { row: u8, col: u8, dr: i8, dc: i8 },
    Join { row: u8, col: u8, dr: i8, dc: i8 },
    Attack { row: u8, col: u8, dr: i8, dc: i8, tr: i8, tc: i8 },
    Capture { row: u8, col: u8, dr: i8, dc: i8 },
    Repair { row: u8, col: u8, dr: i8, dc: i8, tr: i8, tc: i8 },
    Unload { row: u8, col: u8, dr: i8, dc: i8, tr: i8, tc: i8, slot: u8 },
    Build { row: u8, col: u8, kind: u8 },
    EndTurn,
    Power,
    SuperPower,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    seed: u64,
    terrain: Vec<u8>,
    units: Vec<(u8, u8, u8, bool)>,
    actions: Vec<FuzzAction>,
}

const ROWS: u16 = 6;
const COLS: u16 = 6;

fn coord(row: u8, col: u8) -> Coord {
    Coord::new(u16::from(row) % (ROWS + 1), u16::from(col) % (COLS + 1))
}

fn offset(dr: i8, dc: i8) -> Offset {
    Offset::new(i32::from(dr % 8), i32::from(dc % 8))
}

fn to_action(action: &FuzzAction) -> Action {
    match *action {
        FuzzAction::Move { row, col, dr, dc } => Action::move_unit(coord(row, col), offset(dr, dc)),
        FuzzAction::Join { row, col, dr, dc } => {
            Action::move_combine_load(coord(row, col), offset(dr, dc))
        }
        FuzzAction::Attack { row, col, dr, dc, tr, tc } => {
            Action::attack(coord(row, col), offset(dr, dc), offset(tr, tc))
        }
        FuzzAction::Capture { row, col, dr, dc } => Action::capture(coord(row, col), offset(dr, dc)),
        FuzzAction::Repair { row, col, dr, dc, tr, tc } => {
            Action::repair(coord(row, col), offset(dr, dc), offset(tr, tc))
        }
        FuzzAction::Unload { row, col, dr, dc, tr, tc, slot } => Action::unload(
            coord(row, col),
            offset(dr, dc),
            offset(tr, tc),
            usize::from(slot % 3),
        ),
        FuzzAction::Build { row, col, kind } => Action::build(
            coord(row, col),
            UnitKind::ALL[usize::from(kind) % UnitKind::ALL.len()],
        ),
        FuzzAction::EndTurn => Action::end_turn(),
        FuzzAction::Power => Action::commander_power(),
        FuzzAction::SuperPower => Action::super_commander_power(),
    }
}

fuzz_target!(|input: FuzzInput| {
    if input.actions.len() > 500 || input.units.len() > 36 {
        return;
    }

    let catalog = TerrainCatalog::new(['B', 'O']);
    let mut codes = input.terrain.iter().map(|b| TERRAIN[usize::from(*b) % TERRAIN.len()]);
    let mut grid = Vec::new();
    for row in 0..ROWS {
        let mut tiles = Vec::new();
        for col in 0..COLS {
            let code = match (row, col) {
                (0, 0) => "BHQ",
                (0, 1) => "BBS",
                (5, 5) => "OHQ",
                (5, 4) => "OBS",
                _ => codes.next().unwrap_or("PLN"),
            };
            match catalog.create(code) {
                Ok(tile) => tiles.push(tile),
                Err(_) => return,
            }
        }
        grid.push(tiles);
    }

    let mut placed = BTreeMap::new();
    for &(row, col, kind, blue) in &input.units {
        let at = Coord::new(u16::from(row) % ROWS, u16::from(col) % COLS);
        let kind = UnitKind::ALL[usize::from(kind) % UnitKind::ALL.len()];
        placed.insert(at, Unit::new(kind, if blue { 'B' } else { 'O' }));
    }

    let commanders = BTreeMap::from([
        ('B', CommanderProfile::base(Luck::seeded(input.seed))),
        ('O', CommanderProfile::base(Luck::seeded(input.seed.wrapping_add(1)))),
    ]);
    let mut field = match Battlefield::new(grid, placed.into_iter().collect(), commanders) {
        Ok(field) => field.with_funds('B', 20_000).with_funds('O', 20_000),
        Err(_) => return,
    };

    let violations = check_invariants(&field);
    assert!(violations.is_empty(), "Invariants violated at start: {violations:?}");

    for (step, fuzz_action) in input.actions.iter().enumerate() {
        let mut action = to_action(fuzz_action);
        if !action.validate(&field) {
            continue;
        }
        if let Err(error) = action.execute(&mut field) {
            panic!("Validated action {action} failed at step {step}: {error}");
        }

        let violations = check_invariants(&field);
        assert!(
            violations.is_empty(),
            "Invariants violated after {action} at step {step}: {violations:?}"
        );
    }
});
