//! Shared fixtures for the integration tests.
//!
//! Players are `O` and `B`; `B` sorts first and so moves first.

#![allow(dead_code, missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use skirmish::game::{CommanderProfile, Luck, TerrainCatalog, Tile};
use skirmish::{Action, Battlefield, Coord, PlayerId, Unit};

/// Parse a grid of terrain codes for players `O` and `B`.
pub fn grid(rows: &[&[&str]]) -> Vec<Vec<Tile>> {
    let catalog = TerrainCatalog::new(['O', 'B']);
    rows.iter()
        .map(|row| row.iter().map(|code| catalog.create(code).unwrap()).collect())
        .collect()
}

/// An all-plain grid.
pub fn plains(rows: usize, cols: usize) -> Vec<Vec<Tile>> {
    let row = vec!["PLN"; cols];
    grid(&vec![row.as_slice(); rows])
}

/// Base commanders for `O` and `B` with luck fixed at zero.
pub fn commanders() -> BTreeMap<PlayerId, CommanderProfile> {
    BTreeMap::from([
        ('O', CommanderProfile::base(Luck::Fixed(0))),
        ('B', CommanderProfile::base(Luck::Fixed(0))),
    ])
}

/// Battlefield with zero-luck commanders.
pub fn field(tiles: Vec<Vec<Tile>>, units: Vec<(Coord, Unit)>) -> Battlefield {
    Battlefield::new(tiles, units, commanders()).unwrap()
}

/// Validate and execute, failing the test with the reason if invalid.
pub fn apply(field: &mut Battlefield, mut action: Action) -> Action {
    assert!(
        action.validate(field),
        "{action} rejected: {}",
        action.invalid_reason().unwrap_or_default()
    );
    action.execute(field).unwrap();
    action
}

/// Validate an action that must fail and return the reason.
pub fn reject(field: &Battlefield, mut action: Action) -> String {
    assert!(!action.validate(field), "{action} unexpectedly validated");
    action.invalid_reason().unwrap().to_string()
}

/// End turns until `player` is to move.
pub fn pass_to(field: &mut Battlefield, player: PlayerId) {
    while field.current_player() != player {
        apply(field, Action::end_turn());
    }
}

pub fn at(row: u16, col: u16) -> Coord {
    Coord::new(row, col)
}
