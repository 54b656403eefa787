//! Battlefield invariants - sanity checks that detect bugs.
//!
//! None of these should ever fire for a battlefield that was only changed
//! through executed actions. Fuzzing and property tests run them after
//! every step.

use std::fmt;

use crate::game::battlefield::Battlefield;
use crate::game::map::Coord;
use crate::game::terrain::MAX_CAPTURE;
use crate::game::unit::{MAX_HEALTH, Unit};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn check_unit(field: &Battlefield, at: Coord, unit: &Unit, out: &mut Vec<InvariantViolation>) {
    let mut report = |message: String| out.push(InvariantViolation { message });
    let spec = unit.spec();

    if unit.health() > MAX_HEALTH {
        report(format!("{unit} at {at} has health {} > {MAX_HEALTH}", unit.health()));
    }
    if unit.display_health() != unit.health().div_ceil(10) || unit.display_health() > 10 {
        report(format!(
            "{unit} at {at} has display health {} for health {}",
            unit.display_health(),
            unit.health()
        ));
    }
    if unit.fuel() > spec.max_fuel {
        report(format!("{unit} at {at} has fuel {} > {}", unit.fuel(), spec.max_fuel));
    }
    if unit.ammo() > spec.max_ammo {
        report(format!("{unit} at {at} has ammo {} > {}", unit.ammo(), spec.max_ammo));
    }
    if !field.players().contains(&unit.owner()) {
        report(format!("{unit} at {at} is owned by unknown player {}", unit.owner()));
    }
    if unit.cargo().len() > usize::from(spec.load_capacity) {
        report(format!(
            "{unit} at {at} carries {} units, capacity {}",
            unit.cargo().len(),
            spec.load_capacity
        ));
    }

    for passenger in unit.cargo() {
        if !spec.loadables.contains(&passenger.kind()) {
            out.push(InvariantViolation {
                message: format!("{unit} at {at} carries unloadable {passenger}"),
            });
        }
        if passenger.owner() != unit.owner() {
            out.push(InvariantViolation {
                message: format!("{unit} at {at} carries enemy {passenger}"),
            });
        }
        check_unit(field, at, passenger, out);
    }
}

/// Check all battlefield invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(field: &Battlefield) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let dims = field.dimensions();

    if !field.players().contains(&field.current_player()) {
        violations.push(InvariantViolation {
            message: format!("current player {} is not registered", field.current_player()),
        });
    }

    for (coord, unit) in field.units(None) {
        if !dims.contains(coord) {
            violations.push(InvariantViolation {
                message: format!("{unit} at {coord} is out of bounds"),
            });
        }
        check_unit(field, coord, unit, &mut violations);
    }

    for (coord, property) in field.properties(None) {
        if property.capture_progress() > MAX_CAPTURE {
            violations.push(InvariantViolation {
                message: format!(
                    "property at {coord} has capture progress {} > {MAX_CAPTURE}",
                    property.capture_progress()
                ),
            });
        }
        if let Some(owner) = property.owner().filter(|o| !field.players().contains(o)) {
            violations.push(InvariantViolation {
                message: format!("property at {coord} is owned by unknown player {owner}"),
            });
        }
    }

    violations
}

/// Assert all battlefield invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(field: &Battlefield) {
    let violations = check_invariants(field);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Battlefield invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_field: &Battlefield) {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::game::commander::{CommanderProfile, Luck};
    use crate::game::terrain::TerrainCatalog;
    use crate::game::unit::UnitKind;

    fn create_valid_field() -> Battlefield {
        let catalog = TerrainCatalog::new(['O', 'B']);
        let grid = vec![
            ["OHQ", "PLN", "NCT"].map(|c| catalog.create(c).unwrap()).to_vec(),
            ["PLN", "PLN", "BHQ"].map(|c| catalog.create(c).unwrap()).to_vec(),
        ];
        let units = vec![
            (Coord::new(0, 1), Unit::new(UnitKind::Infantry, 'O').with_health(37)),
            (
                Coord::new(1, 0),
                Unit::new(UnitKind::Apc, 'B').with_cargo(Unit::new(UnitKind::Mech, 'B')),
            ),
        ];
        let commanders = BTreeMap::from([
            ('O', CommanderProfile::base(Luck::Fixed(0))),
            ('B', CommanderProfile::base(Luck::Fixed(0))),
        ]);
        Battlefield::new(grid, units, commanders).unwrap()
    }

    #[test]
    fn test_valid_field_passes() {
        let field = create_valid_field();
        assert!(check_invariants(&field).is_empty());
        assert_invariants(&field);
    }

    #[test]
    fn test_out_of_bounds_unit_detected() {
        let mut field = create_valid_field();
        field.place_unit(Coord::new(9, 9), Unit::new(UnitKind::Tank, 'O'));
        let violations = check_invariants(&field);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("out of bounds"));
    }

    #[test]
    fn test_unknown_owner_detected() {
        let mut field = create_valid_field();
        field.place_unit(Coord::new(1, 1), Unit::new(UnitKind::Tank, 'R'));
        let violations = check_invariants(&field);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].to_string().starts_with("Invariant violation:"));
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut field = create_valid_field();
        field.place_unit(Coord::new(5, 5), Unit::new(UnitKind::Tank, 'R'));
        assert_eq!(check_invariants(&field).len(), 2);
    }

    #[test]
    #[should_panic(expected = "Battlefield invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_invariants_panics() {
        let mut field = create_valid_field();
        field.place_unit(Coord::new(5, 5), Unit::new(UnitKind::Tank, 'O'));
        assert_invariants(&field);
    }
}
