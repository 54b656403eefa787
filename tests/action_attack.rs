//! Attacks, counterattacks and the power meter.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

mod support;

use skirmish::game::{Attack, AttackMode, Move};
use skirmish::{Action, Offset, Unit, UnitKind};
use support::{apply, at, field, grid, plains, reject};

#[test]
fn test_infantry_duel_with_counter() {
    let mut f = field(
        plains(1, 3),
        vec![
            (at(0, 0), Unit::new(UnitKind::Infantry, 'B')),
            (at(0, 1), Unit::new(UnitKind::Infantry, 'O')),
        ],
    );
    let action = apply(&mut f, Action::attack(at(0, 0), Offset::ZERO, Offset::new(0, 1)));
    assert_eq!(
        action.to_string(),
        "Move unit at (0, 0) to (0, 0) then attack unit at (0, 1)"
    );

    assert_eq!(f.unit(at(0, 1), Some('O')).unwrap().health(), 51);
    let attacker = f.unit(at(0, 0), Some('B')).unwrap();
    assert_eq!(attacker.health(), 71);
    assert!(!attacker.is_available());

    // 49 dealt then 29 taken, each worth health * cost / 100; the striker
    // charges half of what the victim charges.
    assert_eq!(f.commander('O').unwrap().meter(), 490 + 145);
    assert_eq!(f.commander('B').unwrap().meter(), 245 + 290);
}

#[test]
fn test_counter_uses_post_move_position() {
    let mut f = field(
        plains(1, 4),
        vec![
            (at(0, 0), Unit::new(UnitKind::Tank, 'B')),
            (at(0, 3), Unit::new(UnitKind::Infantry, 'O')),
        ],
    );
    apply(&mut f, Action::attack(at(0, 0), Offset::new(0, 2), Offset::new(0, 1)));

    assert!(f.unit(at(0, 0), None).is_none());
    let tank = f.unit(at(0, 2), Some('B')).unwrap();
    assert_eq!(tank.fuel(), 68);
    assert_eq!(tank.ammo(), 9);
    assert_eq!(tank.health(), 99);
    assert_eq!(f.unit(at(0, 3), Some('O')).unwrap().health(), 33);
}

#[test]
fn test_attack_consumes_ammo() {
    let mut f = field(
        plains(1, 2),
        vec![
            (at(0, 0), Unit::new(UnitKind::Mech, 'B')),
            (at(0, 1), Unit::new(UnitKind::Tank, 'O')),
        ],
    );
    apply(&mut f, Action::attack(at(0, 0), Offset::ZERO, Offset::new(0, 1)));
    assert_eq!(f.unit(at(0, 0), Some('B')).unwrap().ammo(), 2);
    assert_eq!(f.unit(at(0, 1), Some('O')).unwrap().health(), 51);
    // Tank strikes back at mechs for free.
    assert_eq!(f.unit(at(0, 1), Some('O')).unwrap().ammo(), 9);
}

#[test]
fn test_indirect_attack_is_never_countered() {
    let mut f = field(
        plains(1, 4),
        vec![
            (at(0, 0), Unit::new(UnitKind::Artillery, 'B')),
            (at(0, 2), Unit::new(UnitKind::Infantry, 'O')),
        ],
    );
    let mut action = Action::indirect_attack(at(0, 0), Offset::new(0, 2));
    assert!(action.validate(&f));
    assert!(matches!(&action, Action::Attack(a) if !a.can_counterattack()));
    action.execute(&mut f).unwrap();

    let artillery = f.unit(at(0, 0), Some('B')).unwrap();
    assert_eq!(artillery.health(), 100);
    assert_eq!(artillery.ammo(), 8);
    assert_eq!(f.unit(at(0, 2), Some('O')).unwrap().health(), 19);
}

#[test]
fn test_indirect_rules() {
    let f = field(
        plains(2, 4),
        vec![
            (at(0, 0), Unit::new(UnitKind::Artillery, 'B')),
            (at(1, 0), Unit::new(UnitKind::Infantry, 'O')),
            (at(0, 3), Unit::new(UnitKind::Infantry, 'O')),
        ],
    );

    let moved = Action::Attack(Attack::new(
        Move::new(at(0, 0), Offset::new(0, 1)),
        Offset::new(0, 2),
        AttackMode::Indirect,
    ));
    assert_eq!(reject(&f, moved), "Cannot move and indirect attack");

    let adjacent = reject(&f, Action::attack(at(0, 0), Offset::ZERO, Offset::new(1, 0)));
    assert!(adjacent.starts_with("Target distance 1 not in range for ATY"), "{adjacent}");

    assert_eq!(
        reject(&f, Action::direct_attack(at(0, 0), Offset::ZERO, Offset::new(0, 3))),
        "Target distance 3 not valid for direct attack"
    );
}

#[test]
fn test_attack_rejections() {
    let f = field(
        grid(&[&["PLN", "PLN", "SEA"], &["PLN", "PLN", "PLN"]]),
        vec![
            (at(0, 0), Unit::new(UnitKind::Infantry, 'B')),
            (at(0, 1), Unit::new(UnitKind::Infantry, 'B')),
            (at(0, 2), Unit::new(UnitKind::Lander, 'O')),
            (at(1, 1), Unit::new(UnitKind::Mech, 'B').with_ammo(0)),
            (at(1, 2), Unit::new(UnitKind::Tank, 'O')),
        ],
    );

    assert_eq!(
        reject(&f, Action::attack(at(0, 0), Offset::ZERO, Offset::new(0, 1))),
        "Cannot attack own unit"
    );
    assert_eq!(
        reject(&f, Action::attack(at(0, 0), Offset::ZERO, Offset::new(1, 0))),
        "No unit to attack at (r:1, c:0)"
    );
    assert_eq!(
        reject(&f, Action::attack(at(0, 1), Offset::ZERO, Offset::new(0, 1))),
        "INF cannot attack LND"
    );
    assert_eq!(
        reject(&f, Action::attack(at(1, 1), Offset::ZERO, Offset::new(0, 1))),
        "Not enough ammo"
    );
}

#[test]
fn test_destroyed_defender_is_removed_without_counter() {
    let mut f = field(
        plains(1, 2),
        vec![
            (at(0, 0), Unit::new(UnitKind::Tank, 'B')),
            (at(0, 1), Unit::new(UnitKind::Infantry, 'O').with_health(10)),
        ],
    );
    apply(&mut f, Action::attack(at(0, 0), Offset::ZERO, Offset::new(0, 1)));
    assert!(f.unit(at(0, 1), None).is_none());
    assert_eq!(f.unit(at(0, 0), Some('B')).unwrap().health(), 100);
}

#[test]
fn test_defender_without_ammo_cannot_counter() {
    let mut f = field(
        plains(1, 2),
        vec![
            (at(0, 0), Unit::new(UnitKind::Tank, 'B')),
            (at(0, 1), Unit::new(UnitKind::Tank, 'O').with_ammo(0)),
        ],
    );
    let mut action = Action::attack(at(0, 0), Offset::ZERO, Offset::new(0, 1));
    assert!(action.validate(&f));
    assert!(matches!(&action, Action::Attack(a) if !a.can_counterattack()));
    action.execute(&mut f).unwrap();
    assert_eq!(f.unit(at(0, 0), Some('B')).unwrap().health(), 100);
    assert_eq!(f.unit(at(0, 0), Some('B')).unwrap().ammo(), 8);
}

#[test]
fn test_destroying_the_starting_army_wins() {
    let mut f = field(
        plains(1, 3),
        vec![
            (at(0, 0), Unit::new(UnitKind::Tank, 'B')),
            (at(0, 1), Unit::new(UnitKind::Infantry, 'O').with_health(5)),
        ],
    );
    assert_eq!(f.check_winner(), None);
    apply(&mut f, Action::direct_attack(at(0, 0), Offset::ZERO, Offset::new(0, 1)));

    assert_eq!(f.units(Some('O')).count(), 0);
    assert!(f.is_eliminated('O'));
    assert_eq!(f.check_winner(), Some('B'));
}
