//! Property capture.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

mod support;

use skirmish::game::MAX_CAPTURE;
use skirmish::{Action, Offset, Unit, UnitKind};
use support::{apply, at, field, grid, pass_to, reject};

#[test]
fn test_full_health_capture_takes_two_turns() {
    let mut f = field(
        grid(&[&["NCT", "PLN"]]),
        vec![(at(0, 0), Unit::new(UnitKind::Infantry, 'B'))],
    );

    let action = apply(&mut f, Action::capture(at(0, 0), Offset::ZERO));
    assert_eq!(action.to_string(), "Move unit at (0, 0) to (0, 0) then capture");
    let city = f.property(at(0, 0), None).unwrap();
    assert_eq!(city.capture_progress(), 10);
    assert_eq!(city.owner(), None);

    pass_to(&mut f, 'O');
    pass_to(&mut f, 'B');
    apply(&mut f, Action::capture(at(0, 0), Offset::ZERO));

    let city = f.property(at(0, 0), None).unwrap();
    assert_eq!(city.owner(), Some('B'));
    assert_eq!(city.capture_progress(), MAX_CAPTURE);
}

#[test]
fn test_damaged_capturer_is_slower() {
    let mut f = field(
        grid(&[&["PLN", "NCT"]]),
        vec![(at(0, 0), Unit::new(UnitKind::Mech, 'B').with_health(45))],
    );
    apply(&mut f, Action::capture(at(0, 0), Offset::new(0, 1)));
    assert_eq!(f.property(at(0, 1), None).unwrap().capture_progress(), 15);
    assert!(f.unit(at(0, 1), Some('B')).is_some());
}

#[test]
fn test_moving_off_resets_progress() {
    let mut f = field(
        grid(&[&["NCT", "PLN"]]),
        vec![(at(0, 0), Unit::new(UnitKind::Infantry, 'B'))],
    );
    apply(&mut f, Action::capture(at(0, 0), Offset::ZERO));
    pass_to(&mut f, 'O');
    pass_to(&mut f, 'B');

    apply(&mut f, Action::move_unit(at(0, 0), Offset::new(0, 1)));
    assert_eq!(f.property(at(0, 0), None).unwrap().capture_progress(), MAX_CAPTURE);
}

#[test]
fn test_destroying_the_capturer_resets_progress() {
    let mut f = field(
        grid(&[&["PLN", "NCT", "PLN"]]),
        vec![
            (at(0, 1), Unit::new(UnitKind::Infantry, 'B').with_health(20)),
            (at(0, 2), Unit::new(UnitKind::Tank, 'O')),
        ],
    );
    apply(&mut f, Action::capture(at(0, 1), Offset::ZERO));
    assert_eq!(f.property(at(0, 1), None).unwrap().capture_progress(), 18);

    pass_to(&mut f, 'O');
    apply(&mut f, Action::attack(at(0, 2), Offset::ZERO, Offset::new(0, -1)));

    assert!(f.unit(at(0, 1), None).is_none());
    let city = f.property(at(0, 1), None).unwrap();
    assert_eq!(city.capture_progress(), MAX_CAPTURE);
    assert_eq!(city.owner(), None);
}

#[test]
fn test_headquarters_capture_wins() {
    let mut f = field(
        grid(&[&["BHQ", "PLN", "OHQ"]]),
        vec![(at(0, 2), Unit::new(UnitKind::Infantry, 'B'))],
    );
    apply(&mut f, Action::capture(at(0, 2), Offset::ZERO));
    assert_eq!(f.check_winner(), None);

    pass_to(&mut f, 'O');
    pass_to(&mut f, 'B');
    apply(&mut f, Action::capture(at(0, 2), Offset::ZERO));

    assert!(f.is_eliminated('O'));
    assert_eq!(f.check_winner(), Some('B'));
}

#[test]
fn test_capture_rejections() {
    let f = field(
        grid(&[&["NCT", "PLN", "BCT", "NCT"]]),
        vec![
            (at(0, 0), Unit::new(UnitKind::Tank, 'B')),
            (at(0, 1), Unit::new(UnitKind::Infantry, 'B')),
            (at(0, 2), Unit::new(UnitKind::Infantry, 'B')),
        ],
    );
    assert_eq!(
        reject(&f, Action::capture(at(0, 0), Offset::ZERO)),
        "TNK cannot capture properties"
    );
    assert_eq!(
        reject(&f, Action::capture(at(0, 1), Offset::ZERO)),
        "No property was found at (r:0, c:1)"
    );
    assert_eq!(
        reject(&f, Action::capture(at(0, 2), Offset::ZERO)),
        "Cannot capture own property"
    );
    assert_eq!(
        reject(&f, Action::capture(at(0, 1), Offset::new(0, -1))),
        "Destination is occupied"
    );
}
