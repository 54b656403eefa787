#![no_main]

use std::collections::BTreeMap;

use libfuzzer_sys::fuzz_target;
use skirmish::game::{CommanderProfile, Luck, check_invariants};
use skirmish::{Battlefield, MapDocument, render_ascii};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(document) = MapDocument::from_json(text) else {
        return;
    };

    let commanders: BTreeMap<_, _> = document
        .players()
        .into_iter()
        .map(|player| (player, CommanderProfile::base(Luck::Fixed(0))))
        .collect();
    if let Ok(field) = Battlefield::from_document(&document, commanders) {
        let violations = check_invariants(&field);
        assert!(violations.is_empty(), "Invariants violated on load: {violations:?}");
        let _ = render_ascii(&field);
    }
});
