//! Seeded random agent.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::game::{Action, Battlefield, Coord, Offset, Unit};

/// Chance of picking an attack, capture or power over a positional action
/// when both are on offer.
const AGGRESSION: f64 = 0.8;

/// Chance of ending the turn while other legal actions remain.
const IDLE: f64 = 0.05;

/// Picks uniformly among legal actions, preferring attacks and captures.
///
/// Every proposed action has already passed [`Action::validate`] against the
/// battlefield it was chosen for.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

/// Candidates sorted by how eagerly the agent takes them.
#[derive(Default)]
struct Candidates {
    aggressive: Vec<Action>,
    positional: Vec<Action>,
}

impl Candidates {
    fn offer(&mut self, field: &Battlefield, mut action: Action, aggressive: bool) {
        if action.validate(field) {
            if aggressive {
                self.aggressive.push(action);
            } else {
                self.positional.push(action);
            }
        }
    }
}

impl RandomAgent {
    /// Create an agent with its own random stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Choose the next action for the current player.
    pub fn choose(&mut self, field: &Battlefield) -> Action {
        let mut candidates = Candidates::default();
        let player = field.current_player();

        candidates.offer(field, Action::super_commander_power(), true);
        candidates.offer(field, Action::commander_power(), true);

        for (coord, unit) in field.units(Some(player)).filter(|(_, u)| u.is_available()) {
            self.unit_candidates(field, coord, unit, &mut candidates);
        }
        self.build_candidates(field, &mut candidates);

        let Candidates {
            aggressive,
            positional,
        } = candidates;
        let pool = match (aggressive.is_empty(), positional.is_empty()) {
            (true, true) => return Action::end_turn(),
            (false, true) => aggressive,
            (true, false) => positional,
            (false, false) if self.rng.random_bool(AGGRESSION) => aggressive,
            (false, false) => positional,
        };
        if self.rng.random_bool(IDLE) {
            return Action::end_turn();
        }
        pool.choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(Action::end_turn)
    }

    fn unit_candidates(
        &mut self,
        field: &Battlefield,
        origin: Coord,
        unit: &Unit,
        out: &mut Candidates,
    ) {
        let reachable: Vec<Coord> = field.reachable_tiles(origin, unit).iter().copied().collect();
        let player = unit.owner();
        let moves_and_fires = unit.in_range(1);

        for &destination in &reachable {
            if destination != origin && !moves_and_fires {
                continue;
            }
            let offset = Offset::between(origin, destination);
            for (target, enemy) in field.units(None).filter(|(_, u)| u.owner() != player) {
                if unit.in_range(destination.distance(target)) && unit.attack_entry(enemy).is_some() {
                    let aim = Offset::between(destination, target);
                    out.offer(field, Action::attack(origin, offset, aim), true);
                }
            }
        }

        if unit.spec().can_capture {
            for &destination in &reachable {
                let capturable = field
                    .property(destination, None)
                    .is_some_and(|p| !p.is_owned_by(player));
                if capturable {
                    out.offer(field, Action::capture(origin, Offset::between(origin, destination)), true);
                }
            }
        }

        if !unit.cargo().is_empty() {
            for drop in Offset::CARDINAL {
                out.offer(field, Action::unload(origin, Offset::ZERO, drop, 0), false);
            }
        }
        if unit.spec().repair_amount.is_some() {
            for target in Offset::CARDINAL {
                out.offer(field, Action::repair(origin, Offset::ZERO, target), false);
            }
        }

        if let Some(&destination) = reachable.choose(&mut self.rng) {
            let offset = Offset::between(origin, destination);
            let action = if offset.is_zero() {
                Action::move_unit(origin, offset)
            } else {
                Action::move_combine_load(origin, offset)
            };
            out.offer(field, action, false);
        }
    }

    fn build_candidates(&mut self, field: &Battlefield, out: &mut Candidates) {
        let player = field.current_player();
        let funds = field.funds(player);
        let sites: Vec<_> = field
            .properties(Some(player))
            .filter(|(coord, _)| field.unit(*coord, None).is_none())
            .map(|(coord, property)| (coord, property.kind().buildables()))
            .collect();

        for (coord, buildables) in sites {
            let affordable: Vec<_> = buildables
                .iter()
                .filter(|kind| kind.spec().cost <= funds)
                .collect();
            if let Some(&&kind) = affordable.choose(&mut self.rng) {
                out.offer(field, Action::build(coord, kind), false);
            }
        }
    }
}
