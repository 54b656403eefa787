//! Self-play harness.
//!
//! Provides a pure function interface: `(seed, battlefield) -> GameResult`.
//! Every player is driven by a [`RandomAgent`]; luck for every commander is
//! reseeded from the game seed, so the same seed on the same map always
//! plays out the same way.
//!
//! Batches run games in parallel with rayon. Each game owns its session
//! outright; the engine itself is never shared between threads.

mod agent;
mod stats;

pub use agent::RandomAgent;
pub use stats::SelfPlayStats;

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::game::{Action, Battlefield, CommanderProfile, Luck, PlayerId, assert_invariants};
use crate::session::{GameSession, SessionConfig};

/// Actions one player may take in a single turn before it is ended for them.
const MAX_ACTIONS_PER_TURN: usize = 256;

/// Configuration for a batch of self-play games.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games in a batch.
    pub games: u64,
    /// Games still undecided after this day are draws.
    pub max_days: u32,
    /// Seed of the first game; game `i` uses `seed + i`.
    pub seed: u64,
    /// Commander per player. Players not listed keep the battlefield's.
    pub commanders: BTreeMap<PlayerId, CommanderProfile>,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            games: 100,
            max_days: 40,
            seed: 0,
            commanders: BTreeMap::new(),
        }
    }
}

/// Outcome of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// Seed the game was played with.
    pub seed: u64,
    /// The winning player, `None` for a draw.
    pub winner: Option<PlayerId>,
    /// Day the game ended on.
    pub days: u32,
    /// Actions executed.
    pub actions: usize,
}

/// Luck seed for `player` in the game played with `seed`.
fn luck_seed(seed: u64, player: PlayerId) -> u64 {
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ u64::from(u32::from(player))
}

/// Play one game to a winner or the day limit.
///
/// # Determinism
///
/// Given the same seed, battlefield and commanders, this function always
/// produces the same `GameResult`.
#[must_use]
pub fn run_game(seed: u64, battlefield: &Battlefield, config: &SelfPlayConfig) -> GameResult {
    let mut field = battlefield.clone();
    for player in battlefield.players() {
        let profile = config
            .commanders
            .get(player)
            .or_else(|| battlefield.commander(*player))
            .cloned();
        if let (Some(profile), Some(slot)) = (profile, field.commander_mut(*player)) {
            *slot = profile.with_luck(Luck::seeded(luck_seed(seed, *player)));
        }
    }

    let mut session = GameSession::new(field, SessionConfig::lenient());
    let mut agent = RandomAgent::new(seed);
    let mut winner = session.winner();
    let mut taken_this_turn = 0;

    while winner.is_none() && session.battlefield().day() <= config.max_days {
        let mut action = if taken_this_turn < MAX_ACTIONS_PER_TURN {
            agent.choose(session.battlefield())
        } else {
            Action::end_turn()
        };
        let ends_turn = matches!(action, Action::EndTurn(_));

        match session.execute_action(&mut action) {
            Ok(outcome) => winner = outcome,
            Err(error) => {
                tracing::warn!(seed, %error, "self-play game aborted");
                break;
            }
        }
        assert_invariants(session.battlefield());
        taken_this_turn = if ends_turn { 0 } else { taken_this_turn + 1 };
    }

    GameResult {
        seed,
        winner,
        days: session.battlefield().day(),
        actions: session.actions_executed(),
    }
}

/// Run `config.games` games in parallel and aggregate their results.
#[must_use]
pub fn run_batch(battlefield: &Battlefield, config: &SelfPlayConfig) -> SelfPlayStats {
    run_batch_with_progress(battlefield, config, |_| {})
}

/// [`run_batch`], calling `on_game` after every finished game.
pub fn run_batch_with_progress(
    battlefield: &Battlefield,
    config: &SelfPlayConfig,
    on_game: impl Fn(&GameResult) + Sync + Send,
) -> SelfPlayStats {
    // Each worker folds into its own stats; they are merged at the end
    (0..config.games)
        .into_par_iter()
        .fold(SelfPlayStats::default, |mut local, i| {
            let result = run_game(config.seed.wrapping_add(i), battlefield, config);
            on_game(&result);
            local.add_result(&result);
            local
        })
        .reduce(SelfPlayStats::default, |mut a, b| {
            a.merge(&b);
            a
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Coord, TerrainCatalog, Unit, UnitKind};

    fn field() -> Battlefield {
        let catalog = TerrainCatalog::new(['O', 'B']);
        let grid = vec![
            ["OHQ", "OBS", "PLN", "PLN", "NCT"].map(|c| catalog.create(c).unwrap()).to_vec(),
            ["PLN", "WOD", "PLN", "WOD", "PLN"].map(|c| catalog.create(c).unwrap()).to_vec(),
            ["NCT", "PLN", "PLN", "BBS", "BHQ"].map(|c| catalog.create(c).unwrap()).to_vec(),
        ];
        let units = vec![
            (Coord::new(0, 2), Unit::new(UnitKind::Infantry, 'O')),
            (Coord::new(2, 2), Unit::new(UnitKind::Infantry, 'B')),
        ];
        let commanders = BTreeMap::from([
            ('O', CommanderProfile::base(Luck::Fixed(0))),
            ('B', CommanderProfile::base(Luck::Fixed(0))),
        ]);
        Battlefield::new(grid, units, commanders)
            .unwrap()
            .with_funds('O', 3000)
            .with_funds('B', 3000)
    }

    fn config() -> SelfPlayConfig {
        SelfPlayConfig {
            games: 4,
            max_days: 6,
            seed: 11,
            commanders: BTreeMap::new(),
        }
    }

    #[test]
    fn test_run_game_is_deterministic() {
        let field = field();
        let a = run_game(5, &field, &config());
        let b = run_game(5, &field, &config());
        assert_eq!(a, b);
        assert!(a.actions > 0);
    }

    #[test]
    fn test_run_game_respects_day_limit() {
        let result = run_game(9, &field(), &config());
        if result.winner.is_none() {
            assert_eq!(result.days, config().max_days + 1);
        } else {
            assert!(result.days <= config().max_days);
        }
    }

    #[test]
    fn test_batch_counts_every_game() {
        let field = field();
        let stats = run_batch(&field, &config());
        assert_eq!(stats.games_played, 4);
        let decided: u64 = stats.wins.values().sum();
        assert_eq!(decided + stats.draws, 4);
    }

    #[test]
    fn test_batch_matches_sequential_games() {
        let field = field();
        let config = config();
        let mut expected = SelfPlayStats::default();
        for i in 0..config.games {
            expected.add_result(&run_game(config.seed + i, &field, &config));
        }
        assert_eq!(run_batch(&field, &config), expected);
    }
}
