//! Aggregate results over many self-play games.

use std::collections::BTreeMap;

use crate::game::PlayerId;
use crate::selfplay::GameResult;

/// Running totals over a batch of games. Mergeable, so each worker can keep
/// its own and they are combined at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelfPlayStats {
    /// Games finished.
    pub games_played: u64,
    /// Wins per player.
    pub wins: BTreeMap<PlayerId, u64>,
    /// Games without a winner at the day limit.
    pub draws: u64,
    total_days: u64,
    total_actions: u64,
}

impl SelfPlayStats {
    /// Count one finished game.
    pub fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_days += u64::from(result.days);
        self.total_actions += result.actions as u64;
        match result.winner {
            Some(winner) => *self.wins.entry(winner).or_default() += 1,
            None => self.draws += 1,
        }
    }

    /// Fold another batch into this one.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.total_days += other.total_days;
        self.total_actions += other.total_actions;
        for (player, wins) in &other.wins {
            *self.wins.entry(*player).or_default() += wins;
        }
    }

    /// Wins for `player`.
    #[must_use]
    pub fn wins_for(&self, player: PlayerId) -> u64 {
        self.wins.get(&player).copied().unwrap_or(0)
    }

    /// Fraction of games `player` won (0.0-1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins_for(player) as f64 / self.games_played as f64
    }

    /// Average game length in days.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_days(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_days as f64 / self.games_played as f64
    }

    /// Total actions executed across all games.
    #[must_use]
    pub const fn total_actions(&self) -> u64 {
        self.total_actions
    }

    /// Average actions executed per game.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_actions(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_actions as f64 / self.games_played as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(winner: Option<PlayerId>, days: u32, actions: usize) -> GameResult {
        GameResult {
            seed: 0,
            winner,
            days,
            actions,
        }
    }

    #[test]
    fn test_add_and_rates() {
        let mut stats = SelfPlayStats::default();
        stats.add_result(&result(Some('O'), 10, 100));
        stats.add_result(&result(Some('O'), 6, 50));
        stats.add_result(&result(None, 20, 300));
        stats.add_result(&result(Some('B'), 4, 30));

        assert_eq!(stats.games_played, 4);
        assert_eq!(stats.wins_for('O'), 2);
        assert_eq!(stats.draws, 1);
        assert!((stats.win_rate('O') - 0.5).abs() < 1e-9);
        assert!((stats.avg_days() - 10.0).abs() < 1e-9);
        assert_eq!(stats.total_actions(), 480);
    }

    #[test]
    fn test_merge_matches_sequential() {
        let games = [
            result(Some('O'), 3, 10),
            result(None, 9, 40),
            result(Some('B'), 5, 22),
        ];
        let mut sequential = SelfPlayStats::default();
        games.iter().for_each(|g| sequential.add_result(g));

        let mut left = SelfPlayStats::default();
        left.add_result(&games[0]);
        let mut right = SelfPlayStats::default();
        right.add_result(&games[1]);
        right.add_result(&games[2]);
        left.merge(&right);

        assert_eq!(left, sequential);
    }

    #[test]
    fn test_empty_stats() {
        let stats = SelfPlayStats::default();
        assert!(stats.win_rate('O').abs() < f64::EPSILON);
        assert!(stats.avg_days().abs() < f64::EPSILON);
    }
}
