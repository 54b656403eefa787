//! Game sessions: one battlefield, a sequence of actions and their history.

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, SessionError};
use crate::game::{Action, ActionState, Battlefield, PlayerId};

/// How a session treats invalid actions and whether it keeps snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Reject invalid actions with an error instead of skipping them.
    pub strict: bool,
    /// Snapshot the battlefield after every executed action.
    pub record_history: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            strict: true,
            record_history: true,
        }
    }
}

impl SessionConfig {
    /// Lenient, no history. What self-play uses.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            strict: false,
            record_history: false,
        }
    }
}

/// An executed action and the battlefield right after it.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// The executed action.
    pub action: Action,
    /// Battlefield after execution.
    pub battlefield: Battlefield,
}

/// Owns a battlefield and applies actions to it one at a time.
#[derive(Debug, Clone)]
pub struct GameSession {
    battlefield: Battlefield,
    config: SessionConfig,
    history: Vec<HistoryEntry>,
    actions_executed: usize,
}

impl GameSession {
    /// Start a session on `battlefield`.
    #[must_use]
    pub fn new(battlefield: Battlefield, config: SessionConfig) -> Self {
        let dims = battlefield.dimensions();
        tracing::info!(
            rows = dims.rows,
            cols = dims.cols,
            players = battlefield.players().len(),
            strict = config.strict,
            "session created"
        );
        Self {
            battlefield,
            config,
            history: Vec::new(),
            actions_executed: 0,
        }
    }

    /// Validate `action` if needed, then execute it.
    ///
    /// Returns the winner after the action, if any. A lenient session skips
    /// an invalid or already executed action and returns the current winner
    /// unchanged.
    ///
    /// # Errors
    ///
    /// A strict session returns [`SessionError::InvalidAction`] for an action
    /// that fails validation and [`SessionError::Action`] for one that has
    /// already been executed.
    pub fn execute_action(
        &mut self,
        action: &mut Action,
    ) -> Result<Option<PlayerId>, SessionError> {
        if *action.state() == ActionState::Executed {
            if self.config.strict {
                return Err(ActionError::NotValidated(action.to_string()).into());
            }
            tracing::warn!(action = %action, "skipping already executed action");
            return Ok(self.battlefield.check_winner());
        }
        if !action.is_validated() && !action.validate(&self.battlefield) {
            let reason = action.invalid_reason().unwrap_or_default().to_string();
            if self.config.strict {
                return Err(SessionError::InvalidAction {
                    action: action.to_string(),
                    reason,
                });
            }
            tracing::warn!(action = %action, %reason, "skipping invalid action");
            return Ok(self.battlefield.check_winner());
        }

        action.execute(&mut self.battlefield)?;
        self.actions_executed += 1;
        if self.config.record_history {
            self.history.push(HistoryEntry {
                action: action.clone(),
                battlefield: self.battlefield.clone(),
            });
        }

        let winner = self.battlefield.check_winner();
        if let Some(player) = winner {
            tracing::info!(
                winner = %player,
                day = self.battlefield.day(),
                "winner decided"
            );
        }
        Ok(winner)
    }

    /// The battlefield in its current state.
    #[must_use]
    pub const fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    /// Recorded snapshots, oldest first. Empty unless recording is enabled.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Session settings.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of actions executed so far.
    #[must_use]
    pub const fn actions_executed(&self) -> usize {
        self.actions_executed
    }

    /// Current winner, if any.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.battlefield.check_winner()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::game::{CommanderProfile, Coord, Luck, Offset, TerrainCatalog, Unit, UnitKind};

    fn session(config: SessionConfig) -> GameSession {
        let catalog = TerrainCatalog::new(['O', 'B']);
        let grid = vec![
            ["OHQ", "PLN", "PLN", "PLN"].map(|c| catalog.create(c).unwrap()).to_vec(),
            ["PLN", "PLN", "PLN", "BHQ"].map(|c| catalog.create(c).unwrap()).to_vec(),
        ];
        let units = vec![
            (Coord::new(0, 1), Unit::new(UnitKind::Infantry, 'B')),
            (Coord::new(1, 1), Unit::new(UnitKind::Infantry, 'O')),
        ];
        let commanders = BTreeMap::from([
            ('O', CommanderProfile::base(Luck::Fixed(0))),
            ('B', CommanderProfile::base(Luck::Fixed(0))),
        ]);
        GameSession::new(Battlefield::new(grid, units, commanders).unwrap(), config)
    }

    #[test]
    fn test_strict_rejects_invalid_action() {
        let mut session = session(SessionConfig::default());
        let mut action = Action::move_unit(Coord::new(1, 1), Offset::new(0, 1));
        let err = session.execute_action(&mut action).unwrap_err();
        assert!(matches!(err, SessionError::InvalidAction { .. }));
        assert!(err.to_string().contains("No unit belonging to B"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_lenient_skips_invalid_action() {
        let mut session = session(SessionConfig::lenient());
        let mut action = Action::move_unit(Coord::new(1, 1), Offset::new(0, 1));
        assert_eq!(session.execute_action(&mut action).unwrap(), None);
        assert_eq!(session.actions_executed(), 0);
        assert!(session.battlefield().unit(Coord::new(1, 1), Some('O')).is_some());
    }

    #[test]
    fn test_history_snapshots_after_each_action() {
        let mut session = session(SessionConfig::default());
        let mut action = Action::move_unit(Coord::new(0, 1), Offset::new(0, 1));
        session.execute_action(&mut action).unwrap();
        let mut end = Action::end_turn();
        session.execute_action(&mut end).unwrap();

        assert_eq!(session.history().len(), 2);
        let first = &session.history()[0];
        assert!(first.battlefield.unit(Coord::new(0, 2), Some('B')).is_some());
        assert_eq!(first.battlefield.current_player(), 'B');
        assert_eq!(session.battlefield().current_player(), 'O');
    }

    #[test]
    fn test_executed_action_cannot_run_twice() {
        let mut session = session(SessionConfig::default());
        let mut action = Action::end_turn();
        session.execute_action(&mut action).unwrap();
        assert!(matches!(
            session.execute_action(&mut action),
            Err(SessionError::Action(ActionError::NotValidated(_)))
        ));
        assert_eq!(session.actions_executed(), 1);
    }

    #[test]
    fn test_lenient_skips_already_executed_action() {
        let mut session = session(SessionConfig::lenient());
        let mut action = Action::end_turn();
        session.execute_action(&mut action).unwrap();
        assert_eq!(session.execute_action(&mut action).unwrap(), None);
        assert_eq!(session.actions_executed(), 1);
        assert_eq!(session.battlefield().current_player(), 'O');
    }

    #[test]
    fn test_capturing_last_headquarters_wins() {
        let mut session = session(SessionConfig::default());
        // B walks its infantry onto O's headquarters and captures over two turns.
        let mut step = Action::move_unit(Coord::new(0, 1), Offset::new(0, -1));
        session.execute_action(&mut step).unwrap();
        for _ in 0..2 {
            session.execute_action(&mut Action::end_turn()).unwrap();
        }
        let mut first = Action::capture(Coord::new(0, 0), Offset::ZERO);
        assert_eq!(session.execute_action(&mut first).unwrap(), None);
        for _ in 0..2 {
            session.execute_action(&mut Action::end_turn()).unwrap();
        }
        let mut second = Action::capture(Coord::new(0, 0), Offset::ZERO);
        assert_eq!(session.execute_action(&mut second).unwrap(), Some('B'));
        assert_eq!(session.winner(), Some('B'));
    }
}
