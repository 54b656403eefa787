//! Text notation for actions, as typed at the `play` prompt or listed in an
//! action script.
//!
//! ```text
//! end
//! move 2,3 0,-2
//! attack 2,3 0,1 1,0
//! capture 4,4 0,0
//! repair 5,1 0,0 -1,0
//! build 0,0 INF
//! unload 3,3 1,0 0,1 0
//! cop
//! scop
//! ```
//!
//! Positions are absolute `row,col`; every other pair is an offset. Attack
//! and repair targets and unload drop tiles are relative to the
//! destination of the move.

use thiserror::Error;

use crate::error::CatalogError;
use crate::game::{Action, Attack, AttackMode, Coord, Move, Offset};

/// A line of notation that does not describe an action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// Nothing to parse.
    #[error("empty action")]
    Empty,
    /// The first word is not a known verb.
    #[error("unknown action {0:?}")]
    UnknownVerb(String),
    /// Too few or too many arguments for the verb.
    #[error("{verb} takes {expected} arguments, got {found}")]
    Arity {
        /// The verb.
        verb: &'static str,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },
    /// An argument is not a `row,col` pair.
    #[error("{0:?} is not a row,col pair")]
    BadPair(String),
    /// An argument is not a cargo slot index.
    #[error("{0:?} is not a cargo slot")]
    BadSlot(String),
    /// An attack target on the attacker's own tile.
    #[error("attack target must not be the attacker's tile")]
    SelfTarget,
    /// A build code that names no unit.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parse one action.
///
/// `move` with a zero offset is a plain wait; any other `move` may end in a
/// combine or load. An `attack` at distance one is a direct attack; anything
/// further is an indirect attack.
///
/// # Errors
///
/// Returns a [`NotationError`] if `text` is not well-formed notation.
pub fn parse_action(text: &str) -> Result<Action, NotationError> {
    let mut words = text.split_whitespace();
    let verb = words.next().ok_or(NotationError::Empty)?;
    let args: Vec<&str> = words.collect();

    let action = match verb.to_ascii_lowercase().as_str() {
        "end" => {
            arity("end", &args, 0)?;
            Action::end_turn()
        }
        "cop" => {
            arity("cop", &args, 0)?;
            Action::commander_power()
        }
        "scop" => {
            arity("scop", &args, 0)?;
            Action::super_commander_power()
        }
        "move" => {
            arity("move", &args, 2)?;
            let origin = position(args[0])?;
            let offset = offset(args[1])?;
            if offset.is_zero() {
                Action::move_unit(origin, offset)
            } else {
                Action::move_combine_load(origin, offset)
            }
        }
        "attack" => {
            arity("attack", &args, 3)?;
            let movement = Move::new(position(args[0])?, offset(args[1])?);
            let target = offset(args[2])?;
            let mode = match target.length() {
                0 => return Err(NotationError::SelfTarget),
                1 => AttackMode::Direct,
                _ => AttackMode::Indirect,
            };
            Action::Attack(Attack::new(movement, target, mode))
        }
        "capture" => {
            arity("capture", &args, 2)?;
            Action::capture(position(args[0])?, offset(args[1])?)
        }
        "repair" => {
            arity("repair", &args, 3)?;
            Action::repair(position(args[0])?, offset(args[1])?, offset(args[2])?)
        }
        "build" => {
            arity("build", &args, 2)?;
            Action::build_code(position(args[0])?, &args[1].to_ascii_uppercase())?
        }
        "unload" => {
            arity("unload", &args, 4)?;
            let slot = args[3]
                .parse()
                .map_err(|_| NotationError::BadSlot(args[3].to_string()))?;
            Action::unload(position(args[0])?, offset(args[1])?, offset(args[2])?, slot)
        }
        other => return Err(NotationError::UnknownVerb(other.to_string())),
    };
    Ok(action)
}

fn arity(verb: &'static str, args: &[&str], expected: usize) -> Result<(), NotationError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(NotationError::Arity {
            verb,
            expected,
            found: args.len(),
        })
    }
}

fn pair<T: std::str::FromStr>(text: &str) -> Result<(T, T), NotationError> {
    let bad = || NotationError::BadPair(text.to_string());
    let (a, b) = text.split_once(',').ok_or_else(bad)?;
    let a = a.trim().parse().map_err(|_| bad())?;
    let b = b.trim().parse().map_err(|_| bad())?;
    Ok((a, b))
}

fn position(text: &str) -> Result<Coord, NotationError> {
    let (row, col) = pair(text)?;
    Ok(Coord::new(row, col))
}

fn offset(text: &str) -> Result<Offset, NotationError> {
    let (dr, dc) = pair(text)?;
    Ok(Offset::new(dr, dc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_verbs() {
        assert!(matches!(parse_action("end").unwrap(), Action::EndTurn(_)));
        assert!(matches!(parse_action("  COP ").unwrap(), Action::CommanderPower(_)));
        assert!(matches!(parse_action("scop").unwrap(), Action::SuperCommanderPower(_)));
    }

    #[test]
    fn test_parse_move_variants() {
        assert!(matches!(parse_action("move 1,1 0,0").unwrap(), Action::Move(_)));
        let action = parse_action("move 0,0 0,3").unwrap();
        assert!(matches!(action, Action::MoveCombineLoad(_)));
        assert_eq!(action.to_string(), "Move unit at (0, 0) to (0, 3)");
    }

    #[test]
    fn test_parse_attack_picks_mode() {
        let Action::Attack(direct) = parse_action("attack 2,2 0,1 1,0").unwrap() else {
            panic!("expected attack");
        };
        assert_eq!(direct.mode(), AttackMode::Direct);

        let Action::Attack(ranged) = parse_action("attack 2,2 0,0 0,3").unwrap() else {
            panic!("expected attack");
        };
        assert_eq!(ranged.mode(), AttackMode::Indirect);

        assert_eq!(parse_action("attack 2,2 0,0 0,0").unwrap_err(), NotationError::SelfTarget);
    }

    #[test]
    fn test_parse_build_and_unload() {
        assert!(matches!(parse_action("build 0,0 inf").unwrap(), Action::Build(_)));
        assert!(matches!(parse_action("unload 3,3 1,0 0,1 1").unwrap(), Action::Unload(_)));
        assert!(matches!(
            parse_action("build 0,0 XYZ"),
            Err(NotationError::Catalog(CatalogError::UnknownUnit(_)))
        ));
    }

    #[test]
    fn test_malformed_notation() {
        assert_eq!(parse_action("   ").unwrap_err(), NotationError::Empty);
        assert!(matches!(parse_action("fly 1,1"), Err(NotationError::UnknownVerb(_))));
        assert!(matches!(
            parse_action("move 1,1"),
            Err(NotationError::Arity { verb: "move", expected: 2, found: 1 })
        ));
        assert!(matches!(parse_action("move 1;1 0,0"), Err(NotationError::BadPair(_))));
        assert!(matches!(parse_action("move -1,1 0,0"), Err(NotationError::BadPair(_))));
        assert!(matches!(parse_action("unload 1,1 0,0 1,0 x"), Err(NotationError::BadSlot(_))));
    }
}
