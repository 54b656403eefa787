//! Actions: the only way a battlefield changes.
//!
//! Every action runs through two phases. [`Action::validate`] checks the
//! preconditions against a battlefield without touching it and records a
//! reason on failure; [`Action::execute`] applies a validated action. Calling
//! `execute` on anything but a freshly validated action is an
//! [`ActionError`], not a validation failure.
//!
//! Composite actions (combine/load, attack, capture, repair, unload) own a
//! [`Move`] and validate it first, so move-then-act is all or nothing.

mod attack;
mod logistics;
mod moves;
mod turn;

use std::fmt;

use crate::error::{ActionError, CatalogError};
use crate::game::battlefield::Battlefield;
use crate::game::commander::PowerLevel;
use crate::game::map::{Coord, Offset};
use crate::game::unit::UnitKind;

pub use attack::{Attack, AttackMode};
pub use logistics::{Build, Capture, Repair, Unload};
pub use moves::{Move, MoveCombineLoad};
pub use turn::{EndTurn, Power};

/// Where an action is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionState {
    /// Not checked yet.
    #[default]
    Unvalidated,
    /// Checked and ready to execute.
    Validated,
    /// Checked and rejected, with the reason.
    Invalidated(String),
    /// Applied. Terminal.
    Executed,
}

impl ActionState {
    /// Whether the last validation succeeded and the action has not run yet.
    #[must_use]
    pub const fn is_validated(&self) -> bool {
        matches!(self, Self::Validated)
    }

    /// Rejection reason, if the last validation failed.
    #[must_use]
    pub fn invalid_reason(&self) -> Option<&str> {
        match self {
            Self::Invalidated(reason) => Some(reason),
            _ => None,
        }
    }

    /// Fail unless the action is ready to execute.
    pub(crate) fn ensure_validated(&self, describe: impl FnOnce() -> String) -> Result<(), ActionError> {
        if self.is_validated() {
            Ok(())
        } else {
            Err(ActionError::NotValidated(describe()))
        }
    }
}

/// Record a validation verdict: store the bound data on success, the reason
/// on failure. Executed actions stay executed and never validate again.
pub(crate) fn settle<T>(
    state: &mut ActionState,
    binding: &mut Option<T>,
    verdict: Result<T, String>,
) -> bool {
    if *state == ActionState::Executed {
        return false;
    }
    match verdict {
        Ok(bound) => {
            *binding = Some(bound);
            *state = ActionState::Validated;
            true
        }
        Err(reason) => {
            *binding = None;
            *state = ActionState::Invalidated(reason);
            false
        }
    }
}

fn shifted(origin: Coord, offset: Offset) -> (i32, i32) {
    (
        i32::from(origin.row) + offset.dr,
        i32::from(origin.col) + offset.dc,
    )
}

/// `(r:R, c:C)` for a tile that may lie off the board.
pub(crate) fn tile_text(origin: Coord, offset: Offset) -> String {
    let (row, col) = shifted(origin, offset);
    format!("(r:{row}, c:{col})")
}

/// `(R, C)` for a tile that may lie off the board.
pub(crate) fn position_text(origin: Coord, offset: Offset) -> String {
    let (row, col) = shifted(origin, offset);
    format!("({row}, {col})")
}

/// Any action a player can take.
#[derive(Debug, Clone)]
pub enum Action {
    /// Move a unit (or wait in place).
    Move(Move),
    /// Move, then combine with a damaged twin or board a transport.
    MoveCombineLoad(MoveCombineLoad),
    /// Move, then attack.
    Attack(Attack),
    /// Move, then capture the property underneath.
    Capture(Capture),
    /// Build a unit on an owned property.
    Build(Build),
    /// Move, then repair an adjacent friendly unit.
    Repair(Repair),
    /// Move, then drop cargo on an adjacent tile.
    Unload(Unload),
    /// Pass the turn.
    EndTurn(EndTurn),
    /// Activate the commander power.
    CommanderPower(Power),
    /// Activate the super commander power.
    SuperCommanderPower(Power),
}

impl Action {
    /// Plain move.
    #[must_use]
    pub fn move_unit(origin: Coord, offset: Offset) -> Self {
        Self::Move(Move::new(origin, offset))
    }

    /// Move that may end in a combine or a load.
    #[must_use]
    pub fn move_combine_load(origin: Coord, offset: Offset) -> Self {
        Self::MoveCombineLoad(MoveCombineLoad::new(Move::new(origin, offset)))
    }

    /// Move, then attack the unit at `target` relative to the destination.
    #[must_use]
    pub fn attack(origin: Coord, offset: Offset, target: Offset) -> Self {
        Self::Attack(Attack::new(Move::new(origin, offset), target, AttackMode::Any))
    }

    /// Move, then attack an adjacent unit.
    #[must_use]
    pub fn direct_attack(origin: Coord, offset: Offset, target: Offset) -> Self {
        Self::Attack(Attack::new(Move::new(origin, offset), target, AttackMode::Direct))
    }

    /// Ranged attack without moving.
    #[must_use]
    pub fn indirect_attack(origin: Coord, target: Offset) -> Self {
        Self::Attack(Attack::new(
            Move::new(origin, Offset::ZERO),
            target,
            AttackMode::Indirect,
        ))
    }

    /// Move, then capture.
    #[must_use]
    pub fn capture(origin: Coord, offset: Offset) -> Self {
        Self::Capture(Capture::new(Move::new(origin, offset)))
    }

    /// Build `kind` at `position`.
    #[must_use]
    pub fn build(position: Coord, kind: UnitKind) -> Self {
        Self::Build(Build::new(position, kind))
    }

    /// Build the unit with three-letter `code` at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownUnit`] for an unrecognized code.
    pub fn build_code(position: Coord, code: &str) -> Result<Self, CatalogError> {
        Ok(Self::Build(Build::from_code(position, code)?))
    }

    /// Move, then repair the unit at `target` relative to the destination.
    #[must_use]
    pub fn repair(origin: Coord, offset: Offset, target: Offset) -> Self {
        Self::Repair(Repair::new(Move::new(origin, offset), target))
    }

    /// Move, then unload cargo `slot` at `drop` relative to the destination.
    #[must_use]
    pub fn unload(origin: Coord, offset: Offset, drop: Offset, slot: usize) -> Self {
        Self::Unload(Unload::new(Move::new(origin, offset), drop, slot))
    }

    /// End the current player's turn.
    #[must_use]
    pub fn end_turn() -> Self {
        Self::EndTurn(EndTurn::new())
    }

    /// Activate the commander power.
    #[must_use]
    pub fn commander_power() -> Self {
        Self::CommanderPower(Power::new(PowerLevel::Cop))
    }

    /// Activate the super commander power.
    #[must_use]
    pub fn super_commander_power() -> Self {
        Self::SuperCommanderPower(Power::new(PowerLevel::Scop))
    }

    /// Check the action against `field`. On failure the reason is available
    /// from [`Action::invalid_reason`]. Never mutates the battlefield.
    pub fn validate(&mut self, field: &Battlefield) -> bool {
        match self {
            Self::Move(a) => a.validate(field),
            Self::MoveCombineLoad(a) => a.validate(field),
            Self::Attack(a) => a.validate(field),
            Self::Capture(a) => a.validate(field),
            Self::Build(a) => a.validate(field),
            Self::Repair(a) => a.validate(field),
            Self::Unload(a) => a.validate(field),
            Self::EndTurn(a) => a.validate(field),
            Self::CommanderPower(a) | Self::SuperCommanderPower(a) => a.validate(field),
        }
    }

    /// Apply a validated action.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotValidated`] unless the action was validated
    /// and not yet executed, and [`ActionError::StaleBinding`] if the units
    /// bound during validation are no longer where they were.
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        match self {
            Self::Move(a) => a.execute(field),
            Self::MoveCombineLoad(a) => a.execute(field),
            Self::Attack(a) => a.execute(field),
            Self::Capture(a) => a.execute(field),
            Self::Build(a) => a.execute(field),
            Self::Repair(a) => a.execute(field),
            Self::Unload(a) => a.execute(field),
            Self::EndTurn(a) => a.execute(field),
            Self::CommanderPower(a) | Self::SuperCommanderPower(a) => a.execute(field),
        }?;
        tracing::debug!(action = %self, "action executed");
        Ok(())
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        match self {
            Self::Move(a) => a.state(),
            Self::MoveCombineLoad(a) => a.state(),
            Self::Attack(a) => a.state(),
            Self::Capture(a) => a.state(),
            Self::Build(a) => a.state(),
            Self::Repair(a) => a.state(),
            Self::Unload(a) => a.state(),
            Self::EndTurn(a) => a.state(),
            Self::CommanderPower(a) | Self::SuperCommanderPower(a) => a.state(),
        }
    }

    /// Whether the action is validated and not yet executed.
    #[must_use]
    pub const fn is_validated(&self) -> bool {
        self.state().is_validated()
    }

    /// Reason the last validation failed.
    #[must_use]
    pub fn invalid_reason(&self) -> Option<&str> {
        self.state().invalid_reason()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(a) => a.fmt(f),
            Self::MoveCombineLoad(a) => a.fmt(f),
            Self::Attack(a) => a.fmt(f),
            Self::Capture(a) => a.fmt(f),
            Self::Build(a) => a.fmt(f),
            Self::Repair(a) => a.fmt(f),
            Self::Unload(a) => a.fmt(f),
            Self::EndTurn(a) => a.fmt(f),
            Self::CommanderPower(a) | Self::SuperCommanderPower(a) => a.fmt(f),
        }
    }
}
