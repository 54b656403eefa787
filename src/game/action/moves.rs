use std::fmt;

use crate::error::ActionError;
use crate::game::action::{ActionState, position_text, settle};
use crate::game::battlefield::Battlefield;
use crate::game::map::{Coord, Offset, PlayerId};
use crate::game::unit::{Unit, UnitId, UnitKind};

/// What a validated move resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MoveBinding {
    pub owner: PlayerId,
    pub unit: UnitId,
    pub kind: UnitKind,
    pub destination: Coord,
    pub fuel_cost: u32,
}

/// Move a unit by an offset. A zero offset waits in place.
#[derive(Debug, Clone)]
pub struct Move {
    origin: Coord,
    offset: Offset,
    state: ActionState,
    binding: Option<MoveBinding>,
}

impl Move {
    /// Move the unit at `origin` by `offset`.
    #[must_use]
    pub fn new(origin: Coord, offset: Offset) -> Self {
        Self {
            origin,
            offset,
            state: ActionState::Unvalidated,
            binding: None,
        }
    }

    /// Tile the unit starts on.
    #[must_use]
    pub const fn origin(&self) -> Coord {
        self.origin
    }

    /// Requested displacement.
    #[must_use]
    pub const fn offset(&self) -> Offset {
        self.offset
    }

    /// Destination, or `None` if it would have a negative coordinate.
    #[must_use]
    pub fn destination(&self) -> Option<Coord> {
        self.origin.offset(self.offset)
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// Validate as a standalone move: the destination must also be empty.
    pub fn validate(&mut self, field: &Battlefield) -> bool {
        let verdict = self.check(field).and_then(|binding| {
            let occupied = !self.offset.is_zero() && field.unit(binding.destination, None).is_some();
            if occupied {
                Err("Destination is occupied".to_string())
            } else {
                Ok(binding)
            }
        });
        settle(&mut self.state, &mut self.binding, verdict)
    }

    /// Validate as the first half of a composite action, unless already
    /// validated, and hand back the binding.
    pub(crate) fn validate_step(&mut self, field: &Battlefield) -> Result<MoveBinding, String> {
        if !self.state.is_validated() {
            let verdict = self.check(field);
            settle(&mut self.state, &mut self.binding, verdict);
        }
        match (&self.state, self.binding) {
            (ActionState::Validated, Some(binding)) => Ok(binding),
            (ActionState::Invalidated(reason), _) => Err(reason.clone()),
            _ => Err("Move has already been executed".to_string()),
        }
    }

    fn check(&self, field: &Battlefield) -> Result<MoveBinding, String> {
        let owner = field.current_player();
        let unit = field.unit(self.origin, Some(owner)).ok_or_else(|| {
            format!(
                "No unit belonging to {owner} was found at (r:{}, c:{})",
                self.origin.row, self.origin.col
            )
        })?;

        if !unit.is_available() {
            return Err("Unit is not available".to_string());
        }

        let destination = self
            .destination()
            .filter(|d| field.dimensions().contains(*d))
            .ok_or_else(|| {
                format!(
                    "Destination {} is out of bounds",
                    position_text(self.origin, self.offset)
                )
            })?;

        let fuel_cost = if self.offset.is_zero() {
            0
        } else {
            let cost = field.movement_cost(self.origin, destination, unit);
            let range = field.effective_movement(unit);
            if cost > range {
                return Err(format!("Movement cost {cost} exceeded unit move range {range}"));
            }
            if cost > u32::from(unit.fuel()) {
                return Err("Not enough fuel".to_string());
            }
            cost
        };

        Ok(MoveBinding {
            owner,
            unit: unit.id(),
            kind: unit.kind(),
            destination,
            fuel_cost,
        })
    }

    /// Lift the unit off its origin and pay for the move, leaving placement
    /// to the caller. The unit comes back spent for the turn.
    pub(crate) fn execute_detached(
        &mut self,
        field: &mut Battlefield,
    ) -> Result<(MoveBinding, Unit), ActionError> {
        self.state.ensure_validated(|| self.to_string())?;
        let binding = self
            .binding
            .ok_or_else(|| ActionError::NotValidated(self.to_string()))?;

        let mut unit = field
            .remove_unit(self.origin)
            .ok_or_else(|| ActionError::StaleBinding(format!("no unit at {}", self.origin)))?;
        if unit.id() != binding.unit {
            let found = unit.id();
            field.place_unit(self.origin, unit);
            return Err(ActionError::StaleBinding(format!(
                "expected unit {} at {}, found {found}",
                binding.unit, self.origin
            )));
        }

        unit.change_fuel(-i32::try_from(binding.fuel_cost).unwrap_or(i32::MAX));
        let left_capture = binding.destination != self.origin && unit.spec().can_capture;
        if let Some(property) = field.property_mut(self.origin).filter(|_| left_capture) {
            property.reset_capture();
        }
        unit.set_available(false);

        self.state = ActionState::Executed;
        Ok((binding, unit))
    }

    /// Apply a validated standalone move.
    ///
    /// # Errors
    ///
    /// See [`Action::execute`](crate::game::Action::execute).
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        let (binding, unit) = self.execute_detached(field)?;
        field.place_unit(binding.destination, unit);
        Ok(())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move unit at {} to {}",
            self.origin,
            position_text(self.origin, self.offset)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrival {
    Empty,
    Combine,
    Load,
}

/// Move that joins whatever friendly unit stands at the destination:
/// a damaged unit of the same kind is combined, a transport is boarded.
#[derive(Debug, Clone)]
pub struct MoveCombineLoad {
    movement: Move,
    state: ActionState,
    arrival: Option<Arrival>,
}

impl MoveCombineLoad {
    /// Wrap a move.
    #[must_use]
    pub fn new(movement: Move) -> Self {
        Self {
            movement,
            state: ActionState::Unvalidated,
            arrival: None,
        }
    }

    /// The wrapped move.
    #[must_use]
    pub const fn movement(&self) -> &Move {
        &self.movement
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// Whether validation resolved to a combine.
    #[must_use]
    pub fn is_combine(&self) -> bool {
        self.arrival == Some(Arrival::Combine)
    }

    /// Whether validation resolved to a load.
    #[must_use]
    pub fn is_load(&self) -> bool {
        self.arrival == Some(Arrival::Load)
    }

    /// Validate the move and what happens on arrival.
    pub fn validate(&mut self, field: &Battlefield) -> bool {
        let verdict = self.check(field);
        settle(&mut self.state, &mut self.arrival, verdict)
    }

    fn check(&mut self, field: &Battlefield) -> Result<Arrival, String> {
        let binding = self.movement.validate_step(field)?;
        let Some(occupant) = field.unit(binding.destination, None) else {
            return Ok(Arrival::Empty);
        };

        if occupant.owner() != binding.owner {
            return Err("Destination is occupied by enemy unit".to_string());
        }

        if occupant.kind() == binding.kind {
            if occupant.display_health() == 10 {
                return Err("Cannot combine with full health unit".to_string());
            }
            if occupant.id() == binding.unit {
                return Err("Cannot combine with self".to_string());
            }
            return Ok(Arrival::Combine);
        }

        let mover = field
            .unit(self.movement.origin(), None)
            .ok_or_else(|| "Moving unit is missing".to_string())?;
        if occupant.can_load(mover) {
            Ok(Arrival::Load)
        } else {
            Err(format!("Cannot load {mover} into {occupant}"))
        }
    }

    /// Apply the move and the combine or load.
    ///
    /// # Errors
    ///
    /// See [`Action::execute`](crate::game::Action::execute).
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        self.state.ensure_validated(|| self.to_string())?;
        let arrival = self
            .arrival
            .ok_or_else(|| ActionError::NotValidated(self.to_string()))?;

        let occupant = self.movement.destination().and_then(|d| field.unit(d, None));
        let ready = match (arrival, occupant) {
            (Arrival::Empty, _) => true,
            (Arrival::Combine, occupant) => occupant.is_some(),
            (Arrival::Load, Some(transport)) => field
                .unit(self.movement.origin(), None)
                .is_some_and(|mover| transport.can_load(mover)),
            (Arrival::Load, None) => false,
        };
        if !ready {
            return Err(ActionError::StaleBinding(format!(
                "nothing to join at {}",
                self.movement
            )));
        }

        let (binding, unit) = self.movement.execute_detached(field)?;
        match arrival {
            Arrival::Empty => {
                field.place_unit(binding.destination, unit);
            }
            Arrival::Combine => {
                let stale = || ActionError::StaleBinding(format!("combine target at {}", binding.destination));
                let target = field.unit_mut(binding.destination).ok_or_else(stale)?;
                let excess = target.combine_with(&unit);
                target.set_available(false);
                let refund = u32::from(excess) * unit.cost() / 10;
                field.credit(binding.owner, refund);
            }
            Arrival::Load => {
                let stale = || ActionError::StaleBinding(format!("transport at {}", binding.destination));
                let transport = field.unit_mut(binding.destination).ok_or_else(stale)?;
                if !transport.load(unit) {
                    return Err(stale());
                }
            }
        }

        self.state = ActionState::Executed;
        Ok(())
    }
}

impl fmt::Display for MoveCombineLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.movement.fmt(f)?;
        match self.arrival {
            Some(Arrival::Combine) => f.write_str(" then combine"),
            Some(Arrival::Load) => f.write_str(" then load"),
            _ => Ok(()),
        }
    }
}
