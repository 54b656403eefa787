use std::fmt;

use crate::error::{ActionError, CatalogError};
use crate::game::action::moves::{Move, MoveBinding};
use crate::game::action::{ActionState, position_text, settle, tile_text};
use crate::game::battlefield::Battlefield;
use crate::game::map::{Coord, Offset, PlayerId};
use crate::game::terrain::PropertyKind;
use crate::game::unit::{Unit, UnitId, UnitKind};

fn stale(what: impl fmt::Display) -> ActionError {
    ActionError::StaleBinding(what.to_string())
}

/// Destination must be empty, or hold the mover itself.
fn check_destination(field: &Battlefield, binding: &MoveBinding) -> Result<(), String> {
    if field
        .unit(binding.destination, None)
        .is_some_and(|u| u.id() != binding.unit)
    {
        Err("Destination is occupied".to_string())
    } else {
        Ok(())
    }
}

fn mover<'a>(field: &'a Battlefield, movement: &Move) -> Result<&'a Unit, String> {
    field
        .unit(movement.origin(), None)
        .ok_or_else(|| "Moving unit is missing".to_string())
}

/// Move, then capture the property at the destination.
#[derive(Debug, Clone)]
pub struct Capture {
    movement: Move,
    state: ActionState,
    bound: Option<()>,
}

impl Capture {
    /// Wrap a move.
    #[must_use]
    pub fn new(movement: Move) -> Self {
        Self {
            movement,
            state: ActionState::Unvalidated,
            bound: None,
        }
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// Validate the move and the capture.
    pub fn validate(&mut self, field: &Battlefield) -> bool {
        let verdict = self.check(field);
        settle(&mut self.state, &mut self.bound, verdict)
    }

    fn check(&mut self, field: &Battlefield) -> Result<(), String> {
        let binding = self.movement.validate_step(field)?;
        check_destination(field, &binding)?;

        let capturer = mover(field, &self.movement)?;
        if !capturer.spec().can_capture {
            return Err(format!("{capturer} cannot capture properties"));
        }

        let target = binding.destination;
        let property = field.property(target, None).ok_or_else(|| {
            format!("No property was found at (r:{}, c:{})", target.row, target.col)
        })?;
        if property.is_owned_by(binding.owner) {
            return Err("Cannot capture own property".to_string());
        }
        Ok(())
    }

    /// Apply the move and reduce the capture progress.
    ///
    /// # Errors
    ///
    /// See [`Action::execute`](crate::game::Action::execute).
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        self.state.ensure_validated(|| self.to_string())?;
        let (binding, unit) = self.movement.execute_detached(field)?;
        let strength = i32::from(unit.display_health());
        field.place_unit(binding.destination, unit);

        let property = field
            .property_mut(binding.destination)
            .ok_or_else(|| stale(format!("no property at {}", binding.destination)))?;
        let flipped = property.change_capture(binding.owner, -strength);
        let headquarters = property.kind() == PropertyKind::Headquarters;
        if flipped {
            if headquarters {
                field.mark_headquarters(binding.owner);
            }
            tracing::debug!(player = %binding.owner, at = %binding.destination, "property captured");
        }

        self.state = ActionState::Executed;
        Ok(())
    }
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} then capture", self.movement)
    }
}

/// Build a unit on an owned production property.
#[derive(Debug, Clone)]
pub struct Build {
    position: Coord,
    kind: UnitKind,
    state: ActionState,
    owner: Option<PlayerId>,
}

impl Build {
    /// Build `kind` at `position`.
    #[must_use]
    pub fn new(position: Coord, kind: UnitKind) -> Self {
        Self {
            position,
            kind,
            state: ActionState::Unvalidated,
            owner: None,
        }
    }

    /// Build from a three-letter unit code.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownUnit`] for an unrecognized code.
    pub fn from_code(position: Coord, code: &str) -> Result<Self, CatalogError> {
        let kind =
            UnitKind::from_code(code).ok_or_else(|| CatalogError::UnknownUnit(code.to_string()))?;
        Ok(Self::new(position, kind))
    }

    /// Kind to build.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// Validate ownership, funds, production list and occupancy.
    pub fn validate(&mut self, field: &Battlefield) -> bool {
        let verdict = self.check(field);
        settle(&mut self.state, &mut self.owner, verdict)
    }

    fn check(&self, field: &Battlefield) -> Result<PlayerId, String> {
        let owner = field.current_player();
        let property = field.property(self.position, Some(owner)).ok_or_else(|| {
            format!(
                "No property owned by {owner} found at (r:{}, c:{})",
                self.position.row, self.position.col
            )
        })?;

        if field.funds(owner) < self.kind.spec().cost {
            return Err("Cannot afford to build".to_string());
        }
        if !property.kind().buildables().contains(&self.kind) {
            return Err(format!("{} cannot build {}", property.code(), self.kind));
        }
        if field.unit(self.position, None).is_some() {
            return Err("Property is already occupied".to_string());
        }
        Ok(owner)
    }

    /// Pay for and place the new unit. It cannot act until next turn.
    ///
    /// # Errors
    ///
    /// See [`Action::execute`](crate::game::Action::execute).
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        self.state.ensure_validated(|| self.to_string())?;
        let owner = self
            .owner
            .ok_or_else(|| ActionError::NotValidated(self.to_string()))?;
        if field.unit(self.position, None).is_some() {
            return Err(stale(format!("{} is occupied", self.position)));
        }
        if !field.debit(owner, self.kind.spec().cost) {
            return Err(stale(format!("{owner} can no longer afford {}", self.kind)));
        }

        let mut unit = Unit::new(self.kind, owner);
        unit.set_available(false);
        field.spawn_unit(self.position, unit);
        field.mark_unit_built(owner);

        self.state = ActionState::Executed;
        Ok(())
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Build {} at {}", self.kind, self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RepairPlan {
    target: Coord,
    patient: UnitId,
    amount: u8,
    cost: u32,
}

/// Move, then repair and resupply an adjacent friendly unit.
#[derive(Debug, Clone)]
pub struct Repair {
    movement: Move,
    offset: Offset,
    state: ActionState,
    plan: Option<RepairPlan>,
}

impl Repair {
    /// Repair the unit at `offset` from the move's destination.
    #[must_use]
    pub fn new(movement: Move, offset: Offset) -> Self {
        Self {
            movement,
            offset,
            state: ActionState::Unvalidated,
            plan: None,
        }
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// Validate the move and the repair.
    pub fn validate(&mut self, field: &Battlefield) -> bool {
        let verdict = self.check(field);
        settle(&mut self.state, &mut self.plan, verdict)
    }

    fn check(&mut self, field: &Battlefield) -> Result<RepairPlan, String> {
        let binding = self.movement.validate_step(field)?;
        if self.offset.length() != 1 {
            return Err("Invalid repair direction".to_string());
        }
        check_destination(field, &binding)?;

        let repairer = mover(field, &self.movement)?;
        let capacity = repairer
            .spec()
            .repair_amount
            .ok_or_else(|| format!("{repairer} cannot perform repairs"))?;

        let target = binding
            .destination
            .offset(self.offset)
            .filter(|t| field.dimensions().contains(*t));
        let patient = target
            .and_then(|t| field.unit(t, Some(binding.owner)))
            .filter(|u| u.id() != binding.unit)
            .ok_or_else(|| {
                format!(
                    "No unit belonging to {} was found at {}",
                    binding.owner,
                    tile_text(binding.destination, self.offset)
                )
            })?;
        let target = target.ok_or_else(|| "No repair target".to_string())?;

        let amount = capacity.min(10u8.saturating_sub(patient.display_health()));
        let cost = u32::from(amount) * patient.cost() / 10;
        if field.funds(binding.owner) < cost {
            return Err("Not enough funds".to_string());
        }

        Ok(RepairPlan {
            target,
            patient: patient.id(),
            amount,
            cost,
        })
    }

    /// Apply the move, then heal and resupply the target.
    ///
    /// # Errors
    ///
    /// See [`Action::execute`](crate::game::Action::execute).
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        self.state.ensure_validated(|| self.to_string())?;
        let plan = self
            .plan
            .ok_or_else(|| ActionError::NotValidated(self.to_string()))?;
        if field.unit(plan.target, None).is_none_or(|u| u.id() != plan.patient) {
            return Err(stale(format!("no unit {} at {}", plan.patient, plan.target)));
        }
        if field.funds(field.current_player()) < plan.cost {
            return Err(stale("repair is no longer affordable"));
        }

        let (binding, unit) = self.movement.execute_detached(field)?;
        field.place_unit(binding.destination, unit);
        field.debit(binding.owner, plan.cost);

        let patient = field
            .unit_mut(plan.target)
            .ok_or_else(|| stale(plan.target))?;
        patient.change_health(i32::from(plan.amount) * 10);
        patient.resupply();

        self.state = ActionState::Executed;
        Ok(())
    }
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let destination = self.movement.destination().unwrap_or(self.movement.origin());
        write!(
            f,
            "{} then repairs unit at {}",
            self.movement,
            position_text(destination, self.offset)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UnloadPlan {
    drop: Coord,
    cargo: UnitId,
}

/// Move a transport, then drop one of its passengers on an adjacent tile.
#[derive(Debug, Clone)]
pub struct Unload {
    movement: Move,
    offset: Offset,
    slot: usize,
    state: ActionState,
    plan: Option<UnloadPlan>,
}

impl Unload {
    /// Unload cargo `slot` at `offset` from the move's destination.
    #[must_use]
    pub fn new(movement: Move, offset: Offset, slot: usize) -> Self {
        Self {
            movement,
            offset,
            slot,
            state: ActionState::Unvalidated,
            plan: None,
        }
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// Validate the move and the drop.
    pub fn validate(&mut self, field: &Battlefield) -> bool {
        let verdict = self.check(field);
        settle(&mut self.state, &mut self.plan, verdict)
    }

    fn check(&mut self, field: &Battlefield) -> Result<UnloadPlan, String> {
        let binding = self.movement.validate_step(field)?;
        if self.offset.length() != 1 {
            return Err("Invalid unload direction".to_string());
        }
        check_destination(field, &binding)?;

        let transport = mover(field, &self.movement)?;
        let cargo = transport
            .cargo()
            .get(self.slot)
            .ok_or_else(|| "Nothing to unload".to_string())?;

        let drop = binding
            .destination
            .offset(self.offset)
            .filter(|d| field.dimensions().contains(*d))
            .ok_or_else(|| {
                format!(
                    "{} is not a valid unload position",
                    position_text(binding.destination, self.offset)
                )
            })?;

        let drop_tile = field
            .tile(drop)
            .ok_or_else(|| "Unload position is off the board".to_string())?;
        if !drop_tile.is_passable(cargo.mobility()) {
            return Err(format!("{cargo} cannot be placed on {drop_tile}"));
        }

        let own_tile = field
            .tile(binding.destination)
            .ok_or_else(|| "Destination is off the board".to_string())?;
        if !own_tile.is_passable(cargo.mobility()) {
            return Err(format!("{transport} cannot unload while on {own_tile}"));
        }

        if field
            .unit(drop, None)
            .is_some_and(|u| u.id() != binding.unit)
        {
            return Err("Already something there".to_string());
        }

        Ok(UnloadPlan {
            drop,
            cargo: cargo.id(),
        })
    }

    /// Apply the move and place the passenger. The passenger cannot act
    /// again this turn.
    ///
    /// # Errors
    ///
    /// See [`Action::execute`](crate::game::Action::execute).
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        self.state.ensure_validated(|| self.to_string())?;
        let plan = self
            .plan
            .ok_or_else(|| ActionError::NotValidated(self.to_string()))?;
        let bound = field
            .unit(self.movement.origin(), None)
            .and_then(|t| t.cargo().get(self.slot))
            .is_some_and(|c| c.id() == plan.cargo);
        if !bound {
            return Err(stale(format!("no cargo {} in slot {}", plan.cargo, self.slot)));
        }

        let (binding, mut transport) = self.movement.execute_detached(field)?;
        let cargo = transport.unload(self.slot);
        field.place_unit(binding.destination, transport);
        let mut cargo = cargo.ok_or_else(|| stale(format!("empty slot {}", self.slot)))?;
        cargo.set_available(false);
        field.place_unit(plan.drop, cargo);

        self.state = ActionState::Executed;
        Ok(())
    }
}

impl fmt::Display for Unload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let destination = self.movement.destination().unwrap_or(self.movement.origin());
        write!(
            f,
            "{} then unloads {} at {}",
            self.movement,
            self.slot,
            position_text(destination, self.offset)
        )
    }
}
