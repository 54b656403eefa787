use std::fmt;

use crate::error::ActionError;
use crate::game::action::{ActionState, settle};
use crate::game::battlefield::Battlefield;
use crate::game::commander::PowerLevel;
use crate::game::map::{Coord, PlayerId};

/// Display health restored per day on a friendly facility.
const DAILY_REPAIR: u8 = 2;

/// Pass the turn and run the start-of-turn upkeep for the next player.
#[derive(Debug, Clone, Default)]
pub struct EndTurn {
    state: ActionState,
    bound: Option<()>,
}

impl EndTurn {
    /// Create an end-turn action.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// Ending the turn is always legal.
    pub fn validate(&mut self, _field: &Battlefield) -> bool {
        settle(&mut self.state, &mut self.bound, Ok(()))
    }

    /// Advance to the next player, then for that player: burn daily fuel,
    /// collect income, ready every unit, resupply and repair units on
    /// friendly facilities, and end any active power.
    ///
    /// # Errors
    ///
    /// See [`Action::execute`](crate::game::Action::execute).
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        self.state.ensure_validated(|| self.to_string())?;

        let new_day = field.advance_player();
        let player = field.current_player();

        for (_, unit) in field.units_mut().filter(|(_, u)| u.owner() == player) {
            unit.change_fuel(-i32::from(unit.spec().daily_fuel));
            unit.set_available(true);
        }

        let income: u32 = field
            .properties(Some(player))
            .map(|(_, p)| p.kind().income())
            .sum();
        field.credit(player, income);

        resupply_and_repair(field, player);

        let movement_changed = field.commander(player).is_some_and(|co| co.movement_bonus() != 0);
        if let Some(co) = field.commander_mut(player) {
            co.reset_power();
        }
        field.refresh_movement();

        tracing::debug!(
            player = %player,
            day = field.day(),
            new_day,
            income,
            movement_changed,
            "turn started"
        );

        self.state = ActionState::Executed;
        Ok(())
    }
}

/// Units on a friendly facility that services their mobility class get
/// full fuel and ammo. Repairs are paid in row-major order; once one is
/// unaffordable, repairing stops for the day but resupply continues.
fn resupply_and_repair(field: &mut Battlefield, player: PlayerId) {
    let serviced: Vec<Coord> = field
        .units(Some(player))
        .filter(|(coord, unit)| {
            field
                .property(*coord, Some(player))
                .is_some_and(|p| p.kind().services(unit.mobility()))
        })
        .map(|(coord, _)| coord)
        .collect();

    let mut repairing = true;
    for coord in serviced {
        let funds = field.funds(player);
        let Some(unit) = field.unit_mut(coord) else {
            continue;
        };
        unit.resupply();

        let amount = DAILY_REPAIR.min(10u8.saturating_sub(unit.display_health()));
        let cost = u32::from(amount) * unit.cost() / 10;
        if repairing && funds < cost {
            repairing = false;
        }
        if repairing {
            unit.change_health(i32::from(amount) * 10);
            field.debit(player, cost);
        }
    }
}

impl fmt::Display for EndTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("End Turn")
    }
}

/// Activate a commander power for the current player.
#[derive(Debug, Clone)]
pub struct Power {
    level: PowerLevel,
    state: ActionState,
    owner: Option<PlayerId>,
}

impl Power {
    /// Activate the power at `level`.
    #[must_use]
    pub fn new(level: PowerLevel) -> Self {
        Self {
            level,
            state: ActionState::Unvalidated,
            owner: None,
        }
    }

    /// Which power.
    #[must_use]
    pub const fn level(&self) -> PowerLevel {
        self.level
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// The meter must be full enough and no power may be active.
    pub fn validate(&mut self, field: &Battlefield) -> bool {
        let verdict = self.check(field);
        settle(&mut self.state, &mut self.owner, verdict)
    }

    fn check(&self, field: &Battlefield) -> Result<PlayerId, String> {
        let owner = field.current_player();
        let co = field
            .commander(owner)
            .ok_or_else(|| format!("No commander for {owner}"))?;
        if co.applied_power().is_some() {
            return Err("A power is already active".to_string());
        }
        if !co.can_activate(self.level) {
            let threshold = match self.level {
                PowerLevel::Cop => co.cop_threshold(),
                PowerLevel::Scop => co.scop_threshold(),
            };
            return Err(format!(
                "Power meter {} has not reached {threshold}",
                co.meter()
            ));
        }
        Ok(owner)
    }

    /// Apply the power; move ranges are recomputed if it grants movement.
    ///
    /// # Errors
    ///
    /// See [`Action::execute`](crate::game::Action::execute).
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        self.state.ensure_validated(|| self.to_string())?;
        let owner = self
            .owner
            .ok_or_else(|| ActionError::NotValidated(self.to_string()))?;
        let co = field
            .commander_mut(owner)
            .ok_or_else(|| ActionError::StaleBinding(format!("no commander for {owner}")))?;
        match self.level {
            PowerLevel::Cop => co.apply_cop(),
            PowerLevel::Scop => co.apply_scop(),
        }
        if co.movement_bonus() != 0 {
            field.refresh_movement();
        }

        self.state = ActionState::Executed;
        Ok(())
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            PowerLevel::Cop => f.write_str("Activate commander power"),
            PowerLevel::Scop => f.write_str("Activate super commander power"),
        }
    }
}
