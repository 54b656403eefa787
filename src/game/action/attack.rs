use std::fmt;

use crate::error::ActionError;
use crate::game::action::moves::Move;
use crate::game::action::{ActionState, position_text, settle, tile_text};
use crate::game::battlefield::Battlefield;
use crate::game::combat::Engagement;
use crate::game::commander::CommanderProfile;
use crate::game::map::{Coord, Offset};
use crate::game::unit::UnitId;

/// Which attack rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackMode {
    /// Any distance in the attacker's range; adjacent hits can be countered.
    Any,
    /// Adjacent target only; can be countered.
    Direct,
    /// Target at distance two or more, attacker must not move. Never countered.
    Indirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AttackPlan {
    target: Coord,
    defender: UnitId,
    ammo_cost: u8,
    /// Defender's ammo cost for striking back, if it can.
    counter: Option<u8>,
}

/// Move, then attack a unit relative to the destination.
#[derive(Debug, Clone)]
pub struct Attack {
    movement: Move,
    offset: Offset,
    mode: AttackMode,
    state: ActionState,
    plan: Option<AttackPlan>,
}

impl Attack {
    /// Attack the unit at `offset` from the move's destination.
    #[must_use]
    pub fn new(movement: Move, offset: Offset, mode: AttackMode) -> Self {
        Self {
            movement,
            offset,
            mode,
            state: ActionState::Unvalidated,
            plan: None,
        }
    }

    /// The wrapped move.
    #[must_use]
    pub const fn movement(&self) -> &Move {
        &self.movement
    }

    /// Attack rules in effect.
    #[must_use]
    pub const fn mode(&self) -> AttackMode {
        self.mode
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ActionState {
        &self.state
    }

    /// Whether validation found the defender able to strike back.
    #[must_use]
    pub fn can_counterattack(&self) -> bool {
        self.plan.is_some_and(|plan| plan.counter.is_some())
    }

    /// Validate the move and the attack.
    pub fn validate(&mut self, field: &Battlefield) -> bool {
        let verdict = self.check(field);
        settle(&mut self.state, &mut self.plan, verdict)
    }

    fn check(&mut self, field: &Battlefield) -> Result<AttackPlan, String> {
        let binding = self.movement.validate_step(field)?;
        let attacker = field
            .unit(self.movement.origin(), Some(binding.owner))
            .ok_or_else(|| "Attacking unit is missing".to_string())?;

        let distance = self.offset.length();
        if !attacker.in_range(distance) {
            return Err(format!(
                "Target distance {distance} not in range for {attacker} with range {:?}",
                attacker.spec().range
            ));
        }

        let target = binding
            .destination
            .offset(self.offset)
            .filter(|t| field.dimensions().contains(*t));
        let defender = target
            .and_then(|t| field.unit(t, None))
            .ok_or_else(|| format!("No unit to attack at {}", tile_text(binding.destination, self.offset)))?;
        let target = target.ok_or_else(|| "No target".to_string())?;

        if defender.owner() == binding.owner {
            return Err("Cannot attack own unit".to_string());
        }

        let entry = attacker
            .attack_entry(defender)
            .ok_or_else(|| format!("{attacker} cannot attack {defender}"))?;
        if attacker.ammo() < entry.ammo_cost {
            return Err("Not enough ammo".to_string());
        }

        if field
            .unit(binding.destination, None)
            .is_some_and(|u| u.id() != binding.unit)
        {
            return Err("Destination is occupied".to_string());
        }

        let countered = match self.mode {
            AttackMode::Any => distance == 1,
            AttackMode::Direct => {
                if distance != 1 {
                    return Err(format!("Target distance {distance} not valid for direct attack"));
                }
                true
            }
            AttackMode::Indirect => {
                if distance < 2 {
                    return Err(format!("Target distance {distance} not valid for indirect attack"));
                }
                if binding.destination != self.movement.origin() {
                    return Err("Cannot move and indirect attack".to_string());
                }
                false
            }
        };

        let counter = if countered && defender.in_range(1) {
            defender
                .attack_entry(attacker)
                .filter(|back| defender.ammo() >= back.ammo_cost)
                .map(|back| back.ammo_cost)
        } else {
            None
        };

        Ok(AttackPlan {
            target,
            defender: defender.id(),
            ammo_cost: entry.ammo_cost,
            counter,
        })
    }

    /// Apply the move, the attack and any counterattack.
    ///
    /// # Errors
    ///
    /// See [`Action::execute`](crate::game::Action::execute).
    pub fn execute(&mut self, field: &mut Battlefield) -> Result<(), ActionError> {
        self.state.ensure_validated(|| self.to_string())?;
        let plan = self
            .plan
            .ok_or_else(|| ActionError::NotValidated(self.to_string()))?;
        if field.unit(plan.target, None).is_none_or(|u| u.id() != plan.defender) {
            return Err(ActionError::StaleBinding(format!(
                "no defender {} at {}",
                plan.defender, plan.target
            )));
        }

        let (binding, mut attacker) = self.movement.execute_detached(field)?;
        attacker.change_ammo(-i32::from(plan.ammo_cost));
        field.place_unit(binding.destination, attacker);

        let destroyed = strike(field, binding.destination, plan.target)?;
        if let (false, Some(ammo_cost)) = (destroyed, plan.counter) {
            if let Some(defender) = field.unit_mut(plan.target) {
                defender.change_ammo(-i32::from(ammo_cost));
            }
            strike(field, plan.target, binding.destination)?;
        }

        self.state = ActionState::Executed;
        Ok(())
    }
}

/// One hit from the unit at `from` on the unit at `to`, including power
/// meter charging and removal of a destroyed target. Returns true if the
/// target was destroyed.
fn strike(field: &mut Battlefield, from: Coord, to: Coord) -> Result<bool, ActionError> {
    let stale = || ActionError::StaleBinding(format!("strike from {from} on {to}"));

    let striker_owner = field.unit(from, None).ok_or_else(stale)?.owner();
    let luck = field
        .commander_mut(striker_owner)
        .map_or(0, CommanderProfile::luck_roll);

    let (damage, target_owner, target_cost) = {
        let striker = field.unit(from, None).ok_or_else(stale)?;
        let target = field.unit(to, None).ok_or_else(stale)?;
        let tile = field.tile(to).ok_or_else(stale)?;
        let striker_co = field.commander(striker.owner()).ok_or_else(stale)?;
        let target_co = field.commander(target.owner()).ok_or_else(stale)?;
        let engagement =
            Engagement::new(striker, striker_co, luck, target, target_co, tile).ok_or_else(stale)?;
        (engagement.damage(), target.owner(), target.cost())
    };

    let target = field.unit_mut(to).ok_or_else(stale)?;
    let lost = u8::try_from(damage).unwrap_or(u8::MAX).min(target.health());
    target.change_health(-i32::from(lost));
    let destroyed = target.health() == 0;

    let value = i64::from(lost) * i64::from(target_cost) / 100;
    if let Some(co) = field.commander_mut(target_owner) {
        co.charge_power(value);
    }
    if let Some(co) = field.commander_mut(striker_owner) {
        co.charge_power(value / 2);
    }

    tracing::trace!(%from, %to, damage, destroyed, "strike resolved");

    if destroyed {
        let capturer_fell = field
            .remove_unit(to)
            .is_some_and(|u| u.spec().can_capture);
        if let Some(property) = field.property_mut(to).filter(|_| capturer_fell) {
            property.reset_capture();
        }
    }
    Ok(destroyed)
}

impl fmt::Display for Attack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let destination = self.movement.destination().unwrap_or(self.movement.origin());
        let target = position_text(destination, self.offset);
        write!(f, "{} then attack unit at {target}", self.movement)
    }
}
