//! Game layer for Skirmish.
//!
//! Implements the rules of a turn-based tactical wargame:
//! - Grid of terrain and capturable properties
//! - Units with fuel, ammo, cargo and per-kind attack tables
//! - Movement planning per mobility class
//! - Damage calculation with commander modifiers and luck
//! - Two-phase actions (validate, then execute) and the turn cycle

mod action;
mod battlefield;
mod combat;
mod commander;
mod damage_table;
mod invariants;
mod map;
mod movement;
mod terrain;
mod unit;

pub use action::{
    Action, ActionState, Attack, AttackMode, Build, Capture, EndTurn, Move, MoveCombineLoad, Power,
    Repair, Unload,
};
pub use battlefield::{Battlefield, MAX_AREA};
pub use combat::Engagement;
pub use commander::{
    BASE_COP_THRESHOLD, BASE_SCOP_THRESHOLD, CommanderCatalog, CommanderProfile, Luck, Modifier,
    PowerEffect, PowerLevel,
};
pub use damage_table::{AttackEntry, attack_entry, targets};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use map::{Coord, Dimensions, NEUTRAL, Offset, PlayerId};
pub use movement::{BLOCKED, MovementPlanner};
pub use terrain::{
    MAX_CAPTURE, PROPERTY_INCOME, Property, PropertyKind, TerrainCatalog, TerrainKind, Tile,
};
pub use unit::{MAX_HEALTH, MobilityClass, Unit, UnitCatalog, UnitId, UnitKind, UnitSpec};
