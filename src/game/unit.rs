//! Unit kinds, their static statistics, and unit instances.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::game::damage_table::{self, AttackEntry};
use crate::game::map::PlayerId;

use self::MobilityClass::{Air, Boot, Foot, Lander, Pipe, Sea, Tires, Treads};

/// Stable identifier assigned to a unit when it is placed on a battlefield.
pub type UnitId = u32;

/// Maximum internal health.
pub const MAX_HEALTH: u8 = 100;

/// Terrain-traversal category of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MobilityClass {
    /// Infantry on foot.
    Foot,
    /// Heavier infantry boots.
    Boot,
    /// Tracked vehicles.
    Treads,
    /// Wheeled vehicles.
    Tires,
    /// Naval units.
    Sea,
    /// Naval units that can beach on shoals.
    Lander,
    /// Aircraft.
    Air,
    /// Pipeline-bound units.
    Pipe,
}

impl MobilityClass {
    /// Every class, in index order.
    pub const ALL: [Self; 8] = [
        Self::Foot,
        Self::Boot,
        Self::Treads,
        Self::Tires,
        Self::Sea,
        Self::Lander,
        Self::Air,
        Self::Pipe,
    ];

    /// Dense index into per-class tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this class belongs to a ground unit.
    #[must_use]
    pub const fn is_ground(self) -> bool {
        matches!(
            self,
            Self::Foot | Self::Boot | Self::Treads | Self::Tires | Self::Pipe
        )
    }
}

/// Static statistics shared by every unit of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSpec {
    /// Three-letter code used in map documents.
    pub code: &'static str,
    /// Move points per turn.
    pub movement: u8,
    /// Maximum ammunition.
    pub max_ammo: u8,
    /// Maximum fuel.
    pub max_fuel: u8,
    /// Fuel burned at the start of each of the owner's turns.
    pub daily_fuel: u8,
    /// Attack distances.
    pub range: &'static [u32],
    /// Terrain-traversal category.
    pub mobility: MobilityClass,
    /// Build cost in funds.
    pub cost: u32,
    /// Number of units that can be carried.
    pub load_capacity: u8,
    /// Kinds that can be carried.
    pub loadables: &'static [UnitKind],
    /// Whether the unit can capture properties.
    pub can_capture: bool,
    /// Display health restored by a repair action, if the unit can repair.
    pub repair_amount: Option<u8>,
}

const INFANTRY_ONLY: &[UnitKind] = &[UnitKind::Infantry, UnitKind::Mech];

const LANDER_CARGO: &[UnitKind] = &[
    UnitKind::Infantry,
    UnitKind::Mech,
    UnitKind::AntiAir,
    UnitKind::Missile,
    UnitKind::Apc,
    UnitKind::Artillery,
    UnitKind::Rocket,
    UnitKind::Recon,
    UnitKind::Tank,
    UnitKind::MediumTank,
    UnitKind::Neotank,
    UnitKind::Megatank,
];

const CRUISER_CARGO: &[UnitKind] = &[UnitKind::TransportCopter, UnitKind::BattleCopter];

const CARRIER_CARGO: &[UnitKind] = &[
    UnitKind::TransportCopter,
    UnitKind::BattleCopter,
    UnitKind::Fighter,
    UnitKind::Bomber,
    UnitKind::BlackBomb,
    UnitKind::Stealth,
];

#[allow(clippy::too_many_arguments)]
const fn spec(
    code: &'static str,
    movement: u8,
    max_ammo: u8,
    max_fuel: u8,
    daily_fuel: u8,
    range: &'static [u32],
    mobility: MobilityClass,
    cost: u32,
) -> UnitSpec {
    UnitSpec {
        code,
        movement,
        max_ammo,
        max_fuel,
        daily_fuel,
        range,
        mobility,
        cost,
        load_capacity: 0,
        loadables: &[],
        can_capture: false,
        repair_amount: None,
    }
}

const fn carrying(base: UnitSpec, capacity: u8, loadables: &'static [UnitKind]) -> UnitSpec {
    UnitSpec {
        load_capacity: capacity,
        loadables,
        ..base
    }
}

const fn capturing(base: UnitSpec) -> UnitSpec {
    UnitSpec {
        can_capture: true,
        ..base
    }
}

const fn repairing(base: UnitSpec, amount: u8) -> UnitSpec {
    UnitSpec {
        repair_amount: Some(amount),
        ..base
    }
}

const SPECS: [UnitSpec; 25] = [
    capturing(spec("INF", 3, 0, 99, 0, &[1], Foot, 1000)),
    capturing(spec("MEC", 2, 3, 70, 0, &[1], Boot, 3000)),
    spec("REC", 8, 0, 80, 0, &[1], Tires, 4000),
    carrying(spec("TCP", 6, 0, 99, 2, &[], Air, 5000), 1, INFANTRY_ONLY),
    repairing(
        carrying(spec("APC", 6, 0, 70, 0, &[], Treads, 5000), 1, INFANTRY_ONLY),
        0,
    ),
    spec("ATY", 5, 9, 50, 0, &[2, 3], Treads, 6000),
    spec("TNK", 6, 9, 70, 0, &[1], Treads, 7000),
    repairing(
        carrying(spec("BLB", 7, 0, 50, 1, &[], Lander, 7500), 2, INFANTRY_ONLY),
        1,
    ),
    spec("AAR", 6, 9, 60, 0, &[1], Treads, 8000),
    spec("BCP", 6, 6, 99, 2, &[1], Air, 9000),
    spec("MIS", 4, 6, 50, 0, &[3, 4, 5], Tires, 12000),
    carrying(spec("LND", 6, 0, 99, 1, &[], Lander, 12000), 2, LANDER_CARGO),
    spec("ROK", 5, 6, 50, 0, &[3, 4, 5], Tires, 15000),
    spec("MTK", 5, 8, 50, 0, &[1], Treads, 16000),
    carrying(spec("CRU", 6, 9, 99, 1, &[1], Sea, 18000), 2, CRUISER_CARGO),
    spec("FGT", 9, 9, 99, 5, &[1], Air, 20000),
    spec("PRN", 9, 9, 99, 0, &[2, 3, 4, 5], Pipe, 20000),
    spec("SUB", 5, 6, 60, 1, &[1], Sea, 20000),
    spec("NTK", 6, 9, 99, 0, &[1], Treads, 22000),
    spec("BMB", 7, 9, 99, 5, &[1], Air, 22000),
    spec("STH", 6, 6, 60, 5, &[1], Air, 24000),
    spec("BBB", 9, 0, 45, 5, &[], Air, 25000),
    spec("BSP", 5, 9, 99, 1, &[2, 3, 4, 5, 6], Sea, 28000),
    spec("MGT", 4, 3, 50, 0, &[1], Treads, 28000),
    carrying(
        spec("CAR", 5, 9, 99, 1, &[3, 4, 5, 6, 7, 8], Sea, 30000),
        2,
        CARRIER_CARGO,
    ),
];

/// The closed set of unit kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum UnitKind {
    Infantry,
    Mech,
    Recon,
    TransportCopter,
    Apc,
    Artillery,
    Tank,
    BlackBoat,
    AntiAir,
    BattleCopter,
    Missile,
    Lander,
    Rocket,
    MediumTank,
    Cruiser,
    Fighter,
    Piperunner,
    Submarine,
    Neotank,
    Bomber,
    Stealth,
    BlackBomb,
    Battleship,
    Megatank,
    Carrier,
}

impl UnitKind {
    /// Every kind, ordered by build cost.
    pub const ALL: [Self; 25] = [
        Self::Infantry,
        Self::Mech,
        Self::Recon,
        Self::TransportCopter,
        Self::Apc,
        Self::Artillery,
        Self::Tank,
        Self::BlackBoat,
        Self::AntiAir,
        Self::BattleCopter,
        Self::Missile,
        Self::Lander,
        Self::Rocket,
        Self::MediumTank,
        Self::Cruiser,
        Self::Fighter,
        Self::Piperunner,
        Self::Submarine,
        Self::Neotank,
        Self::Bomber,
        Self::Stealth,
        Self::BlackBomb,
        Self::Battleship,
        Self::Megatank,
        Self::Carrier,
    ];

    /// Static statistics for this kind.
    #[must_use]
    pub const fn spec(self) -> &'static UnitSpec {
        &SPECS[self as usize]
    }

    /// Three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        self.spec().code
    }

    /// Resolve a three-letter code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Attack entry against `target`, if this kind can attack it at all.
    #[must_use]
    pub fn attack_entry(self, target: Self) -> Option<AttackEntry> {
        damage_table::attack_entry(self, target)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A unit on the board (or inside a transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    owner: PlayerId,
    kind: UnitKind,
    health: u8,
    fuel: u8,
    ammo: u8,
    available: bool,
    cargo: Vec<Unit>,
}

impl Unit {
    /// Create a fully supplied, full-health unit.
    ///
    /// The id is assigned when the unit is placed on a battlefield.
    #[must_use]
    pub fn new(kind: UnitKind, owner: PlayerId) -> Self {
        let spec = kind.spec();
        Self {
            id: 0,
            owner,
            kind,
            health: MAX_HEALTH,
            fuel: spec.max_fuel,
            ammo: spec.max_ammo,
            available: true,
            cargo: Vec::new(),
        }
    }

    /// Builder: set internal health (clamped to the valid range).
    #[must_use]
    pub fn with_health(mut self, health: u8) -> Self {
        self.health = health.min(MAX_HEALTH);
        self
    }

    /// Builder: set fuel (clamped to the maximum).
    #[must_use]
    pub fn with_fuel(mut self, fuel: u8) -> Self {
        self.fuel = fuel.min(self.spec().max_fuel);
        self
    }

    /// Builder: set ammo (clamped to the maximum).
    #[must_use]
    pub fn with_ammo(mut self, ammo: u8) -> Self {
        self.ammo = ammo.min(self.spec().max_ammo);
        self
    }

    /// Builder: put a unit in the hold if it can be carried.
    #[must_use]
    pub fn with_cargo(mut self, unit: Self) -> Self {
        self.load(unit);
        self
    }

    /// Identifier assigned by the battlefield.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: UnitId) {
        self.id = id;
    }

    /// Owning player.
    #[must_use]
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Unit kind.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Static statistics of this unit's kind.
    #[must_use]
    pub const fn spec(&self) -> &'static UnitSpec {
        self.kind.spec()
    }

    /// Internal health in `0..=100`.
    #[must_use]
    pub const fn health(&self) -> u8 {
        self.health
    }

    /// Display health: `ceil(health / 10)` in `0..=10`.
    #[must_use]
    pub const fn display_health(&self) -> u8 {
        self.health.div_ceil(10)
    }

    /// Current fuel.
    #[must_use]
    pub const fn fuel(&self) -> u8 {
        self.fuel
    }

    /// Current ammo.
    #[must_use]
    pub const fn ammo(&self) -> u8 {
        self.ammo
    }

    /// Whether the unit may still act this turn.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Units in the hold, in load order.
    #[must_use]
    pub fn cargo(&self) -> &[Unit] {
        &self.cargo
    }

    pub(crate) fn cargo_mut(&mut self) -> &mut [Unit] {
        &mut self.cargo
    }

    /// Terrain-traversal category.
    #[must_use]
    pub const fn mobility(&self) -> MobilityClass {
        self.spec().mobility
    }

    /// Build cost.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.spec().cost
    }

    /// Whether `distance` is one of this unit's attack distances.
    #[must_use]
    pub fn in_range(&self, distance: u32) -> bool {
        self.spec().range.contains(&distance)
    }

    /// Attack entry against another unit.
    #[must_use]
    pub fn attack_entry(&self, target: &Self) -> Option<AttackEntry> {
        self.kind.attack_entry(target.kind)
    }

    /// Add `amount` (possibly negative) to health, clamped to `0..=100`.
    pub fn change_health(&mut self, amount: i32) {
        self.health = clamp_add(self.health, amount, MAX_HEALTH);
    }

    /// Add `amount` to fuel, clamped to `0..=max_fuel`.
    pub fn change_fuel(&mut self, amount: i32) {
        self.fuel = clamp_add(self.fuel, amount, self.spec().max_fuel);
    }

    /// Add `amount` to ammo, clamped to `0..=max_ammo`.
    pub fn change_ammo(&mut self, amount: i32) {
        self.ammo = clamp_add(self.ammo, amount, self.spec().max_ammo);
    }

    /// Refill fuel and ammo.
    pub fn resupply(&mut self) {
        self.fuel = self.spec().max_fuel;
        self.ammo = self.spec().max_ammo;
    }

    /// Merge `other` into this unit, returning the display health that
    /// overflowed the maximum.
    pub fn combine_with(&mut self, other: &Self) -> u8 {
        let excess = (self.display_health() + other.display_health()).saturating_sub(10);
        self.change_health(i32::from(other.health));
        self.change_ammo(i32::from(other.ammo));
        self.change_fuel(i32::from(other.fuel));
        excess
    }

    /// Whether `unit` fits in the hold.
    #[must_use]
    pub fn can_load(&self, unit: &Self) -> bool {
        let spec = self.spec();
        spec.loadables.contains(&unit.kind) && self.cargo.len() < usize::from(spec.load_capacity)
    }

    /// Put `unit` in the hold. Returns false if it does not fit.
    pub fn load(&mut self, unit: Self) -> bool {
        if self.can_load(&unit) {
            self.cargo.push(unit);
            true
        } else {
            false
        }
    }

    /// Whether there is a unit in slot `index`.
    #[must_use]
    pub fn can_unload(&self, index: usize) -> bool {
        index < self.cargo.len()
    }

    /// Take the unit in slot `index` out of the hold.
    pub fn unload(&mut self, index: usize) -> Option<Self> {
        self.can_unload(index).then(|| self.cargo.remove(index))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.code())
    }
}

fn clamp_add(value: u8, amount: i32, max: u8) -> u8 {
    let next = (i32::from(value) + amount).clamp(0, i32::from(max));
    u8::try_from(next).unwrap_or(max)
}

/// Factory for units by code.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCatalog;

impl UnitCatalog {
    /// Create a full-health unit from its three-letter code.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownUnit`] for an unrecognized code.
    pub fn create(code: &str, owner: PlayerId) -> Result<Unit, CatalogError> {
        UnitKind::from_code(code)
            .map(|kind| Unit::new(kind, owner))
            .ok_or_else(|| CatalogError::UnknownUnit(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in UnitKind::ALL.iter().enumerate() {
            for b in &UnitKind::ALL[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
            assert_eq!(UnitKind::from_code(a.code()), Some(*a));
        }
    }

    #[test]
    fn test_catalog_unknown_code() {
        assert!(matches!(
            UnitCatalog::create("XYZ", 'O'),
            Err(CatalogError::UnknownUnit(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn test_display_health_rounds_up() {
        let unit = Unit::new(UnitKind::Infantry, 'O');
        assert_eq!(unit.display_health(), 10);
        assert_eq!(unit.clone().with_health(41).display_health(), 5);
        assert_eq!(unit.clone().with_health(1).display_health(), 1);
        assert_eq!(unit.with_health(0).display_health(), 0);
    }

    #[test]
    fn test_change_health_clamps() {
        let mut unit = Unit::new(UnitKind::Tank, 'O');
        unit.change_health(-250);
        assert_eq!(unit.health(), 0);
        unit.change_health(500);
        assert_eq!(unit.health(), 100);
    }

    #[test]
    fn test_change_fuel_and_ammo_clamp() {
        let mut unit = Unit::new(UnitKind::Tank, 'O');
        unit.change_fuel(-100);
        unit.change_ammo(-1);
        assert_eq!(unit.fuel(), 0);
        assert_eq!(unit.ammo(), 8);
        unit.resupply();
        assert_eq!(unit.fuel(), 70);
        assert_eq!(unit.ammo(), 9);
    }

    #[test]
    fn test_combine_reports_excess() {
        let mut target = Unit::new(UnitKind::Infantry, 'O').with_health(89);
        let mover = Unit::new(UnitKind::Infantry, 'O').with_health(89);
        let excess = target.combine_with(&mover);
        assert_eq!(excess, 8);
        assert_eq!(target.health(), 100);
    }

    #[test]
    fn test_load_respects_capacity_and_kind() {
        let mut apc = Unit::new(UnitKind::Apc, 'O');
        assert!(!apc.can_load(&Unit::new(UnitKind::Tank, 'O')));
        assert!(apc.load(Unit::new(UnitKind::Infantry, 'O')));
        assert!(!apc.load(Unit::new(UnitKind::Mech, 'O')));
        assert_eq!(apc.cargo().len(), 1);
        assert!(apc.unload(1).is_none());
        assert_eq!(apc.unload(0).map(|u| u.kind()), Some(UnitKind::Infantry));
    }

    #[test]
    fn test_repair_capability() {
        assert_eq!(UnitKind::Apc.spec().repair_amount, Some(0));
        assert_eq!(UnitKind::BlackBoat.spec().repair_amount, Some(1));
        assert_eq!(UnitKind::Infantry.spec().repair_amount, None);
    }
}
