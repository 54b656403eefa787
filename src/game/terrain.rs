//! Terrain and property tiles.

use std::fmt;

use crate::error::CatalogError;
use crate::game::map::{NEUTRAL, PlayerId};
use crate::game::unit::{MobilityClass, UnitKind};

/// Capture progress of an untouched property.
pub const MAX_CAPTURE: u8 = 20;

/// Funds credited per owned property at the start of the owner's turn.
pub const PROPERTY_INCOME: u32 = 1000;

/// Movement costs indexed by [`MobilityClass::index`]: foot, boot, treads,
/// tires, sea, lander, air, pipe. Zero is impassable.
type CostRow = [u8; 8];

const PROPERTY_COSTS: CostRow = [1, 1, 1, 1, 0, 0, 1, 0];

/// Plain terrain kinds (no owner, no capture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainKind {
    /// Open ground.
    Plain,
    /// Mountains; foot and boot only.
    Mountain,
    /// Forest.
    Woods,
    /// Rivers; foot and boot only.
    River,
    /// Roads.
    Road,
    /// Open sea.
    Sea,
    /// Beaches, reachable by land units and landers.
    Shoal,
    /// Reefs slow naval units.
    Reef,
    /// Pipelines; pipe units only.
    Pipe,
    /// Missile silo.
    MissileSilo,
}

impl TerrainKind {
    /// Every terrain kind.
    pub const ALL: [Self; 10] = [
        Self::Plain,
        Self::Mountain,
        Self::Woods,
        Self::River,
        Self::Road,
        Self::Sea,
        Self::Shoal,
        Self::Reef,
        Self::Pipe,
        Self::MissileSilo,
    ];

    /// Three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Plain => "PLN",
            Self::Mountain => "MTN",
            Self::Woods => "WOD",
            Self::River => "RVR",
            Self::Road => "ROD",
            Self::Sea => "SEA",
            Self::Shoal => "SHL",
            Self::Reef => "REF",
            Self::Pipe => "PIP",
            Self::MissileSilo => "SIL",
        }
    }

    /// Defense stars.
    #[must_use]
    pub const fn defense(self) -> u8 {
        match self {
            Self::Mountain => 4,
            Self::MissileSilo => 3,
            Self::Woods => 2,
            Self::Plain | Self::Reef => 1,
            Self::River | Self::Road | Self::Sea | Self::Shoal | Self::Pipe => 0,
        }
    }

    const fn costs(self) -> CostRow {
        match self {
            Self::Plain => [1, 1, 1, 2, 0, 0, 1, 0],
            Self::Mountain | Self::River => [2, 1, 0, 0, 0, 0, 1, 0],
            Self::Woods => [1, 1, 2, 3, 0, 0, 1, 0],
            Self::Road | Self::MissileSilo => [1, 1, 1, 1, 0, 0, 1, 0],
            Self::Sea => [0, 0, 0, 0, 1, 1, 1, 0],
            Self::Shoal => [1, 1, 1, 1, 0, 1, 1, 0],
            Self::Reef => [0, 0, 0, 0, 2, 2, 1, 0],
            Self::Pipe => [0, 0, 0, 0, 0, 0, 0, 1],
        }
    }

    /// Cost of entering this terrain for `class` (0 = impassable).
    #[must_use]
    pub const fn move_cost(self, class: MobilityClass) -> u8 {
        self.costs()[class.index()]
    }
}

/// Capturable building kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// City.
    City,
    /// Headquarters; losing every one eliminates the owner.
    Headquarters,
    /// Ground unit factory.
    Base,
    /// Aircraft factory.
    Airport,
    /// Naval factory.
    Port,
    /// Lab (no income).
    Lab,
    /// Communications tower.
    CommTower,
}

const BASE_BUILDS: &[UnitKind] = &[
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
    UnitKind::Piperunner,
];

const AIRPORT_BUILDS: &[UnitKind] = &[
    UnitKind::TransportCopter,
    UnitKind::BattleCopter,
    UnitKind::Fighter,
    UnitKind::Bomber,
    UnitKind::BlackBomb,
    UnitKind::Stealth,
];

const PORT_BUILDS: &[UnitKind] = &[
    UnitKind::Lander,
    UnitKind::BlackBoat,
    UnitKind::Cruiser,
    UnitKind::Battleship,
    UnitKind::Carrier,
];

impl PropertyKind {
    /// Every property kind.
    pub const ALL: [Self; 7] = [
        Self::City,
        Self::Headquarters,
        Self::Base,
        Self::Airport,
        Self::Port,
        Self::Lab,
        Self::CommTower,
    ];

    /// Two-letter suffix; map codes prefix it with the owner character.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::City => "CT",
            Self::Headquarters => "HQ",
            Self::Base => "BS",
            Self::Airport => "AP",
            Self::Port => "PO",
            Self::Lab => "LB",
            Self::CommTower => "CM",
        }
    }

    /// Defense stars.
    #[must_use]
    pub const fn defense(self) -> u8 {
        match self {
            Self::Headquarters => 4,
            Self::City => 3,
            Self::Base | Self::Airport | Self::Port | Self::Lab | Self::CommTower => 1,
        }
    }

    /// Daily income for the owner.
    #[must_use]
    pub const fn income(self) -> u32 {
        match self {
            Self::Lab => 0,
            _ => PROPERTY_INCOME,
        }
    }

    /// Cost of entering this property for `class` (0 = impassable).
    #[must_use]
    pub const fn move_cost(self, class: MobilityClass) -> u8 {
        match (self, class) {
            (Self::Port, MobilityClass::Sea | MobilityClass::Lander) => 1,
            _ => PROPERTY_COSTS[class.index()],
        }
    }

    /// Unit kinds this property can build.
    #[must_use]
    pub const fn buildables(self) -> &'static [UnitKind] {
        match self {
            Self::Base => BASE_BUILDS,
            Self::Airport => AIRPORT_BUILDS,
            Self::Port => PORT_BUILDS,
            Self::City | Self::Headquarters | Self::Lab | Self::CommTower => &[],
        }
    }

    /// Whether a unit of `class` standing here gets the daily resupply and repair.
    #[must_use]
    pub const fn services(self, class: MobilityClass) -> bool {
        match self {
            Self::Airport => matches!(class, MobilityClass::Air),
            Self::Port => matches!(class, MobilityClass::Sea | MobilityClass::Lander),
            _ => class.is_ground(),
        }
    }
}

/// A property instance: kind, owner and capture progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    kind: PropertyKind,
    owner: Option<PlayerId>,
    capture: u8,
}

impl Property {
    /// Create an uncaptured property.
    #[must_use]
    pub const fn new(kind: PropertyKind, owner: Option<PlayerId>) -> Self {
        Self {
            kind,
            owner,
            capture: MAX_CAPTURE,
        }
    }

    /// Property kind.
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Owner, or `None` if neutral.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Whether `player` owns this property.
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    /// Remaining capture points in `0..=20`.
    #[must_use]
    pub const fn capture_progress(&self) -> u8 {
        self.capture
    }

    /// Apply `delta` capture points. When progress reaches zero or below the
    /// property flips to `new_owner` and progress resets.
    ///
    /// Returns true if ownership changed.
    pub fn change_capture(&mut self, new_owner: PlayerId, delta: i32) -> bool {
        let next = (i32::from(self.capture) + delta).min(i32::from(MAX_CAPTURE));
        if next <= 0 {
            self.capture = MAX_CAPTURE;
            self.owner = Some(new_owner);
            true
        } else {
            self.capture = u8::try_from(next).unwrap_or(MAX_CAPTURE);
            false
        }
    }

    /// Restore capture progress to full without changing the owner.
    pub fn reset_capture(&mut self) {
        self.capture = MAX_CAPTURE;
    }

    /// Map code with the owner character substituted.
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}{}", self.owner.unwrap_or(NEUTRAL), self.kind.suffix())
    }
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Ordinary terrain.
    Terrain(TerrainKind),
    /// A capturable building.
    Property(Property),
}

impl Tile {
    /// Defense stars.
    #[must_use]
    pub const fn defense(&self) -> u8 {
        match self {
            Self::Terrain(kind) => kind.defense(),
            Self::Property(property) => property.kind.defense(),
        }
    }

    /// Cost of entering this tile for `class` (0 = impassable).
    #[must_use]
    pub const fn move_cost(&self, class: MobilityClass) -> u8 {
        match self {
            Self::Terrain(kind) => kind.move_cost(class),
            Self::Property(property) => property.kind.move_cost(class),
        }
    }

    /// Whether a unit of `class` may stand here.
    #[must_use]
    pub const fn is_passable(&self, class: MobilityClass) -> bool {
        self.move_cost(class) > 0
    }

    /// The property on this tile, if any.
    #[must_use]
    pub const fn property(&self) -> Option<&Property> {
        match self {
            Self::Property(property) => Some(property),
            Self::Terrain(_) => None,
        }
    }

    pub(crate) fn property_mut(&mut self) -> Option<&mut Property> {
        match self {
            Self::Property(property) => Some(property),
            Self::Terrain(_) => None,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terrain(kind) => f.write_str(kind.code()),
            Self::Property(property) => f.write_str(&property.code()),
        }
    }
}

/// Factory for tiles by map code, aware of the registered players.
#[derive(Debug, Clone)]
pub struct TerrainCatalog {
    players: Vec<PlayerId>,
}

impl TerrainCatalog {
    /// Create a catalog accepting property codes for `players` and neutral.
    #[must_use]
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            players: players.into_iter().collect(),
        }
    }

    /// Instantiate a tile from a three-character code such as `PLN` or `OHQ`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTerrain`] if the code names no terrain,
    /// or a property for an unregistered owner.
    pub fn create(&self, code: &str) -> Result<Tile, CatalogError> {
        if let Some(kind) = TerrainKind::ALL.into_iter().find(|k| k.code() == code) {
            return Ok(Tile::Terrain(kind));
        }

        let unknown = || CatalogError::UnknownTerrain(code.to_string());
        let mut chars = code.chars();
        let owner_char = chars.next().ok_or_else(unknown)?;
        let suffix = chars.as_str();
        let kind = PropertyKind::ALL
            .into_iter()
            .find(|k| k.suffix() == suffix)
            .ok_or_else(unknown)?;

        let owner = if owner_char == NEUTRAL {
            None
        } else if self.players.contains(&owner_char) {
            Some(owner_char)
        } else {
            return Err(unknown());
        };

        Ok(Tile::Property(Property::new(kind, owner)))
    }
}
