//! The mutable game state.
//!
//! A [`Battlefield`] owns the terrain grid, the units, funds, commanders and
//! the turn pointer. Outside the crate it is read-only; every mutation goes
//! through an executed [`Action`](crate::game::Action).

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::MapLoadError;
use crate::game::commander::CommanderProfile;
use crate::game::map::{Coord, Dimensions, NEUTRAL, PlayerId};
use crate::game::movement::{BLOCKED, MovementPlanner};
use crate::game::terrain::{Property, PropertyKind, Tile};
use crate::game::unit::{MobilityClass, Unit, UnitId};

/// Largest supported board, in tiles.
pub const MAX_AREA: usize = 4096;

/// Complete game state.
#[derive(Debug, Clone)]
pub struct Battlefield {
    dims: Dimensions,
    tiles: Vec<Tile>,
    units: BTreeMap<Coord, Unit>,
    players: Vec<PlayerId>,
    funds: BTreeMap<PlayerId, u32>,
    commanders: BTreeMap<PlayerId, CommanderProfile>,
    current: usize,
    day: u32,
    built_unit: BTreeSet<PlayerId>,
    held_headquarters: BTreeSet<PlayerId>,
    next_unit_id: UnitId,
    planner: MovementPlanner,
}

impl Battlefield {
    /// Build a battlefield from a tile grid, unit placements and one
    /// commander per player. Players are the commander keys in sorted order;
    /// the first one moves first. Funds start at zero.
    ///
    /// # Errors
    ///
    /// Returns a [`MapLoadError`] for an empty, ragged or oversized grid,
    /// fewer than two players, or a unit placement that is out of bounds,
    /// duplicated, or owned by an unregistered player.
    pub fn new(
        grid: Vec<Vec<Tile>>,
        units: Vec<(Coord, Unit)>,
        commanders: BTreeMap<PlayerId, CommanderProfile>,
    ) -> Result<Self, MapLoadError> {
        let players: Vec<PlayerId> = commanders.keys().copied().collect();
        if players.len() < 2 {
            return Err(MapLoadError::TooFewPlayers(players.len()));
        }
        if players.contains(&NEUTRAL) {
            return Err(MapLoadError::UnknownOwner(NEUTRAL.to_string()));
        }

        let dims = grid_dimensions(&grid)?;
        let tiles: Vec<Tile> = grid.into_iter().flatten().collect();

        let held_headquarters = tiles
            .iter()
            .filter_map(Tile::property)
            .filter(|p| p.kind() == PropertyKind::Headquarters)
            .filter_map(Property::owner)
            .collect();

        let mut field = Self {
            dims,
            funds: players.iter().map(|p| (*p, 0)).collect(),
            planner: MovementPlanner::new(dims, &tiles),
            tiles,
            units: BTreeMap::new(),
            players,
            commanders,
            current: 0,
            day: 1,
            built_unit: BTreeSet::new(),
            held_headquarters,
            next_unit_id: 1,
        };

        for (coord, unit) in units {
            if !dims.contains(coord) {
                return Err(MapLoadError::OutOfBounds {
                    row: usize::from(coord.row),
                    col: usize::from(coord.col),
                });
            }
            if field.units.contains_key(&coord) {
                return Err(MapLoadError::DuplicatePlacement {
                    row: usize::from(coord.row),
                    col: usize::from(coord.col),
                });
            }
            if !field.players.contains(&unit.owner()) {
                return Err(MapLoadError::UnknownOwner(unit.owner().to_string()));
            }
            field.spawn_unit(coord, unit);
        }
        // Starting units count as built.
        field.built_unit = field.units.values().map(Unit::owner).collect();

        for class in field.units.values().map(Unit::mobility).collect::<BTreeSet<_>>() {
            field.planner.warm(class);
        }
        field.refresh_movement();

        tracing::debug!(
            rows = dims.rows,
            cols = dims.cols,
            units = field.units.len(),
            players = field.players.len(),
            "battlefield created"
        );
        Ok(field)
    }

    /// Builder: set a player's funds.
    #[must_use]
    pub fn with_funds(mut self, player: PlayerId, amount: u32) -> Self {
        if let Some(funds) = self.funds.get_mut(&player) {
            *funds = amount;
        }
        self
    }

    /// Board size.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Tile at `coord`, or `None` out of bounds.
    #[must_use]
    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        self.dims
            .contains(coord)
            .then(|| &self.tiles[self.dims.index(coord)])
    }

    /// Property at `coord`, optionally only if `owner` holds it.
    #[must_use]
    pub fn property(&self, coord: Coord, owner: Option<PlayerId>) -> Option<&Property> {
        self.tile(coord)
            .and_then(Tile::property)
            .filter(|p| owner.is_none_or(|o| p.is_owned_by(o)))
    }

    /// Unit at `coord`, optionally only if `owner` owns it.
    #[must_use]
    pub fn unit(&self, coord: Coord, owner: Option<PlayerId>) -> Option<&Unit> {
        self.units
            .get(&coord)
            .filter(|u| owner.is_none_or(|o| u.owner() == o))
    }

    /// Units in row-major order, optionally filtered by owner.
    pub fn units(&self, owner: Option<PlayerId>) -> impl Iterator<Item = (Coord, &Unit)> {
        self.units
            .iter()
            .filter(move |(_, u)| owner.is_none_or(|o| u.owner() == o))
            .map(|(c, u)| (*c, u))
    }

    /// Properties in row-major order, optionally filtered by owner.
    pub fn properties(&self, owner: Option<PlayerId>) -> impl Iterator<Item = (Coord, &Property)> {
        self.dims.iter().zip(&self.tiles).filter_map(move |(coord, tile)| {
            tile.property()
                .filter(|p| owner.is_none_or(|o| p.is_owned_by(o)))
                .map(|p| (coord, p))
        })
    }

    /// Funds held by `player` (0 for unknown players).
    #[must_use]
    pub fn funds(&self, player: PlayerId) -> u32 {
        self.funds.get(&player).copied().unwrap_or(0)
    }

    /// Registered players in turn order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.players[self.current]
    }

    /// Day counter, starting at 1.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Commander profile of `player`.
    #[must_use]
    pub fn commander(&self, player: PlayerId) -> Option<&CommanderProfile> {
        self.commanders.get(&player)
    }

    /// Move points of `unit` this turn, including any power bonus.
    #[must_use]
    pub fn effective_movement(&self, unit: &Unit) -> u32 {
        let bonus = self
            .commander(unit.owner())
            .map_or(0, CommanderProfile::movement_bonus);
        u32::from(unit.spec().movement) + u32::from(bonus)
    }

    /// Tiles `unit` standing at `start` can move to this turn.
    ///
    /// Served from the turn cache when it holds an entry for this unit,
    /// computed on the spot otherwise.
    #[must_use]
    pub fn reachable_tiles(&self, start: Coord, unit: &Unit) -> Cow<'_, BTreeSet<Coord>> {
        match self.planner.cached(start, unit.id()) {
            Some(tiles) => Cow::Borrowed(tiles),
            None => Cow::Owned(self.planner.reachable_for(
                start,
                unit,
                self.effective_movement(unit),
                &self.units,
            )),
        }
    }

    /// Cost for `unit` to move from `start` to `end`: the terrain shortest
    /// path cost if `end` is reachable, [`BLOCKED`] otherwise.
    #[must_use]
    pub fn movement_cost(&self, start: Coord, end: Coord, unit: &Unit) -> u32 {
        if !self.dims.contains(start) || !self.dims.contains(end) {
            return BLOCKED;
        }
        if self.reachable_tiles(start, unit).contains(&end) {
            self.planner.static_cost(unit.mobility(), start, end)
        } else {
            BLOCKED
        }
    }

    /// Cheapest terrain-only path for `mobility`, endpoints included.
    #[must_use]
    pub fn shortest_path(&self, start: Coord, end: Coord, mobility: MobilityClass) -> Option<Vec<Coord>> {
        self.planner.shortest_path(mobility, start, end)
    }

    /// Whether `player` has been knocked out.
    #[must_use]
    pub fn is_eliminated(&self, player: PlayerId) -> bool {
        let lost_headquarters = self.held_headquarters.contains(&player)
            && !self
                .properties(Some(player))
                .any(|(_, p)| p.kind() == PropertyKind::Headquarters);
        let lost_army =
            self.built_unit.contains(&player) && self.units(Some(player)).next().is_none();
        lost_headquarters || lost_army
    }

    /// The winner, if exactly one player remains.
    #[must_use]
    pub fn check_winner(&self) -> Option<PlayerId> {
        let mut remaining = self.players.iter().filter(|p| !self.is_eliminated(**p));
        match (remaining.next(), remaining.next()) {
            (Some(winner), None) => Some(*winner),
            _ => None,
        }
    }

    pub(crate) fn unit_mut(&mut self, coord: Coord) -> Option<&mut Unit> {
        self.units.get_mut(&coord)
    }

    pub(crate) fn property_mut(&mut self, coord: Coord) -> Option<&mut Property> {
        if !self.dims.contains(coord) {
            return None;
        }
        let index = self.dims.index(coord);
        self.tiles[index].property_mut()
    }

    pub(crate) fn remove_unit(&mut self, coord: Coord) -> Option<Unit> {
        self.units.remove(&coord)
    }

    /// Put an existing unit on the board, returning whatever stood there.
    pub(crate) fn place_unit(&mut self, coord: Coord, unit: Unit) -> Option<Unit> {
        self.units.insert(coord, unit)
    }

    /// Put a new unit on the board, assigning ids to it and its cargo.
    pub(crate) fn spawn_unit(&mut self, coord: Coord, mut unit: Unit) {
        self.assign_ids(&mut unit);
        self.units.insert(coord, unit);
    }

    fn assign_ids(&mut self, unit: &mut Unit) {
        unit.set_id(self.next_unit_id);
        self.next_unit_id += 1;
        for cargo in unit.cargo_mut() {
            self.assign_ids(cargo);
        }
    }

    pub(crate) fn units_mut(&mut self) -> impl Iterator<Item = (Coord, &mut Unit)> {
        self.units.iter_mut().map(|(c, u)| (*c, u))
    }

    pub(crate) fn credit(&mut self, player: PlayerId, amount: u32) {
        if let Some(funds) = self.funds.get_mut(&player) {
            *funds = funds.saturating_add(amount);
        }
    }

    /// Withdraw `amount`; leaves funds untouched and returns false if short.
    pub(crate) fn debit(&mut self, player: PlayerId, amount: u32) -> bool {
        match self.funds.get_mut(&player) {
            Some(funds) if *funds >= amount => {
                *funds -= amount;
                true
            }
            _ => false,
        }
    }

    /// Pass the turn to the next player. Returns true when the day rolled over.
    pub(crate) fn advance_player(&mut self) -> bool {
        self.current = (self.current + 1) % self.players.len();
        if self.current == 0 {
            self.day += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn commander_mut(&mut self, player: PlayerId) -> Option<&mut CommanderProfile> {
        self.commanders.get_mut(&player)
    }

    /// Rebuild the current player's reachable sets.
    pub(crate) fn refresh_movement(&mut self) {
        let player = self.current_player();
        let bonus = self
            .commander(player)
            .map_or(0, CommanderProfile::movement_bonus);
        self.planner.refresh(&self.units, player, bonus);
    }

    pub(crate) fn mark_unit_built(&mut self, player: PlayerId) {
        self.built_unit.insert(player);
    }

    pub(crate) fn mark_headquarters(&mut self, player: PlayerId) {
        self.held_headquarters.insert(player);
    }
}

fn grid_dimensions(grid: &[Vec<Tile>]) -> Result<Dimensions, MapLoadError> {
    let rows = grid.len();
    let cols = grid.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Err(MapLoadError::EmptyGrid);
    }
    for (row, tiles) in grid.iter().enumerate() {
        if tiles.len() != cols {
            return Err(MapLoadError::RaggedGrid {
                row,
                expected: cols,
                found: tiles.len(),
            });
        }
    }
    match (u16::try_from(rows), u16::try_from(cols)) {
        (Ok(r), Ok(c)) if rows * cols <= MAX_AREA => Ok(Dimensions::new(r, c)),
        _ => Err(MapLoadError::GridTooLarge { rows, cols }),
    }
}
