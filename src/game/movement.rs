//! Movement planning.
//!
//! Two layers:
//! - a static all-pairs cost matrix per mobility class over the terrain graph
//!   (edge cost = cost of entering the target tile, 0 = no edge), shared
//!   between battlefield snapshots behind an `Arc`;
//! - a per-unit reachable set for the current player's units, bounded by move
//!   points and treating enemy-occupied tiles as walls. Rebuilt only when the
//!   turn passes or a power changes move ranges.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use std::sync::{Arc, OnceLock};

use crate::game::map::{Coord, Dimensions, PlayerId};
use crate::game::terrain::Tile;
use crate::game::unit::{MobilityClass, Unit, UnitId};

/// Cost reported for a destination no unit can reach.
pub const BLOCKED: u32 = 100;

/// Entry costs for one tile, indexed by [`MobilityClass::index`].
type EntryCosts = [u8; 8];

#[derive(Debug)]
struct StaticCosts {
    dims: Dimensions,
    entry: Vec<EntryCosts>,
    matrices: [OnceLock<Vec<u16>>; 8],
}

impl StaticCosts {
    fn entry_cost(&self, index: usize, class: MobilityClass) -> u32 {
        u32::from(self.entry[index][class.index()])
    }

    fn matrix(&self, class: MobilityClass) -> &[u16] {
        self.matrices[class.index()].get_or_init(|| self.all_pairs(class))
    }

    /// Dijkstra from every source. Distances at or beyond [`BLOCKED`] are
    /// stored as [`BLOCKED`].
    fn all_pairs(&self, class: MobilityClass) -> Vec<u16> {
        let area = self.dims.area();
        let mut matrix = vec![0u16; area * area];
        let mut dist = vec![u32::MAX; area];

        for source in 0..area {
            dist.fill(u32::MAX);
            dist[source] = 0;
            let mut queue = BinaryHeap::new();
            queue.push(Reverse((0u32, source)));

            while let Some(Reverse((cost, index))) = queue.pop() {
                if cost > dist[index] || cost >= BLOCKED {
                    continue;
                }
                let (neighbors, count) = self.dims.neighbors(self.dims.coord(index));
                for next in &neighbors[..count] {
                    let next_index = self.dims.index(*next);
                    let step = self.entry_cost(next_index, class);
                    if step == 0 {
                        continue;
                    }
                    let next_cost = cost + step;
                    if next_cost < dist[next_index] {
                        dist[next_index] = next_cost;
                        queue.push(Reverse((next_cost, next_index)));
                    }
                }
            }

            let row = &mut matrix[source * area..(source + 1) * area];
            for (slot, d) in row.iter_mut().zip(&dist) {
                *slot = u16::try_from((*d).min(BLOCKED)).unwrap_or(u16::MAX);
            }
        }

        matrix
    }
}

#[derive(Debug, Clone)]
struct Reachable {
    unit: UnitId,
    tiles: BTreeSet<Coord>,
}

/// Static shortest paths plus the current player's reachable sets.
#[derive(Debug, Clone)]
pub struct MovementPlanner {
    statics: Arc<StaticCosts>,
    reachable: BTreeMap<Coord, Reachable>,
}

impl MovementPlanner {
    /// Build the planner for a row-major tile grid.
    #[must_use]
    pub fn new(dims: Dimensions, tiles: &[Tile]) -> Self {
        let entry = tiles
            .iter()
            .map(|tile| MobilityClass::ALL.map(|class| tile.move_cost(class)))
            .collect();
        Self {
            statics: Arc::new(StaticCosts {
                dims,
                entry,
                matrices: Default::default(),
            }),
            reachable: BTreeMap::new(),
        }
    }

    /// Compute the static matrix for `class` now instead of on first use.
    pub fn warm(&self, class: MobilityClass) {
        self.statics.matrix(class);
    }

    /// Terrain-only shortest path cost, or [`BLOCKED`].
    #[must_use]
    pub fn static_cost(&self, class: MobilityClass, from: Coord, to: Coord) -> u32 {
        let dims = self.statics.dims;
        if !dims.contains(from) || !dims.contains(to) {
            return BLOCKED;
        }
        let area = dims.area();
        u32::from(self.statics.matrix(class)[dims.index(from) * area + dims.index(to)])
    }

    /// Cheapest terrain-only path from `from` to `to`, both endpoints included.
    ///
    /// Among equal-cost paths the one found by walking back through the
    /// neighbours in up, down, right, left order wins.
    #[must_use]
    pub fn shortest_path(&self, class: MobilityClass, from: Coord, to: Coord) -> Option<Vec<Coord>> {
        if self.static_cost(class, from, to) >= BLOCKED {
            return None;
        }

        let dims = self.statics.dims;
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            let here = self.static_cost(class, from, current);
            let step = self.statics.entry_cost(dims.index(current), class);
            let (neighbors, count) = dims.neighbors(current);
            current = neighbors[..count]
                .iter()
                .copied()
                .find(|n| self.static_cost(class, from, *n) + step == here)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    /// Move-point-bounded flood fill from `origin`; `blocked` marks tiles
    /// that cannot be entered. The origin is always included.
    #[must_use]
    pub fn flood(
        &self,
        origin: Coord,
        class: MobilityClass,
        budget: u32,
        blocked: impl Fn(Coord) -> bool,
    ) -> BTreeSet<Coord> {
        let dims = self.statics.dims;
        let mut best: BTreeMap<Coord, u32> = BTreeMap::new();
        let mut queue = BinaryHeap::new();
        best.insert(origin, 0);
        queue.push(Reverse((0u32, origin)));

        while let Some(Reverse((cost, coord))) = queue.pop() {
            if cost > best.get(&coord).copied().unwrap_or(u32::MAX) {
                continue;
            }
            let (neighbors, count) = dims.neighbors(coord);
            for next in &neighbors[..count] {
                let step = self.statics.entry_cost(dims.index(*next), class);
                if step == 0 || blocked(*next) {
                    continue;
                }
                let next_cost = cost + step;
                if next_cost > budget {
                    continue;
                }
                if next_cost < best.get(next).copied().unwrap_or(u32::MAX) {
                    best.insert(*next, next_cost);
                    queue.push(Reverse((next_cost, *next)));
                }
            }
        }

        best.into_keys().collect()
    }

    /// Reachable set for `unit` standing at `origin`, with `move_points`.
    #[must_use]
    pub fn reachable_for(
        &self,
        origin: Coord,
        unit: &Unit,
        move_points: u32,
        units: &BTreeMap<Coord, Unit>,
    ) -> BTreeSet<Coord> {
        let owner = unit.owner();
        self.flood(origin, unit.mobility(), move_points, |coord| {
            units.get(&coord).is_some_and(|other| other.owner() != owner)
        })
    }

    /// Rebuild the reachable sets of every unit `player` owns.
    pub fn refresh(&mut self, units: &BTreeMap<Coord, Unit>, player: PlayerId, move_bonus: u8) {
        self.reachable.clear();
        for (coord, unit) in units.iter().filter(|(_, u)| u.owner() == player) {
            let move_points = u32::from(unit.spec().movement) + u32::from(move_bonus);
            let tiles = self.reachable_for(*coord, unit, move_points, units);
            self.reachable.insert(*coord, Reachable { unit: unit.id(), tiles });
        }
        tracing::trace!(player = %player, units = self.reachable.len(), "reachable sets rebuilt");
    }

    /// Cached reachable set for the unit with `unit_id` at `origin`.
    #[must_use]
    pub fn cached(&self, origin: Coord, unit_id: UnitId) -> Option<&BTreeSet<Coord>> {
        self.reachable
            .get(&origin)
            .filter(|entry| entry.unit == unit_id)
            .map(|entry| &entry.tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::terrain::TerrainCatalog;
    use crate::game::unit::UnitKind;

    fn planner(rows: &[&[&str]]) -> MovementPlanner {
        let catalog = TerrainCatalog::new(['O', 'B']);
        let tiles: Vec<Tile> = rows
            .iter()
            .flat_map(|row| row.iter().map(|code| catalog.create(code).unwrap()))
            .collect();
        #[allow(clippy::cast_possible_truncation)]
        let dims = Dimensions::new(rows.len() as u16, rows[0].len() as u16);
        MovementPlanner::new(dims, &tiles)
    }

    #[test]
    fn test_static_cost_uses_entry_cost() {
        let p = planner(&[&["ROD", "ROD", "MTN", "WOD"]]);
        let from = Coord::new(0, 0);
        assert_eq!(p.static_cost(MobilityClass::Foot, from, from), 0);
        assert_eq!(p.static_cost(MobilityClass::Foot, from, Coord::new(0, 3)), 4);
        assert_eq!(p.static_cost(MobilityClass::Boot, from, Coord::new(0, 3)), 3);
    }

    #[test]
    fn test_impassable_is_blocked() {
        let p = planner(&[&["PLN", "SEA", "PLN"]]);
        assert_eq!(
            p.static_cost(MobilityClass::Treads, Coord::new(0, 0), Coord::new(0, 2)),
            BLOCKED
        );
        assert_eq!(
            p.static_cost(MobilityClass::Air, Coord::new(0, 0), Coord::new(0, 2)),
            2
        );
    }

    #[test]
    fn test_shortest_path_includes_start() {
        let p = planner(&[&["ROD", "MTN"], &["ROD", "MTN"], &["ROD", "ROD"]]);
        let path = p
            .shortest_path(MobilityClass::Foot, Coord::new(0, 1), Coord::new(2, 1))
            .unwrap();
        assert_eq!(path, vec![Coord::new(0, 1), Coord::new(1, 1), Coord::new(2, 1)]);
    }

    #[test]
    fn test_shortest_path_unreachable() {
        let p = planner(&[&["PLN", "SEA"]]);
        assert!(p.shortest_path(MobilityClass::Foot, Coord::new(0, 0), Coord::new(0, 1)).is_none());
    }

    #[test]
    fn test_flood_respects_budget_and_walls() {
        let p = planner(&[&["PLN", "PLN", "PLN", "PLN", "PLN"]]);
        let tiles = p.flood(Coord::new(0, 0), MobilityClass::Foot, 3, |_| false);
        assert!(tiles.contains(&Coord::new(0, 3)));
        assert!(!tiles.contains(&Coord::new(0, 4)));

        let walled = p.flood(Coord::new(0, 0), MobilityClass::Foot, 3, |c| c.col == 1);
        assert_eq!(walled.len(), 1);
    }

    #[test]
    fn test_refresh_caches_by_unit() {
        let mut p = planner(&[&["PLN", "PLN", "PLN"]]);
        let mut units = BTreeMap::new();
        let mut mine = Unit::new(UnitKind::Infantry, 'O');
        mine.set_id(1);
        let mut theirs = Unit::new(UnitKind::Infantry, 'B');
        theirs.set_id(2);
        units.insert(Coord::new(0, 0), mine);
        units.insert(Coord::new(0, 1), theirs);

        p.refresh(&units, 'O', 0);
        let tiles = p.cached(Coord::new(0, 0), 1).unwrap();
        assert_eq!(tiles.len(), 1, "enemy blocks the corridor");
        assert!(p.cached(Coord::new(0, 0), 9).is_none());
        assert!(p.cached(Coord::new(0, 1), 2).is_none());
    }
}
