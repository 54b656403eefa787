//! Grid geometry: coordinates, offsets and board dimensions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Player identifier: the owner character used in map documents (`'O'`, `'B'`, ...).
pub type PlayerId = char;

/// Owner character reserved for neutral properties.
pub const NEUTRAL: char = 'N';

/// A tile coordinate. Ordering is row-major, so ordered maps iterate the
/// board top-left to bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Row index (0 = top).
    pub row: u16,
    /// Column index (0 = left).
    pub col: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Apply an offset, returning `None` if the result has a negative component.
    #[must_use]
    pub fn offset(self, offset: Offset) -> Option<Self> {
        let row = i32::from(self.row) + offset.dr;
        let col = i32::from(self.col) + offset.dc;
        Some(Self::new(u16::try_from(row).ok()?, u16::try_from(col).ok()?))
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        u32::from(self.row.abs_diff(other.row)) + u32::from(self.col.abs_diff(other.col))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A relative displacement on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Offset {
    /// Row delta.
    pub dr: i32,
    /// Column delta.
    pub dc: i32,
}

impl Offset {
    /// The zero offset (stay in place).
    pub const ZERO: Self = Self { dr: 0, dc: 0 };

    /// The four unit offsets: up, down, right, left.
    pub const CARDINAL: [Self; 4] = [
        Self { dr: -1, dc: 0 },
        Self { dr: 1, dc: 0 },
        Self { dr: 0, dc: 1 },
        Self { dr: 0, dc: -1 },
    ];

    /// Create a new offset.
    #[must_use]
    pub const fn new(dr: i32, dc: i32) -> Self {
        Self { dr, dc }
    }

    /// Offset that carries `from` onto `to`.
    #[must_use]
    pub fn between(from: Coord, to: Coord) -> Self {
        Self::new(
            i32::from(to.row) - i32::from(from.row),
            i32::from(to.col) - i32::from(from.col),
        )
    }

    /// Manhattan length of the offset.
    #[must_use]
    pub const fn length(self) -> u32 {
        self.dr.unsigned_abs() + self.dc.unsigned_abs()
    }

    /// Whether this is the zero offset.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.dr == 0 && self.dc == 0
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dr, self.dc)
    }
}

/// Board size in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of rows.
    pub rows: u16,
    /// Number of columns.
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Total number of tiles.
    #[must_use]
    pub const fn area(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Check if a coordinate lies on the board.
    #[must_use]
    pub const fn contains(self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Row-major index of a coordinate. Caller must ensure it is in bounds.
    #[must_use]
    pub const fn index(self, coord: Coord) -> usize {
        coord.row as usize * self.cols as usize + coord.col as usize
    }

    /// Inverse of [`Dimensions::index`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn coord(self, index: usize) -> Coord {
        let cols = self.cols as usize;
        Coord::new((index / cols) as u16, (index % cols) as u16)
    }

    /// In-bounds 4-neighbours of a coordinate.
    ///
    /// Returns a fixed-size array and count to avoid heap allocation;
    /// entries `0..count` are valid.
    #[must_use]
    #[inline]
    pub fn neighbors(self, coord: Coord) -> ([Coord; 4], usize) {
        let mut result = [coord; 4];
        let mut count = 0;

        for offset in Offset::CARDINAL {
            if let Some(next) = coord.offset(offset) {
                if self.contains(next) {
                    result[count] = next;
                    count += 1;
                }
            }
        }

        (result, count)
    }

    /// Iterate every coordinate in row-major order.
    pub fn iter(self) -> impl Iterator<Item = Coord> {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Coord::new(row, col)))
    }
}
