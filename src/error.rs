//! Error types.
//!
//! Validation failures are not errors: an action that fails `validate()`
//! records its reason and returns `false`. Everything here is fatal for the
//! operation that produced it.

use thiserror::Error;

/// Lookup of an unknown terrain, unit or commander code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Terrain or property code not recognized.
    #[error("{0} is not an available terrain")]
    UnknownTerrain(String),
    /// Unit code not recognized.
    #[error("{0} is not an available unit")]
    UnknownUnit(String),
    /// Commander name not recognized.
    #[error("{0} is not an available commander")]
    UnknownCommander(String),
}

/// Malformed map document or battlefield construction input.
#[derive(Error, Debug)]
pub enum MapLoadError {
    /// Reading the map file failed.
    #[error("failed to read map: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid JSON or does not match the schema.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// A tile or unit code was not recognized.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The terrain grid has no rows or no columns.
    #[error("terrain grid is empty")]
    EmptyGrid,
    /// The terrain grid is larger than the engine supports.
    #[error("terrain grid {rows}x{cols} is too large")]
    GridTooLarge {
        /// Row count.
        rows: usize,
        /// Column count of the widest row.
        cols: usize,
    },
    /// Rows of the terrain grid differ in length.
    #[error("terrain row {row} has {found} tiles, expected {expected}")]
    RaggedGrid {
        /// Offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A unit is placed outside the grid.
    #[error("unit placed out of bounds at (r:{row}, c:{col})")]
    OutOfBounds {
        /// Row of the placement.
        row: usize,
        /// Column of the placement.
        col: usize,
    },
    /// Two units are placed on the same tile.
    #[error("more than one unit placed at (r:{row}, c:{col})")]
    DuplicatePlacement {
        /// Row of the placement.
        row: usize,
        /// Column of the placement.
        col: usize,
    },
    /// A starting unit's health, fuel or ammo exceeds its maximum.
    #[error("unit at (r:{row}, c:{col}) has invalid {field} {value}")]
    InvalidUnitStat {
        /// Row of the placement.
        row: usize,
        /// Column of the placement.
        col: usize,
        /// `"health"`, `"fuel"` or `"ammo"`.
        field: &'static str,
        /// Value given in the document.
        value: u8,
    },
    /// A unit owner is not a registered player.
    #[error("unit owner {0:?} is not a player")]
    UnknownOwner(String),
    /// Fewer than two players were registered.
    #[error("at least two players are required, got {0}")]
    TooFewPlayers(usize),
}

/// Misuse of the two-phase action protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// `execute()` was called on an action that is not in the validated state.
    #[error("action not validated: {0}")]
    NotValidated(String),
    /// A reference bound during validation no longer resolves.
    #[error("action binding is stale: {0}")]
    StaleBinding(String),
}

/// Failures surfaced by a game session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A strict session was asked to execute an invalid action.
    #[error("{action}: {reason}")]
    InvalidAction {
        /// Description of the rejected action.
        action: String,
        /// Validation failure reason.
        reason: String,
    },
    /// The action protocol was violated.
    #[error(transparent)]
    Action(#[from] ActionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::UnknownUnit("XYZ".to_string());
        assert_eq!(err.to_string(), "XYZ is not an available unit");
    }

    #[test]
    fn test_map_load_error_from_catalog() {
        let err: MapLoadError = CatalogError::UnknownTerrain("QQQ".to_string()).into();
        assert!(matches!(err, MapLoadError::Catalog(_)));
        assert!(err.to_string().contains("QQQ"));
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::InvalidAction {
            action: "End Turn".to_string(),
            reason: "nope".to_string(),
        };
        assert_eq!(err.to_string(), "End Turn: nope");
    }
}
