//! Map documents.
//!
//! A map is a JSON object with a terrain grid of three-character codes and
//! the starting units of each player:
//!
//! ```json
//! {
//!   "terrain": [["OHQ", "PLN"], ["PLN", "BHQ"]],
//!   "units": { "O": [{ "code": "INF", "row": 0, "col": 1 }] }
//! }
//! ```
//!
//! Property codes put the owner character first (`N` for neutral).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MapLoadError;
use crate::game::{
    Battlefield, CommanderProfile, Coord, MAX_HEALTH, NEUTRAL, PlayerId, PropertyKind,
    TerrainCatalog, Unit, UnitCatalog,
};
use crate::session::{GameSession, SessionConfig};

/// One starting unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPlacement {
    /// Three-letter unit code.
    pub code: String,
    /// Row of the unit.
    pub row: usize,
    /// Column of the unit.
    pub col: usize,
    /// Internal health; full if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u8>,
    /// Fuel; full if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel: Option<u8>,
    /// Ammo; full if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammo: Option<u8>,
}

/// A parsed map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDocument {
    /// Row-major grid of terrain codes.
    pub terrain: Vec<Vec<String>>,
    /// Starting units by owner character.
    #[serde(default)]
    pub units: BTreeMap<String, Vec<UnitPlacement>>,
}

impl MapDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`MapLoadError::Json`] if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, MapLoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`MapLoadError::Io`] if the file cannot be read and
    /// [`MapLoadError::Json`] if it is not a valid document.
    pub fn from_path(path: &Path) -> Result<Self, MapLoadError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Every player the document mentions: unit owners and owners of
    /// properties, in sorted order.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerId> {
        let mut players = BTreeSet::new();
        for owner in self.units.keys() {
            let mut chars = owner.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                players.insert(c);
            }
        }
        for code in self.terrain.iter().flatten() {
            let mut chars = code.chars();
            let Some(owner) = chars.next() else { continue };
            let suffix = chars.as_str();
            if owner != NEUTRAL && PropertyKind::ALL.iter().any(|k| k.suffix() == suffix) {
                players.insert(owner);
            }
        }
        players.into_iter().collect()
    }
}

impl Battlefield {
    /// Build a battlefield from a map document. Players are the keys of
    /// `commanders`.
    ///
    /// # Errors
    ///
    /// Returns a [`MapLoadError`] for unknown codes or owners, a malformed
    /// grid, or bad unit placements.
    pub fn from_document(
        document: &MapDocument,
        commanders: BTreeMap<PlayerId, CommanderProfile>,
    ) -> Result<Self, MapLoadError> {
        let catalog = TerrainCatalog::new(commanders.keys().copied());
        let grid = document
            .terrain
            .iter()
            .map(|row| row.iter().map(|code| catalog.create(code)).collect())
            .collect::<Result<Vec<Vec<_>>, _>>()?;

        let mut units = Vec::new();
        for (owner_text, placements) in &document.units {
            let owner = single_char(owner_text)
                .filter(|c| commanders.contains_key(c))
                .ok_or_else(|| MapLoadError::UnknownOwner(owner_text.clone()))?;
            for placement in placements {
                let coord = match (u16::try_from(placement.row), u16::try_from(placement.col)) {
                    (Ok(row), Ok(col)) => Coord::new(row, col),
                    _ => {
                        return Err(MapLoadError::OutOfBounds {
                            row: placement.row,
                            col: placement.col,
                        });
                    }
                };
                let unit = UnitCatalog::create(&placement.code, owner)?;
                units.push((coord, apply_stats(unit, placement)?));
            }
        }

        Self::new(grid, units, commanders)
    }
}

/// Override a fresh unit's stats with the placement's, rejecting values
/// above the unit's maxima.
fn apply_stats(mut unit: Unit, placement: &UnitPlacement) -> Result<Unit, MapLoadError> {
    let spec = unit.spec();
    let checks = [
        ("health", placement.health, MAX_HEALTH),
        ("fuel", placement.fuel, spec.max_fuel),
        ("ammo", placement.ammo, spec.max_ammo),
    ];
    for (field, value, max) in checks {
        if let Some(value) = value.filter(|v| *v > max) {
            return Err(MapLoadError::InvalidUnitStat {
                row: placement.row,
                col: placement.col,
                field,
                value,
            });
        }
    }
    if let Some(health) = placement.health {
        unit = unit.with_health(health);
    }
    if let Some(fuel) = placement.fuel {
        unit = unit.with_fuel(fuel);
    }
    if let Some(ammo) = placement.ammo {
        unit = unit.with_ammo(ammo);
    }
    Ok(unit)
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Load a map file and start a session on it.
///
/// # Errors
///
/// Returns a [`MapLoadError`] if the file cannot be read or parsed, or the
/// map is invalid for these commanders.
pub fn load_map(
    path: &Path,
    commanders: BTreeMap<PlayerId, CommanderProfile>,
    config: SessionConfig,
) -> Result<GameSession, MapLoadError> {
    let document = MapDocument::from_path(path)?;
    let field = Battlefield::from_document(&document, commanders)?;
    tracing::info!(path = %path.display(), "map loaded");
    Ok(GameSession::new(field, config))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::CatalogError;
    use crate::game::{Luck, UnitKind};

    const SMALL: &str = r#"{
        "terrain": [["OHQ", "PLN", "NCT"], ["PLN", "WOD", "BHQ"]],
        "units": {
            "O": [{"code": "INF", "row": 0, "col": 1, "health": 55}],
            "B": [{"code": "TNK", "row": 1, "col": 1, "ammo": 3}]
        }
    }"#;

    fn commanders() -> BTreeMap<PlayerId, CommanderProfile> {
        BTreeMap::from([
            ('O', CommanderProfile::base(Luck::Fixed(0))),
            ('B', CommanderProfile::base(Luck::Fixed(0))),
        ])
    }

    #[test]
    fn test_parse_and_build() {
        let document = MapDocument::from_json(SMALL).unwrap();
        assert_eq!(document.players(), vec!['B', 'O']);

        let field = Battlefield::from_document(&document, commanders()).unwrap();
        let inf = field.unit(Coord::new(0, 1), Some('O')).unwrap();
        assert_eq!(inf.kind(), UnitKind::Infantry);
        assert_eq!(inf.health(), 55);
        assert_eq!(field.unit(Coord::new(1, 1), Some('B')).unwrap().ammo(), 3);
        assert_eq!(field.properties(None).count(), 3);
    }

    #[test]
    fn test_unknown_codes_fail() {
        let bad_unit = SMALL.replace("TNK", "XYZ");
        let document = MapDocument::from_json(&bad_unit).unwrap();
        assert!(matches!(
            Battlefield::from_document(&document, commanders()),
            Err(MapLoadError::Catalog(CatalogError::UnknownUnit(_)))
        ));

        let bad_tile = SMALL.replace("WOD", "QQQ");
        let document = MapDocument::from_json(&bad_tile).unwrap();
        assert!(matches!(
            Battlefield::from_document(&document, commanders()),
            Err(MapLoadError::Catalog(CatalogError::UnknownTerrain(_)))
        ));
    }

    #[test]
    fn test_unknown_owner_fails() {
        let document = MapDocument::from_json(&SMALL.replace("\"B\":", "\"R\":")).unwrap();
        assert!(matches!(
            Battlefield::from_document(&document, commanders()),
            Err(MapLoadError::UnknownOwner(owner)) if owner == "R"
        ));
    }

    #[test]
    fn test_out_of_range_stats_fail() {
        let document = MapDocument::from_json(&SMALL.replace("\"health\": 55", "\"health\": 150"))
            .unwrap();
        assert!(matches!(
            Battlefield::from_document(&document, commanders()),
            Err(MapLoadError::InvalidUnitStat { row: 0, col: 1, field: "health", value: 150 })
        ));

        let document =
            MapDocument::from_json(&SMALL.replace("\"health\": 55", "\"fuel\": 250")).unwrap();
        assert!(matches!(
            Battlefield::from_document(&document, commanders()),
            Err(MapLoadError::InvalidUnitStat { field: "fuel", value: 250, .. })
        ));

        let document = MapDocument::from_json(&SMALL.replace("\"ammo\": 3", "\"ammo\": 10"))
            .unwrap();
        let err = Battlefield::from_document(&document, commanders()).unwrap_err();
        assert_eq!(err.to_string(), "unit at (r:1, c:1) has invalid ammo 10");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MapDocument::from_json("{\"terrain\": 3}"),
            Err(MapLoadError::Json(_))
        ));
    }

    #[test]
    fn test_load_map_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL.as_bytes()).unwrap();
        let session = load_map(file.path(), commanders(), SessionConfig::default()).unwrap();
        assert_eq!(session.battlefield().units(None).count(), 2);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            load_map(&missing, commanders(), SessionConfig::default()),
            Err(MapLoadError::Io(_))
        ));
    }
}
