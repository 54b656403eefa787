//! CLI command implementations for Skirmish.

pub(crate) mod play;
pub(crate) mod run;
pub(crate) mod selfplay;
pub(crate) mod show;

mod output;

use clap::ValueEnum;
use skirmish::game::{CommanderCatalog, MobilityClass};
use skirmish::{Battlefield, Coord, MapDocument};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `run` and `selfplay` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Mobility class for the `show` path query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Mobility {
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
    /// Landers.
    Lander,
    /// Aircraft.
    Air,
    /// Pipeline-bound units.
    Pipe,
}

impl From<Mobility> for MobilityClass {
    fn from(mobility: Mobility) -> Self {
        match mobility {
            Mobility::Foot => Self::Foot,
            Mobility::Boot => Self::Boot,
            Mobility::Treads => Self::Treads,
            Mobility::Tires => Self::Tires,
            Mobility::Sea => Self::Sea,
            Mobility::Lander => Self::Lander,
            Mobility::Air => Self::Air,
            Mobility::Pipe => Self::Pipe,
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<skirmish::MapLoadError> for CliError {
    fn from(e: skirmish::MapLoadError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<skirmish::SessionError> for CliError {
    fn from(e: skirmish::SessionError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<skirmish::CatalogError> for CliError {
    fn from(e: skirmish::CatalogError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Where a command's battlefield comes from.
#[derive(Debug)]
pub(crate) struct MapSource {
    /// Map file.
    pub(crate) path: PathBuf,
    /// Luck seed; random if absent.
    pub(crate) seed: Option<u64>,
    /// Starting funds for every player.
    pub(crate) funds: u32,
    /// Commander names in player order.
    pub(crate) commanders: Vec<String>,
}

impl MapSource {
    /// The requested seed, or one drawn from the clock.
    pub(crate) fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(42, |d| d.as_secs() ^ u64::from(d.subsec_nanos()))
        })
    }

    /// Read the map and build its battlefield, seeding each commander's
    /// luck from `seed`.
    pub(crate) fn load(&self, seed: u64) -> Result<Battlefield, CliError> {
        let document = MapDocument::from_path(&self.path)
            .map_err(|e| CliError::new(format!("Failed to load {}: {e}", self.path.display())))?;
        let players = document.players();
        if self.commanders.len() > players.len() {
            return Err(CliError::new(format!(
                "{} commanders given for {} players",
                self.commanders.len(),
                players.len()
            )));
        }

        let mut commanders = BTreeMap::new();
        for (i, player) in players.iter().enumerate() {
            let name = self.commanders.get(i).map_or("None", String::as_str);
            let profile = CommanderCatalog::create(name, seed.wrapping_add(i as u64))?;
            commanders.insert(*player, profile);
        }

        let field = Battlefield::from_document(&document, commanders)?;
        Ok(players
            .into_iter()
            .fold(field, |field, player| field.with_funds(player, self.funds)))
    }
}

/// Parse a `row,col` position.
pub(crate) fn parse_coord(text: &str) -> Result<Coord, CliError> {
    let bad = || CliError::new(format!("{text:?} is not a row,col position"));
    let (row, col) = text.split_once(',').ok_or_else(bad)?;
    let row = row.trim().parse().map_err(|_| bad())?;
    let col = col.trim().parse().map_err(|_| bad())?;
    Ok(Coord::new(row, col))
}
