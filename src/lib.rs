// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Skirmish: a deterministic turn-based tactical wargame engine.
//!
//! Two players or more share a grid of terrain and capturable properties,
//! build units with their funds and fight until one is left holding a
//! headquarters or an army.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Self-play harness / CLI           │
//! ├─────────────────────────────────────┤
//! │   GameSession (history, winner)     │
//! ├─────────────────────────────────────┤
//! │   Actions: validate -> execute      │
//! ├─────────────────────────────────────┤
//! │   Battlefield + MovementPlanner     │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every change to a [`Battlefield`] goes through an [`Action`]: validation
//! is a cheap legality probe that never mutates, execution applies it. Luck
//! comes from a seeded source per commander, so the same map, seed and
//! action sequence always produce the same game.

pub mod error;
pub mod game;
pub mod loader;
pub mod notation;
pub mod render;
pub mod selfplay;
pub mod session;

pub use error::{ActionError, CatalogError, MapLoadError, SessionError};

// Re-export key game types at crate root for convenience
pub use game::{
    Action, ActionState, Battlefield, CommanderCatalog, CommanderProfile, Coord, Offset, PlayerId,
    Tile, Unit, UnitKind,
};
pub use loader::{MapDocument, load_map};
pub use notation::{NotationError, parse_action};
pub use render::render_ascii;
pub use session::{GameSession, HistoryEntry, SessionConfig};
