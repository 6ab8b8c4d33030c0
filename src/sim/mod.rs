//! Deterministic simulation module
//!
//! All physics logic lives here. This module must be pure and deterministic:
//! - Caller-clamped time deltas only (see `consts::MAX_FRAME_DT_MS`)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod entity;
pub mod grid;
pub mod rect;
pub mod search;
pub mod tick;

pub use body::{Edge, EdgeSet, RectBody};
pub use collision::{EdgeContact, detect_edges, dominant_contact, resolve_edge};
pub use entity::{Entity, MovementPattern, Player};
pub use grid::{LevelDef, SpawnKind, SpawnPoint, TileAttributes, TileGrid};
pub use rect::Rect;
pub use search::{EvaluatedSystem, resolve_against_terrain, seam_exclusions};
pub use tick::{GameEvent, RngState, TickInput, World, tick};
