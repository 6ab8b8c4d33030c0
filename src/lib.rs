//! Gridhopper - a tile-grid platformer physics core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (AABB collision, tile grid, integrator)
//! - `tuning`: Data-driven physics balance
//!
//! The crate is a pure function of `(bodies, grid, dt)` - no rendering,
//! input-device, or asset-loading code. World space is +Y up; a rectangle's
//! `top` is its highest edge and tile rows are stored bottom-to-top.

pub mod sim;
pub mod tuning;

pub use sim::{
    Edge, EdgeContact, EdgeSet, Entity, GameEvent, LevelDef, MovementPattern, Player, Rect,
    RectBody, TickInput, TileAttributes, TileGrid, World, resolve_against_terrain, tick,
};
pub use tuning::Tuning;

/// Physics configuration constants
pub mod consts {
    /// Geometric tolerance shared by collision detection and resolution.
    /// Both sides must use the same value: a resolved body is separated from
    /// its obstacle by exactly this gap, and detection must accept overlaps
    /// down to its negation or the next pass re-triggers the same contact.
    pub const COLLISION_EPSILON: f32 = f32::EPSILON * 100.0;

    /// Coarser threshold below which vertical velocity counts as settled
    /// (meters per millisecond). Distinct from the geometric epsilon.
    pub const REST_SPEED_EPSILON: f32 = 1e-4;

    /// Maximum corrective passes per body per simulation step. Guarantees
    /// termination when a tile configuration would otherwise oscillate.
    pub const RESOLUTION_ITERATION_CAP: u32 = 10;

    /// Tile-scan radius around a body, in tiles per direction (7x7 window).
    pub const NEIGHBORHOOD_RADIUS: i32 = 3;

    /// Largest time delta the core supports, in milliseconds
    /// (a 15 fps floor). Callers clamp dt before handing it to `tick`;
    /// the core itself does not clamp.
    pub const MAX_FRAME_DT_MS: f32 = 1000.0 / 15.0;
}
