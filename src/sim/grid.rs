//! Tile grid: level terrain and its spatial queries
//!
//! A level is a 2D array of small type indices into a shared attribute
//! table; per-cell data is never duplicated. Rows are stored bottom-to-top
//! (row 0 is the bottom of the level) and may be ragged. The grid is built
//! once at level load and treated as read-only by the physics code; the only
//! supported edit is clearing a cell back to empty space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::RectBody;
use super::entity::MovementPattern;
use super::rect::Rect;

fn default_friction() -> f32 {
    1.0
}

fn default_tile_size() -> f32 {
    1.0
}

/// Per-type tile attributes, shared by every cell of that type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileAttributes {
    /// Cell is open air
    #[serde(default)]
    pub empty_space: bool,
    /// Cell marks the player start position
    #[serde(default)]
    pub start_marker: bool,
    /// Cell spawns a dynamic entity instead of being terrain
    #[serde(default)]
    pub spawn_marker: bool,
    /// Movement pattern for spawned entities (spawn markers only)
    #[serde(default)]
    pub spawn_pattern: Option<MovementPattern>,
    /// Surface friction scale applied to resting bodies
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Tile's restitution contribution, in [0, 1]
    #[serde(default)]
    pub restitution: f32,
    /// Damage dealt to the player on contact (0 = harmless)
    #[serde(default)]
    pub contact_damage: f32,
}

impl TileAttributes {
    /// Plain empty air
    pub fn empty() -> Self {
        Self {
            empty_space: true,
            start_marker: false,
            spawn_marker: false,
            spawn_pattern: None,
            friction: 1.0,
            restitution: 0.0,
            contact_damage: 0.0,
        }
    }

    /// Solid terrain with default surface properties
    pub fn solid() -> Self {
        Self {
            empty_space: false,
            ..Self::empty()
        }
    }

    /// A cell is collidable iff it is neither air nor a marker. This is the
    /// single source of truth for solidity; always derived, never cached.
    #[inline]
    pub fn is_physical(&self) -> bool {
        !(self.empty_space || self.start_marker || self.spawn_marker)
    }
}

/// Where a marker cell places something in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnKind {
    PlayerStart,
    Dynamic { pattern: MovementPattern },
}

/// A spawn location extracted from the grid at load time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    /// Center of the marker cell, world space
    pub pos: Vec2,
    pub kind: SpawnKind,
}

/// The static level terrain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    /// Type indices, rows bottom-to-top, possibly ragged
    rows: Vec<Vec<u8>>,
    /// Shared per-type attribute table
    attributes: Vec<TileAttributes>,
    /// Side length of one tile, world units
    tile_size: f32,
}

impl TileGrid {
    pub fn new(rows: Vec<Vec<u8>>, attributes: Vec<TileAttributes>, tile_size: f32) -> Self {
        debug_assert!(tile_size > 0.0);
        Self {
            rows,
            attributes,
            tile_size,
        }
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Type index at a cell, `None` when out of range
    pub fn type_at(&self, row: i32, col: i32) -> Option<u8> {
        if row < 0 || col < 0 {
            return None;
        }
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Attributes at a cell. Out-of-range cells and type indices missing
    /// from the table both yield `None`, which callers treat as "not
    /// physical" rather than an error.
    pub fn attributes_at(&self, row: i32, col: i32) -> Option<&TileAttributes> {
        self.type_at(row, col)
            .and_then(|t| self.attributes.get(t as usize))
    }

    /// Is the cell solid terrain? Missing cells and markers are not.
    #[inline]
    pub fn is_physical(&self, row: i32, col: i32) -> bool {
        self.attributes_at(row, col)
            .is_some_and(TileAttributes::is_physical)
    }

    /// World-space rectangle of a cell
    pub fn tile_rect(&self, row: i32, col: i32) -> Rect {
        let ts = self.tile_size;
        Rect::new(col as f32 * ts, (row + 1) as f32 * ts, ts, ts)
    }

    /// World-space rectangle of a cell shifted by `offset` (scrolling layers)
    pub fn tile_rect_offset(&self, row: i32, col: i32, offset: Vec2) -> Rect {
        self.tile_rect(row, col).translated(offset)
    }

    /// Immovable collision body for a cell
    pub fn tile_body(&self, row: i32, col: i32) -> RectBody {
        RectBody::immovable(self.tile_rect(row, col))
    }

    /// Cell containing a world-space point, as (row, col). May be out of
    /// range; pair with the range-checked accessors above.
    pub fn cell_at(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.y / self.tile_size).floor() as i32,
            (pos.x / self.tile_size).floor() as i32,
        )
    }

    /// Attributes of the physical tile immediately beneath a rectangle, or
    /// `None` when the space below is open. This is the grounded query
    /// gameplay uses ("can the player jump now"), probing one cell
    /// just under the rectangle's bottom edge at its horizontal center.
    pub fn support_under(&self, bounds: &Rect) -> Option<&TileAttributes> {
        let probe = Vec2::new(
            bounds.left + bounds.half_width(),
            bounds.bottom() - self.tile_size * 1e-3,
        );
        let (row, col) = self.cell_at(probe);
        self.attributes_at(row, col).filter(|a| a.is_physical())
    }

    /// Reset a cell to the first empty-space type in the attribute table.
    /// No-op when the cell is out of range or no empty type exists.
    pub fn clear_tile(&mut self, row: i32, col: i32) {
        let Some(empty_index) = self
            .attributes
            .iter()
            .position(|a| a.empty_space)
        else {
            log::warn!("clear_tile: attribute table has no empty-space type");
            return;
        };
        if row < 0 || col < 0 {
            return;
        }
        if let Some(cell) = self
            .rows
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            *cell = empty_index as u8;
        }
    }

    /// Spawn locations recorded in the grid (start and dynamic markers)
    pub fn spawn_points(&self) -> Vec<SpawnPoint> {
        let mut spawns = Vec::new();
        for row in 0..self.rows.len() as i32 {
            for col in 0..self.rows[row as usize].len() as i32 {
                let Some(attrs) = self.attributes_at(row, col) else {
                    continue;
                };
                let kind = if attrs.start_marker {
                    SpawnKind::PlayerStart
                } else if attrs.spawn_marker {
                    SpawnKind::Dynamic {
                        pattern: attrs.spawn_pattern.unwrap_or(MovementPattern::Linear),
                    }
                } else {
                    continue;
                };
                spawns.push(SpawnPoint {
                    pos: self.tile_rect(row, col).center(),
                    kind,
                });
            }
        }
        spawns
    }
}

/// Serialized level definition: tile matrix plus attribute table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    /// Rows of type indices, bottom row first
    pub tiles: Vec<Vec<u8>>,
    pub attributes: Vec<TileAttributes>,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
}

impl LevelDef {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn build(&self) -> TileGrid {
        log::info!(
            "Loading level: {} rows, {} tile types",
            self.tiles.len(),
            self.attributes.len()
        );
        TileGrid::new(self.tiles.clone(), self.attributes.clone(), self.tile_size)
    }
}
