//! Physics bodies and collision edges
//!
//! A `RectBody` is a value snapshot: the integrator builds one from an
//! entity's current state each step, collision resolution produces corrected
//! copies, and the final copy is written back. Bodies are never mutated in
//! place by the collision code.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// One of the four edges of an axis-aligned body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Top/Bottom contacts correct the vertical axis (ground and ceiling);
    /// Left/Right correct the horizontal axis (walls).
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

/// Subset of a body's edges, used to suppress contacts at internal tile seams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSet {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl EdgeSet {
    pub const NONE: EdgeSet = EdgeSet {
        left: false,
        right: false,
        top: false,
        bottom: false,
    };

    #[inline]
    pub fn contains(&self, edge: Edge) -> bool {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }

    #[inline]
    pub fn insert(&mut self, edge: Edge) {
        match edge {
            Edge::Left => self.left = true,
            Edge::Right => self.right = true,
            Edge::Top => self.top = true,
            Edge::Bottom => self.bottom = true,
        }
    }
}

/// An axis-aligned physics body
///
/// `mass` is finite-positive for dynamic bodies or `f32::INFINITY` for
/// immovable ones (static tiles). Velocity is in meters per millisecond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectBody {
    pub mass: f32,
    pub velocity: Vec2,
    /// This body's own restitution contribution, in [0, 1]
    pub elasticity: f32,
    pub bounds: Rect,
}

impl RectBody {
    pub fn dynamic(mass: f32, velocity: Vec2, elasticity: f32, bounds: Rect) -> Self {
        debug_assert!(mass.is_finite() && mass > 0.0);
        debug_assert!((0.0..=1.0).contains(&elasticity));
        Self {
            mass,
            velocity,
            elasticity,
            bounds,
        }
    }

    /// An infinite-mass body that never moves in response to collision
    pub fn immovable(bounds: Rect) -> Self {
        Self {
            mass: f32::INFINITY,
            velocity: Vec2::ZERO,
            elasticity: 0.0,
            bounds,
        }
    }

    #[inline]
    pub fn is_immovable(&self) -> bool {
        self.mass.is_infinite()
    }

    /// Combined restitution for a body/body pair: the average of the two
    /// elasticity contributions.
    #[inline]
    pub fn pair_restitution(a: &RectBody, b: &RectBody) -> f32 {
        (a.elasticity + b.elasticity) / 2.0
    }

    /// Combined restitution for a body/tile contact. A bouncy tile must not
    /// be absorbed by a low-elasticity body, so the larger coefficient wins.
    #[inline]
    pub fn tile_restitution(&self, tile_restitution: f32) -> f32 {
        tile_restitution.max(self.elasticity)
    }
}
