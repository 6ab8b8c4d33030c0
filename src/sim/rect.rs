//! Axis-aligned rectangle geometry
//!
//! World space is +Y up. A rectangle is anchored at its top-left corner:
//! it occupies X in [left, left + width] and Y in [top - height, top].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    /// Highest edge (+Y up)
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0);
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top - self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left + self.width / 2.0,
            self.top - self.height / 2.0,
        )
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Overlap test on both axes. Edge-touching (zero-width overlap) counts
    /// as intersecting so the epsilon-tolerant contact window sees bodies
    /// that rest exactly flush against an obstacle.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.bottom() <= other.top
            && other.bottom() <= self.top
    }

    /// Same rectangle moved by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Rect {
        Rect {
            left: self.left + delta.x,
            top: self.top + delta.y,
            ..*self
        }
    }

    /// Same rectangle grown by `margin` on every side (used for
    /// contact-proximity queries, e.g. damage tiles a resolved body
    /// is separated from by the collision epsilon)
    #[inline]
    pub fn inflated(&self, margin: f32) -> Rect {
        Rect {
            left: self.left - margin,
            top: self.top + margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }
}
