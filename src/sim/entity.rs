//! Dynamic entities and the player
//!
//! Entities carry a movement pattern tag plus the state a `RectBody`
//! snapshot is built from each step. The integrator in `tick` owns all
//! movement rules; these types are plain data with body conversion.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::RectBody;
use super::rect::Rect;
use crate::tuning::Tuning;

/// How a dynamic entity moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementPattern {
    /// Constant velocity, no gravity (platforms, projectiles)
    Linear,
    /// Hops on a timer while grounded; gravity-affected
    PeriodicJump,
    /// High-elasticity body that keeps rebounding off terrain
    Bounce,
}

impl MovementPattern {
    #[inline]
    pub fn gravity_affected(self) -> bool {
        !matches!(self, MovementPattern::Linear)
    }
}

/// A non-player dynamic element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pattern: MovementPattern,
    pub mass: f32,
    pub elasticity: f32,
    pub bounds: Rect,
    pub velocity: Vec2,
    /// Milliseconds until the next hop (PeriodicJump only)
    pub hop_timer_ms: f32,
}

impl Entity {
    pub fn new(id: u32, pattern: MovementPattern, pos: Vec2, tuning: &Tuning) -> Self {
        let size = tuning.entity_size;
        let elasticity = match pattern {
            MovementPattern::Bounce => tuning.bounce_elasticity,
            MovementPattern::Linear => 1.0,
            MovementPattern::PeriodicJump => 0.0,
        };
        Self {
            id,
            pattern,
            mass: 1.0,
            elasticity,
            bounds: Rect::new(pos.x - size / 2.0, pos.y + size / 2.0, size, size),
            velocity: Vec2::ZERO,
            hop_timer_ms: tuning.hop_interval_ms,
        }
    }

    /// Fresh body snapshot for this step
    pub fn body(&self) -> RectBody {
        RectBody::dynamic(self.mass, self.velocity, self.elasticity, self.bounds)
    }

    /// Write a corrected body back
    pub fn apply(&mut self, body: &RectBody) {
        self.bounds = body.bounds;
        self.velocity = body.velocity;
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub bounds: Rect,
    pub velocity: Vec2,
    pub mass: f32,
    pub elasticity: f32,
    /// Speed power-up active: raises the ambulation speed cap
    pub speed_boost: bool,
}

impl Player {
    pub fn spawn(pos: Vec2, tuning: &Tuning) -> Self {
        let (w, h) = (tuning.player_width, tuning.player_height);
        Self {
            bounds: Rect::new(pos.x - w / 2.0, pos.y + h / 2.0, w, h),
            velocity: Vec2::ZERO,
            mass: 1.0,
            elasticity: 0.0,
            speed_boost: false,
        }
    }

    pub fn body(&self) -> RectBody {
        RectBody::dynamic(self.mass, self.velocity, self.elasticity, self.bounds)
    }

    pub fn apply(&mut self, body: &RectBody) {
        self.bounds = body.bounds;
        self.velocity = body.velocity;
    }

    /// Ambulation speed cap, scaled while the speed power-up is active
    pub fn max_run_speed(&self, tuning: &Tuning) -> f32 {
        if self.speed_boost {
            tuning.run_speed * tuning.boost_multiplier
        } else {
            tuning.run_speed
        }
    }
}
