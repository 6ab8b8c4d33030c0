//! Data-driven physics balance
//!
//! Everything feel-related lives here so designers can tweak a JSON file
//! instead of code. Units follow the sim: meters, milliseconds.

use serde::{Deserialize, Serialize};

/// Physics balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Gravitational acceleration, meters per millisecond squared
    pub gravity: f32,
    /// Player jump impulse, meters per millisecond
    pub jump_speed: f32,
    /// Hop impulse for periodic-jump entities
    pub hop_speed: f32,
    /// Base interval between hops, milliseconds
    pub hop_interval_ms: f32,
    /// Random spread added to each hop interval, milliseconds
    pub hop_interval_jitter_ms: f32,
    /// Initial patrol speed for linear and bounce entities
    pub patrol_speed: f32,
    /// Player ambulation acceleration, meters per millisecond squared
    pub run_accel: f32,
    /// Ground deceleration at friction 1.0, meters per millisecond squared
    pub ground_decel: f32,
    /// Player ambulation speed cap, meters per millisecond
    pub run_speed: f32,
    /// Speed cap multiplier while the speed power-up is active
    pub boost_multiplier: f32,
    /// Elasticity for bounce-pattern entities
    pub bounce_elasticity: f32,
    /// Player bounding box, meters
    pub player_width: f32,
    pub player_height: f32,
    /// Square bounding box side for dynamic entities, meters
    pub entity_size: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 2.5e-5,
            jump_speed: 9.0e-3,
            hop_speed: 6.0e-3,
            hop_interval_ms: 1800.0,
            hop_interval_jitter_ms: 600.0,
            patrol_speed: 2.0e-3,
            run_accel: 3.0e-5,
            ground_decel: 2.0e-5,
            run_speed: 5.0e-3,
            boost_multiplier: 1.5,
            bounce_elasticity: 0.85,
            player_width: 0.75,
            player_height: 0.95,
            entity_size: 0.8,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
