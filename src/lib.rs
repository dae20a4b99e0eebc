//! Scale Control - A liquid two-player duel
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (bodies, collisions, scoring, game phases)
//! - `audio`: Sound cue catalogue consumed by the host's audio backend
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration errors

pub mod audio;
pub mod error;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use tuning::{FieldSize, Tuning};

use glam::Vec2;

/// Default game balance values
pub mod consts {
    /// Weapon length as a fraction of the base dimension
    pub const WEAPON_LENGTH: f32 = 0.02;
    /// Force (shot) length as a fraction of the base dimension
    pub const FORCE_LENGTH: f32 = 0.07;
    /// Force (shot) width as a fraction of the base dimension
    pub const FORCE_WIDTH: f32 = 0.02;
    /// Force strength as a fraction of the base dimension (per second)
    pub const FORCE_STRENGTH: f32 = 0.6;
    /// Force length multiplier per power level
    pub const FORCE_LENGTH_SCALE_STEP: f32 = 2.0;
    /// Force width multiplier per power level
    pub const FORCE_WIDTH_SCALE_STEP: f32 = 2.0;
    /// Radians turned per frame while a turn intent is held
    pub const TURN_SPEED: f32 = 0.04;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 20.0;
    /// Restitution used for every bounce
    pub const BORDER_BOUNCE: f32 = 0.8;
    /// Effective mass of walls and goal rims
    pub const STATIC_MASS: f32 = 1e9;

    /// Goal opening bottom as a fraction of field height (at power level 0)
    pub const GATE_BOTTOM: f32 = 0.55;
    /// Goal opening height as a fraction of field height (at power level 0)
    pub const GATE_HEIGHT: f32 = 0.25;
    /// Goal opening height multiplier per power level
    pub const GATE_SCALE_STEP: f32 = 2.0;
    /// Ambient gate glow per unit of power level
    pub const GATE_GLOW_PER_LEVEL: f32 = 0.3;

    /// Ball radius at match start, as a fraction of the base dimension
    pub const START_BALL_RADIUS: f32 = 0.03;
    /// Ball radius may shrink/grow by at most this factor
    pub const MAX_BALL_SCALE: f32 = 5.0;
    /// Radius multiplier when the ball hits the floor
    pub const BALL_SCALE_STEP_UP: f32 = 1.1;
    /// Radius divisor when the ball hits the ceiling
    pub const BALL_SCALE_STEP_DOWN: f32 = 2.0;
    /// Seconds before another scale event is accepted
    pub const BALL_SCALE_COOLDOWN: f32 = 1.0;
    /// Ball start position as a fraction of the field size
    pub const START_BALL_POSITION: [f32; 2] = [0.5, 0.25];
    /// Ball start velocity as a fraction of the field size (per second)
    pub const START_BALL_VELOCITY: [f32; 2] = [0.0, 0.20];
    pub const BALL_DENSITY: f32 = 2.0;

    /// Power-up orbs in play
    pub const NUM_POWER_UPS: usize = 2;
    /// Power-up orb radius (pixels)
    pub const POWER_UP_RADIUS: f32 = 10.0;
    pub const POWER_UP_DENSITY: f32 = 2.0;
    /// Seconds to ease one full power level
    pub const POWER_UP_TRANSITION: f32 = 1.0;
    /// Seconds a pickup keeps its power level
    pub const POWER_UP_DURATION: f32 = 10.0;
    /// Respawn sampling attempts before falling back to the field center
    pub const RESPAWN_MAX_ATTEMPTS: u32 = 64;

    /// Title shown for this long before the game is ready
    pub const TITLE_DELAY: f32 = 2.0;
    /// Score shown for this long before the game is ready again
    pub const SCORE_DELAY: f32 = 3.0;
    /// Minimum seconds between activity heartbeats
    pub const ACTIVITY_INTERVAL: f32 = 10.0;
    /// Fade applied to the shoot loop when released
    pub const SHOOT_FADE: f32 = 0.5;

    /// Longest frame the simulation will integrate in one step (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Vector addition
#[inline]
pub fn vec_add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

/// Vector subtraction (`a - b`)
#[inline]
pub fn vec_minus(a: Vec2, b: Vec2) -> Vec2 {
    a - b
}

/// Scale a vector by a scalar
#[inline]
pub fn vec_mult(v: Vec2, scalar: f32) -> Vec2 {
    v * scalar
}

/// Euclidean length
#[inline]
pub fn vec_len(v: Vec2) -> f32 {
    v.length()
}

#[inline]
pub fn vec_dot(a: Vec2, b: Vec2) -> f32 {
    a.dot(b)
}

/// Elementwise product
#[inline]
pub fn vec_product(a: Vec2, b: Vec2) -> Vec2 {
    a * b
}

/// Convert a fractional layout position to field pixels
#[inline]
pub fn field_point(fraction: [f32; 2], field: FieldSize) -> Vec2 {
    vec_product(Vec2::from_array(fraction), field.as_vec2())
}

/// Unit direction for an angle (radians, counterclockwise from +x)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_helpers() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, -2.0);
        assert_eq!(vec_add(a, b), Vec2::new(4.0, 2.0));
        assert_eq!(vec_minus(a, b), Vec2::new(2.0, 6.0));
        assert_eq!(vec_mult(a, 2.0), Vec2::new(6.0, 8.0));
        assert_eq!(vec_len(a), 5.0);
        assert_eq!(vec_dot(a, b), -5.0);
        assert_eq!(vec_product(a, b), Vec2::new(3.0, -8.0));
    }

    #[test]
    fn test_field_point() {
        let field = FieldSize::new(800.0, 600.0);
        assert_eq!(field_point([0.5, 0.25], field), Vec2::new(400.0, 150.0));
    }
}
