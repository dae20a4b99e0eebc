//! Ball-scale effect
//!
//! Hitting the floor grows the main ball, hitting the ceiling shrinks it.
//! A cooldown keeps a resting or slow-bouncing ball from re-triggering on
//! consecutive frames.

use super::body::Body;
use crate::tuning::{FieldSize, Tuning};

/// Outcome of a scale event that actually changed the radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescaled {
    pub radius: f32,
    /// Playback rate for the scale cue: smaller ball, higher pitch
    pub cue_rate: f32,
}

#[derive(Debug, Clone, Default)]
pub struct BallScaler {
    /// Seconds until the next scale event is accepted
    cooldown: f32,
}

impl BallScaler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Re-enable scaling immediately (on entering play)
    pub fn reset(&mut self) {
        self.cooldown = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
    }

    /// Scale the ball up (`dir > 0`) or down (`dir < 0`)
    ///
    /// Ignored while on cooldown. Any accepted event starts the cooldown,
    /// even when the radius is already at its bound.
    pub fn scale(&mut self, ball: &mut Body, dir: i32, tuning: &Tuning, field: FieldSize) -> Option<Rescaled> {
        if !self.is_ready() || dir == 0 {
            return None;
        }
        self.cooldown = tuning.ball_scale_cooldown;

        let step = if dir > 0 {
            tuning.ball_scale_step_up
        } else {
            tuning.ball_scale_step_down
        };
        let (min, max) = tuning.ball_radius_bounds(field);
        let radius = (ball.radius * step.powi(dir)).clamp(min, max);
        if radius == ball.radius {
            return None;
        }

        ball.radius = radius;
        log::debug!("Ball scaled to radius {:.1}", radius);
        Some(Rescaled {
            radius,
            cue_rate: (tuning.start_radius(field) / radius).sqrt(),
        })
    }
}
