//! Data-driven game balance
//!
//! Every constant the simulation reads lives in [`Tuning`]. Defaults
//! reproduce the shipped game; a JSON file may override any subset.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Size of the playing field in pixels (y-up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: f32,
    pub height: f32,
}

impl FieldSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Dimension that fractional object sizes are measured against
    #[inline]
    pub fn base_dim(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.as_vec2() * 0.5
    }

    /// Both dimensions finite and positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for FieldSize {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Weapons ===
    pub weapon_length: f32,
    pub force_length: f32,
    pub force_width: f32,
    pub force_strength: f32,
    pub force_length_scale_step: f32,
    pub force_width_scale_step: f32,
    /// Radians per frame
    pub turn_speed: f32,
    /// Emitter anchors as fractions of the field, left then right
    pub player_anchors: [[f32; 2]; 2],
    /// Initial aim angles (radians), left then right
    pub player_start_angles: [f32; 2],

    // === Physics ===
    pub gravity: f32,
    pub border_bounce: f32,
    /// Advance positions by velocity each frame. Disable when the host's
    /// fluid field advects bodies itself.
    pub integrate_positions: bool,

    // === Goals ===
    pub gate_bottom: f32,
    pub gate_height: f32,
    pub gate_scale_step: f32,
    pub gate_glow_per_level: f32,

    // === Ball ===
    pub start_ball_radius: f32,
    pub max_ball_scale: f32,
    pub ball_scale_step_up: f32,
    pub ball_scale_step_down: f32,
    pub ball_scale_cooldown: f32,
    pub start_ball_position: [f32; 2],
    pub start_ball_velocity: [f32; 2],
    pub ball_density: f32,

    // === Power-ups ===
    pub num_power_ups: usize,
    pub power_up_radius: f32,
    pub power_up_density: f32,
    pub power_up_transition: f32,
    pub power_up_duration: f32,
    pub respawn_max_attempts: u32,
    /// Power level counts as settled once this close to its target
    pub power_epsilon: f32,

    // === Timers ===
    pub title_delay: f32,
    pub score_delay: f32,
    pub activity_interval: f32,
    pub shoot_fade: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            weapon_length: WEAPON_LENGTH,
            force_length: FORCE_LENGTH,
            force_width: FORCE_WIDTH,
            force_strength: FORCE_STRENGTH,
            force_length_scale_step: FORCE_LENGTH_SCALE_STEP,
            force_width_scale_step: FORCE_WIDTH_SCALE_STEP,
            turn_speed: TURN_SPEED,
            player_anchors: [[0.2, 0.02], [0.8, 0.02]],
            player_start_angles: [1.04, 2.09],

            gravity: GRAVITY,
            border_bounce: BORDER_BOUNCE,
            integrate_positions: true,

            gate_bottom: GATE_BOTTOM,
            gate_height: GATE_HEIGHT,
            gate_scale_step: GATE_SCALE_STEP,
            gate_glow_per_level: GATE_GLOW_PER_LEVEL,

            start_ball_radius: START_BALL_RADIUS,
            max_ball_scale: MAX_BALL_SCALE,
            ball_scale_step_up: BALL_SCALE_STEP_UP,
            ball_scale_step_down: BALL_SCALE_STEP_DOWN,
            ball_scale_cooldown: BALL_SCALE_COOLDOWN,
            start_ball_position: START_BALL_POSITION,
            start_ball_velocity: START_BALL_VELOCITY,
            ball_density: BALL_DENSITY,

            num_power_ups: NUM_POWER_UPS,
            power_up_radius: POWER_UP_RADIUS,
            power_up_density: POWER_UP_DENSITY,
            power_up_transition: POWER_UP_TRANSITION,
            power_up_duration: POWER_UP_DURATION,
            respawn_max_attempts: RESPAWN_MAX_ATTEMPTS,
            power_epsilon: 1e-4,

            title_delay: TITLE_DELAY,
            score_delay: SCORE_DELAY,
            activity_interval: ACTIVITY_INTERVAL,
            shoot_fade: SHOOT_FADE,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("weapon_length", self.weapon_length),
            ("force_length", self.force_length),
            ("force_width", self.force_width),
            ("force_length_scale_step", self.force_length_scale_step),
            ("force_width_scale_step", self.force_width_scale_step),
            ("gate_height", self.gate_height),
            ("gate_scale_step", self.gate_scale_step),
            ("start_ball_radius", self.start_ball_radius),
            ("ball_scale_step_up", self.ball_scale_step_up),
            ("ball_scale_step_down", self.ball_scale_step_down),
            ("ball_density", self.ball_density),
            ("power_up_radius", self.power_up_radius),
            ("power_up_density", self.power_up_density),
            ("power_up_transition", self.power_up_transition),
            ("power_epsilon", self.power_epsilon),
            ("title_delay", self.title_delay),
            ("score_delay", self.score_delay),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid {
                    name,
                    value,
                    expected: "a finite value > 0",
                });
            }
        }

        let non_negative = [
            ("force_strength", self.force_strength),
            ("turn_speed", self.turn_speed),
            ("gravity", self.gravity),
            ("gate_glow_per_level", self.gate_glow_per_level),
            ("ball_scale_cooldown", self.ball_scale_cooldown),
            ("power_up_duration", self.power_up_duration),
            ("activity_interval", self.activity_interval),
            ("shoot_fade", self.shoot_fade),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid {
                    name,
                    value,
                    expected: "a finite value >= 0",
                });
            }
        }

        if !(0.0..1.0).contains(&self.border_bounce) {
            return Err(TuningError::Invalid {
                name: "border_bounce",
                value: self.border_bounce,
                expected: "a value in [0, 1)",
            });
        }
        if self.max_ball_scale.is_nan() || self.max_ball_scale < 1.0 {
            return Err(TuningError::Invalid {
                name: "max_ball_scale",
                value: self.max_ball_scale,
                expected: "a value >= 1",
            });
        }
        if self.respawn_max_attempts == 0 {
            return Err(TuningError::Invalid {
                name: "respawn_max_attempts",
                value: 0.0,
                expected: "at least 1",
            });
        }
        Ok(())
    }

    /// Ball radius at match start (pixels)
    pub fn start_radius(&self, field: FieldSize) -> f32 {
        self.start_ball_radius * field.base_dim()
    }

    /// Smallest and largest radius the ball may scale to (pixels)
    pub fn ball_radius_bounds(&self, field: FieldSize) -> (f32, f32) {
        let start = self.start_radius(field);
        (start / self.max_ball_scale, start * self.max_ball_scale)
    }
}
