//! Goal geometry
//!
//! Each side's goal is a vertical span of that side's wall. Its height is
//! `gate_height * gate_scale_step^power_level`, centered on a fixed line,
//! so it breathes continuously as the power level eases.

use serde::{Deserialize, Serialize};

use super::body::BodyRegistry;
use super::player::Side;
use crate::tuning::{FieldSize, Tuning};

/// X (as a field fraction from the goal wall) at which the gate starts glowing
const GLOW_SENSE_X: f32 = 0.3;
/// Orbs light the gate less than the main ball
const ORB_GLOW_WIDTH: f32 = 0.3;
/// Extra viewport height above and below the opening, as a fraction of it
const GLOW_OVERHANG: f32 = 0.4;

/// Vertical span of a goal, as fractions of field height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalOpening {
    pub bottom: f32,
    pub height: f32,
}

impl GoalOpening {
    #[inline]
    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }

    #[inline]
    pub fn bottom_px(&self, field: FieldSize) -> f32 {
        self.bottom * field.height
    }

    #[inline]
    pub fn top_px(&self, field: FieldSize) -> f32 {
        self.top() * field.height
    }

    /// Whether `y` (pixels) lies strictly between the rims
    #[inline]
    pub fn contains_y(&self, y: f32, field: FieldSize) -> bool {
        y > self.bottom_px(field) && y < self.top_px(field)
    }
}

/// Goal opening for a player at the given power level
pub fn goal_opening(tuning: &Tuning, power_level: f32) -> GoalOpening {
    let height = tuning.gate_height * tuning.gate_scale_step.powf(power_level);
    GoalOpening {
        bottom: tuning.gate_bottom + tuning.gate_height / 2.0 - height / 2.0,
        height,
    }
}

/// Render parameters for a goal's glow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateGlow {
    pub side: Side,
    /// Glow strength, 0-1
    pub width: f32,
    /// 1 while every body is inside the field, falling to 0 as one leaves
    pub color_mix: f32,
    /// Vertical viewport span (pixels) the glow is drawn into
    pub viewport_bottom: f32,
    pub viewport_height: f32,
}

/// Glow for one goal, or `None` when it would be invisible
pub fn gate_glow(
    side: Side,
    bodies: &BodyRegistry,
    power_level: f32,
    tuning: &Tuning,
    field: FieldSize,
) -> Option<GateGlow> {
    let mut width = (tuning.gate_glow_per_level * power_level.abs()).min(1.0);
    let mut color_mix: f32 = 1.0;

    for body in bodies.iter() {
        let dist = match side {
            Side::Left => body.pos.x,
            Side::Right => field.width - body.pos.x,
        };
        let x = dist / field.width;
        let scale = if body.is_main_ball() { 1.0 } else { ORB_GLOW_WIDTH };
        width = width.max((1.0 - x / GLOW_SENSE_X).min(1.0) * scale);
        color_mix = color_mix.min(1.0 - (-x / (body.radius / field.width)).max(0.0));
    }

    if width <= 0.0 {
        return None;
    }

    let opening = goal_opening(tuning, power_level);
    Some(GateGlow {
        side,
        width,
        color_mix: color_mix.max(0.0),
        viewport_bottom: field.height * (opening.bottom - opening.height * GLOW_OVERHANG),
        viewport_height: field.height * opening.height * (1.0 + 2.0 * GLOW_OVERHANG),
    })
}
