//! Player control model
//!
//! Each player owns a fixed emitter on the floor, an aim angle limited to
//! the upper half-plane, and a power level that scales both the shot and
//! that player's goal.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::{LoopingCue, SoundCue};
use crate::tuning::{FieldSize, Tuning};
use crate::{direction, field_point};

/// Which half of the field a player defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Stereo pan for cues attributed to this side
    #[inline]
    pub fn pan(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Dye color (RGB, 0-1)
    pub fn color(self) -> [f32; 3] {
        match self {
            Side::Left => [0.0, 0.1, 0.8],
            Side::Right => [0.8, 0.1, 0.0],
        }
    }

    /// Side whose half of the field contains `x`
    #[inline]
    pub fn nearest(x: f32, field: FieldSize) -> Side {
        if x < field.width / 2.0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Force request handed to the fluid field for one frame of shooting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Emitter tip position (field pixels)
    pub pos: Vec2,
    pub angle: f32,
    /// Force streak length (pixels)
    pub length: f32,
    /// Force streak width (pixels)
    pub width: f32,
    /// Velocity injected into the fluid
    pub force: Vec2,
    pub color: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct Player {
    pub side: Side,
    /// Aim angle in radians, always within [0, π]
    pub aim_angle: f32,
    /// Continuous power level, eased toward `target_power_level`
    pub power_level: f32,
    pub target_power_level: i32,
    /// Seconds until the target decays back to 0
    pub power_up_remaining: f32,
    pub score: u32,
    pub shoot_sfx: LoopingCue,
}

impl Player {
    pub fn new(side: Side, tuning: &Tuning) -> Self {
        Self {
            side,
            aim_angle: tuning.player_start_angles[side.index()].clamp(0.0, PI),
            power_level: 0.0,
            target_power_level: 0,
            power_up_remaining: 0.0,
            score: 0,
            shoot_sfx: LoopingCue::new(SoundCue::Shoot, side),
        }
    }

    /// Clear all power state (on entering play)
    pub fn reset_power(&mut self) {
        self.power_level = 0.0;
        self.target_power_level = 0;
        self.power_up_remaining = 0.0;
    }

    /// Rotate the weapon by `turn_speed * dir`, clamped to the upper half-plane
    pub fn turn(&mut self, dir: f32, turn_speed: f32) {
        let angle = self.aim_angle + turn_speed * dir;
        if angle.is_finite() {
            self.aim_angle = angle.clamp(0.0, PI);
        }
    }

    /// Emitter anchor on the field (pixels)
    pub fn anchor(&self, tuning: &Tuning, field: FieldSize) -> Vec2 {
        field_point(tuning.player_anchors[self.side.index()], field)
    }

    /// Visual scale of the weapon
    pub fn weapon_scale(&self) -> f32 {
        2f32.powf(self.power_level)
    }

    /// Where the weapon's drawn cross sits
    pub fn weapon_base(&self, tuning: &Tuning, field: FieldSize) -> Vec2 {
        self.anchor(tuning, field)
            + direction(self.aim_angle) * field.base_dim() * tuning.weapon_length
    }

    /// Force geometry for one frame of shooting at the current power level
    pub fn shot(&self, tuning: &Tuning, field: FieldSize) -> Shot {
        let base = field.base_dim();
        let dir = direction(self.aim_angle);
        let l = tuning.force_length * tuning.force_length_scale_step.powf(self.power_level);
        let w = tuning.force_width * tuning.force_width_scale_step.powf(self.power_level);
        Shot {
            pos: self.anchor(tuning, field) + dir * base * (tuning.weapon_length + l),
            angle: self.aim_angle,
            length: base * l,
            width: base * w,
            force: dir * base * tuning.force_strength,
            color: self.side.color(),
        }
    }

    /// Gain for the shoot loop; louder with more power
    pub fn shoot_gain(&self) -> f32 {
        self.power_level + 1.0
    }
}
