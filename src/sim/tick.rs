//! Per-frame simulation tick
//!
//! The host calls [`tick`] once per fluid step with the intents gathered
//! since the last frame, then drains [`GameState::drain_events`].

use super::collision::integrate;
use super::events::GameEvent;
use super::player::Side;
use super::powerup::power_up_update;
use super::scoring::check_scoring;
use super::state::GameState;
use crate::audio::{CueParams, SoundCommand, SoundCue};
use crate::consts::MAX_FRAME_DT;

/// Held intents for one player
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// Rotate the weapon counterclockwise
    pub turn_left: bool,
    /// Rotate the weapon clockwise
    pub turn_right: bool,
    pub shoot: bool,
}

impl PlayerInput {
    fn turn_dir(&self) -> f32 {
        match (self.turn_left, self.turn_right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held state, indexed by [`Side::index`]
    pub players: [PlayerInput; 2],
    /// A key or tap other than the debug toggles was pressed
    pub any_key: bool,
    pub toggle_pause: bool,
    pub toggle_bodies: bool,
    pub cycle_view: bool,
}

impl TickInput {
    pub fn player(&self, side: Side) -> &PlayerInput {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut PlayerInput {
        &mut self.players[side.index()]
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };

    // Debug toggles never count as "any key"
    if input.cycle_view {
        state.cycle_view();
    }
    if input.toggle_pause {
        state.toggle_pause();
    }
    if input.toggle_bodies {
        state.toggle_bodies();
    }

    for side in Side::BOTH {
        if input.player(side).shoot {
            state.dismiss_hint(side);
        }
    }
    if input.any_key {
        state.any_key();
    }

    for side in Side::BOTH {
        let intent = input.player(side);
        let dir = intent.turn_dir();
        if dir != 0.0 {
            state.turn(side, dir);
        }
        if intent.shoot {
            state.shoot(side);
        } else {
            state.stop_shooting(side);
        }
    }

    update(state, dt);

    state.ball_scaler.update(dt);
    state.update_timers(dt);
    state.time_ticks += 1;
}

/// Body physics, scoring and power-ups for one frame
///
/// Does nothing unless a round is in play and the simulation is running.
pub fn update(state: &mut GameState, dt: f32) {
    if !state.is_simulating() || dt <= 0.0 {
        return;
    }

    let openings = state.openings();
    let report = integrate(&mut state.bodies, &openings, state.field, &state.tuning, dt);

    if let Some(dir) = report.scale_request {
        scale_ball(state, dir);
    }

    if let Some(goal) = check_scoring(&mut state.bodies, &mut state.players, state.field) {
        state.enter_score(goal);
        return;
    }

    state.collect_power_ups();
    power_up_update(&mut state.players, dt, &state.tuning);
}

fn scale_ball(state: &mut GameState, dir: i32) {
    let Some(ball) = state.bodies.main_ball_mut() else {
        return;
    };
    let Some(rescaled) = state.ball_scaler.scale(ball, dir, &state.tuning, state.field) else {
        return;
    };
    state.emit(GameEvent::BallScaled {
        radius: rescaled.radius,
    });
    state.emit(SoundCommand::Play {
        cue: SoundCue::BallScale,
        params: CueParams::default().with_rate(rescaled.cue_rate),
    });
}
