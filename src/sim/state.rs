//! Simulation context
//!
//! Everything that changes between frames lives in [`GameState`]: players,
//! the body registry, the phase machine, debug toggles and the outgoing
//! event queue. The host owns one instance and passes it to `tick`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::{BodyKind, BodyRegistry};
use super::events::{FluidCommand, FluidView, GameEvent, Note, TelemetryEvent};
use super::goal::{GateGlow, GoalOpening, gate_glow, goal_opening};
use super::phase::{GamePhase, PhaseMachine};
use super::player::{Player, Side};
use super::powerup::{Pickup, check_power_ups, respawn_position};
use super::scale::BallScaler;
use super::scoring::Goal;
use crate::audio::{CueParams, LoopingCue, SoundCommand, SoundCue};
use crate::field_point;
use crate::tuning::{FieldSize, Tuning};

#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the orb RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    pub field: FieldSize,
    pub players: [Player; 2],
    pub bodies: BodyRegistry,
    pub ball_scaler: BallScaler,
    /// Whether the fluid and body physics advance
    pub simulation_running: bool,
    /// Renderer hint toggled from the debug keys
    pub bodies_visible: bool,
    pub fluid_view: FluidView,
    /// Frames ticked since creation
    pub time_ticks: u64,
    rng: Pcg32,
    phase: PhaseMachine,
    /// Instruction hints are only offered on the first round
    hints_offered: bool,
    hints_visible: [bool; 2],
    /// Seconds until another activity heartbeat may be sent
    activity_cooldown: f32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game in the Title phase
    pub fn new(seed: u64, tuning: Tuning, field: FieldSize) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Tuning::default()
            }
        };
        let field = if field.is_valid() {
            field
        } else {
            log::warn!(
                "Invalid field size {}x{}, using {}x{}",
                field.width,
                field.height,
                FieldSize::default().width,
                FieldSize::default().height
            );
            FieldSize::default()
        };
        let players = [Player::new(Side::Left, &tuning), Player::new(Side::Right, &tuning)];
        let phase = PhaseMachine::new(tuning.title_delay, tuning.score_delay);
        let mut state = Self {
            seed,
            tuning,
            field,
            players,
            bodies: BodyRegistry::new(),
            ball_scaler: BallScaler::new(),
            simulation_running: false,
            bodies_visible: true,
            fluid_view: FluidView::default(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            phase,
            hints_offered: false,
            hints_visible: [false; 2],
            activity_cooldown: 0.0,
            events: Vec::new(),
        };
        state.emit(GameEvent::ShowNote(Note::Title));
        log::info!("Game created (seed {}, field {}x{})", seed, field.width, field.height);
        state
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase.phase()
    }

    /// Seconds until the pending timed phase change, if any
    pub fn phase_time_remaining(&self) -> Option<f32> {
        self.phase.time_remaining()
    }

    /// Physics, scoring and power-ups only run while this holds
    pub fn is_simulating(&self) -> bool {
        self.phase() == GamePhase::Play && self.simulation_running
    }

    pub(crate) fn emit(&mut self, event: impl Into<GameEvent>) {
        self.events.push(event.into());
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Credit orbs that left the field, respawn them and queue their cues
    pub(crate) fn collect_power_ups(&mut self) -> Vec<Pickup> {
        let mut sounds = Vec::new();
        let pickups = check_power_ups(
            &mut self.bodies,
            &mut self.players,
            &self.tuning,
            self.field,
            &mut self.rng,
            &mut sounds,
        );
        for cmd in sounds {
            self.emit(cmd);
        }
        for pickup in &pickups {
            self.emit(GameEvent::PowerUpCollected {
                side: pickup.side,
                sign: pickup.sign,
            });
        }
        pickups
    }

    /// Host resized the field; non-positive or non-finite sizes are ignored
    pub fn set_field_size(&mut self, field: FieldSize) {
        if !field.is_valid() {
            log::warn!("Ignoring invalid field size {}x{}", field.width, field.height);
            return;
        }
        self.field = field;
    }

    /// Goal openings for both sides at the current power levels
    pub fn openings(&self) -> [GoalOpening; 2] {
        [
            goal_opening(&self.tuning, self.players[0].power_level),
            goal_opening(&self.tuning, self.players[1].power_level),
        ]
    }

    pub fn gate_glow(&self, side: Side) -> Option<GateGlow> {
        gate_glow(
            side,
            &self.bodies,
            self.players[side.index()].power_level,
            &self.tuning,
            self.field,
        )
    }

    pub fn total_goals(&self) -> u32 {
        self.players.iter().map(|p| p.score).sum()
    }

    pub fn hint_visible(&self, side: Side) -> bool {
        self.hints_visible[side.index()]
    }

    /// Start a round right away; only honoured from Ready
    pub fn start_match(&mut self) -> bool {
        self.enter_play()
    }

    /// A non-debug key or tap
    ///
    /// Sends a rate-limited heartbeat and starts a round when Ready.
    pub fn any_key(&mut self) {
        if self.phase() == GamePhase::Ready {
            self.enter_play();
        }
        if self.activity_cooldown <= 0.0 {
            self.activity_cooldown = self.tuning.activity_interval;
            self.emit(TelemetryEvent::Play);
        }
    }

    /// Advance phase and heartbeat timers
    pub(crate) fn update_timers(&mut self, dt: f32) {
        if self.activity_cooldown > 0.0 {
            self.activity_cooldown -= dt;
        }
        if self.phase.update(dt) == Some(GamePhase::Ready) {
            self.enter_ready();
        }
    }

    pub fn turn(&mut self, side: Side, dir: f32) {
        if self.phase() != GamePhase::Play {
            return;
        }
        let turn_speed = self.tuning.turn_speed;
        self.players[side.index()].turn(dir, turn_speed);
    }

    /// One frame of shooting: fluid impulse, dye, and the shoot loop
    pub fn shoot(&mut self, side: Side) {
        if self.phase() != GamePhase::Play {
            return;
        }
        let player = &mut self.players[side.index()];
        let shot = player.shot(&self.tuning, self.field);
        let gain = player.shoot_gain();
        let sfx = player.shoot_sfx.start(gain);

        self.emit(FluidCommand::SetDye {
            pos: shot.pos,
            angle: shot.angle,
            length: shot.length,
            width: shot.width,
            color: shot.color,
        });
        self.emit(FluidCommand::SetVelocity {
            pos: shot.pos,
            angle: shot.angle,
            length: shot.length,
            width: shot.width,
            force: shot.force,
        });
        if let Some(cmd) = sfx {
            self.emit(cmd);
        }
    }

    pub fn stop_shooting(&mut self, side: Side) {
        let fade = self.tuning.shoot_fade;
        if let Some(cmd) = self.players[side.index()].shoot_sfx.stop(fade) {
            self.emit(cmd);
        }
    }

    /// Hide a side's control hint once that player has found the shoot key
    pub(crate) fn dismiss_hint(&mut self, side: Side) {
        if self.hints_visible[side.index()] {
            self.hints_visible[side.index()] = false;
            self.emit(GameEvent::HideNote(Note::Instructions(side)));
        }
    }

    pub fn toggle_pause(&mut self) {
        self.simulation_running = !self.simulation_running;
        self.emit(FluidCommand::SetPaused(!self.simulation_running));
        log::info!("Simulation {}", if self.simulation_running { "resumed" } else { "paused" });
    }

    pub fn toggle_bodies(&mut self) {
        self.bodies_visible = !self.bodies_visible;
    }

    pub fn cycle_view(&mut self) {
        self.fluid_view = self.fluid_view.next();
        let view = self.fluid_view;
        self.emit(FluidCommand::SetView(view));
        self.emit(GameEvent::ShowNote(Note::FluidView(view)));
        self.emit(GameEvent::HideNote(Note::FluidView(view)));
        log::debug!("Fluid view: {}", view.as_str());
    }

    fn enter_ready(&mut self) {
        self.emit(GameEvent::PhaseChanged(GamePhase::Ready));
        self.emit(GameEvent::ShowNote(Note::AnyKey));
        log::info!("Ready");
    }

    /// Ready → Play: reset the round and start the fluid
    fn enter_play(&mut self) -> bool {
        if !self.phase.start_play() {
            return false;
        }
        self.emit(GameEvent::PhaseChanged(GamePhase::Play));

        self.emit(GameEvent::HideNote(Note::Title));
        for side in Side::BOTH {
            let value = self.players[side.index()].score;
            self.emit(GameEvent::HideNote(Note::Score { side, value }));
        }
        self.emit(GameEvent::HideNote(Note::ScoreDivider));
        self.emit(GameEvent::HideNote(Note::AnyKey));
        if !self.hints_offered {
            self.hints_offered = true;
            for side in Side::BOTH {
                self.hints_visible[side.index()] = true;
                self.emit(GameEvent::ShowNote(Note::Instructions(side)));
            }
        }

        for side in Side::BOTH {
            let player = &mut self.players[side.index()];
            player.reset_power();
            let old = std::mem::replace(&mut player.shoot_sfx, LoopingCue::new(SoundCue::Shoot, side));
            if old.is_playing() {
                self.emit(SoundCommand::StopLoop { side, fade: 0.0 });
            }
        }

        self.spawn_bodies();
        self.ball_scaler.reset();

        self.emit(FluidCommand::Reset);
        if !self.simulation_running {
            self.simulation_running = true;
            self.emit(FluidCommand::SetPaused(false));
        }
        self.emit(SoundCommand::PlayMusic);
        let level = self.total_goals();
        self.emit(TelemetryEvent::LevelStart { level });
        log::info!("Round {} started", level + 1);
        true
    }

    /// Main ball at its start position plus freshly placed orbs
    fn spawn_bodies(&mut self) {
        let field = self.field;
        let t = &self.tuning;
        self.bodies.clear();
        let ball_pos = field_point(t.start_ball_position, field);
        let ball_radius = t.start_radius(field);
        self.bodies.spawn(
            BodyKind::MainBall,
            ball_pos,
            field_point(t.start_ball_velocity, field),
            ball_radius,
            t.ball_density,
        );

        for i in 0..t.num_power_ups {
            let sign = if i % 2 == 0 { 1 } else { -1 };
            let (pos, fell_back) = respawn_position(
                &mut self.rng,
                field,
                t.power_up_radius,
                Some((ball_pos, ball_radius)),
                t.respawn_max_attempts,
            );
            if fell_back {
                log::warn!("Orb placement gave up after {} attempts", t.respawn_max_attempts);
            }
            self.bodies.spawn(
                BodyKind::PowerUpOrb { sign },
                pos,
                Vec2::ZERO,
                t.power_up_radius,
                t.power_up_density,
            );
        }
    }

    /// Play → Score after the detector credited a goal
    pub(crate) fn enter_score(&mut self, goal: Goal) -> bool {
        if !self.phase.goal_scored() {
            return false;
        }
        self.emit(GameEvent::PhaseChanged(GamePhase::Score));
        self.emit(TelemetryEvent::LevelEnd { level: goal.level });
        self.emit(TelemetryEvent::LevelUp {
            side: goal.scorer,
            level: goal.scorer_score,
        });
        self.emit(SoundCommand::Play {
            cue: SoundCue::Score,
            params: CueParams::panned(goal.exit.pan()),
        });
        self.emit(GameEvent::GoalScored {
            scorer: goal.scorer,
            exit: goal.exit,
        });

        for side in Side::BOTH {
            let value = self.players[side.index()].score;
            self.emit(GameEvent::ShowNote(Note::Score { side, value }));
            self.stop_shooting(side);
        }
        self.emit(GameEvent::ShowNote(Note::ScoreDivider));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_state() -> GameState {
        let mut state = GameState::new(42, Tuning::default(), FieldSize::new(1000.0, 600.0));
        state.update_timers(state.tuning.title_delay);
        state.drain_events();
        state
    }

    #[test]
    fn test_new_state_shows_title() {
        let state = GameState::new(1, Tuning::default(), FieldSize::default());
        assert_eq!(state.phase(), GamePhase::Title);
        assert_eq!(state.events(), &[GameEvent::ShowNote(Note::Title)]);
        assert!(state.bodies.is_empty());
        assert!(!state.is_simulating());
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        let tuning = Tuning {
            respawn_max_attempts: 0,
            ..Tuning::default()
        };
        let state = GameState::new(1, tuning, FieldSize::default());
        assert_eq!(state.tuning, Tuning::default());
    }

    #[test]
    fn test_invalid_field_falls_back_to_default() {
        for field in [FieldSize::new(0.0, 600.0), FieldSize::new(f32::NAN, 600.0)] {
            let state = GameState::new(1, Tuning::default(), field);
            assert_eq!(state.field, FieldSize::default());
        }
    }

    #[test]
    fn test_start_match_refused_from_title() {
        let mut state = GameState::new(1, Tuning::default(), FieldSize::default());
        assert!(!state.start_match());
        state.any_key();
        assert_eq!(state.phase(), GamePhase::Title);
    }

    #[test]
    fn test_entering_play_resets_round() {
        let mut state = ready_state();
        state.players[0].target_power_level = 3;
        state.players[1].power_level = -1.5;
        state.players[0].score = 2;

        assert!(state.start_match());
        assert_eq!(state.phase(), GamePhase::Play);
        assert!(state.is_simulating());
        assert_eq!(state.players[0].target_power_level, 0);
        assert_eq!(state.players[1].power_level, 0.0);
        assert_eq!(state.players[0].score, 2, "score survives rounds");

        assert_eq!(state.bodies.main_ball_count(), 1);
        assert_eq!(state.bodies.orb_count(), state.tuning.num_power_ups);
        let signs: Vec<i32> = state.bodies.orbs().filter_map(|b| b.orb_sign()).collect();
        assert_eq!(signs, vec![1, -1]);
        let ball = state.bodies.main_ball().unwrap();
        assert_eq!(ball.pos, Vec2::new(500.0, 150.0));
        assert_eq!(ball.vel, Vec2::new(0.0, 120.0));
        assert!((ball.radius - 30.0).abs() < 1e-4);

        let events = state.events();
        assert!(events.contains(&GameEvent::Fluid(FluidCommand::Reset)));
        assert!(events.contains(&GameEvent::Fluid(FluidCommand::SetPaused(false))));
        assert!(events.contains(&GameEvent::Sound(SoundCommand::PlayMusic)));
        assert!(events.contains(&GameEvent::Telemetry(TelemetryEvent::LevelStart { level: 2 })));
        assert!(events.contains(&GameEvent::ShowNote(Note::Instructions(Side::Left))));
    }

    #[test]
    fn test_hints_only_on_first_round() {
        let mut state = ready_state();
        state.start_match();
        state.dismiss_hint(Side::Left);
        assert!(!state.hint_visible(Side::Left));
        assert!(state.hint_visible(Side::Right));

        let goal = Goal {
            exit: Side::Left,
            scorer: Side::Right,
            scorer_score: 1,
            level: 0,
        };
        assert!(state.enter_score(goal));
        state.update_timers(state.tuning.score_delay);
        state.drain_events();
        state.start_match();
        assert!(
            !state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::ShowNote(Note::Instructions(_))))
        );
    }

    #[test]
    fn test_shoot_ignored_outside_play() {
        let mut state = ready_state();
        state.shoot(Side::Left);
        state.turn(Side::Left, 1.0);
        assert!(state.events().is_empty());
        assert_eq!(state.players[0].aim_angle, state.tuning.player_start_angles[0]);
    }

    #[test]
    fn test_shoot_emits_fluid_and_loop_once() {
        let mut state = ready_state();
        state.start_match();
        state.drain_events();

        state.shoot(Side::Right);
        state.shoot(Side::Right);
        let events = state.drain_events();
        let dyes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Fluid(FluidCommand::SetDye { .. })))
            .count();
        let loops = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Sound(SoundCommand::StartLoop { side: Side::Right, .. })))
            .count();
        assert_eq!(dyes, 2);
        assert_eq!(loops, 1);

        state.stop_shooting(Side::Right);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Sound(SoundCommand::StopLoop {
                side: Side::Right,
                fade: 0.5
            })]
        );
    }

    #[test]
    fn test_heartbeat_is_rate_limited() {
        let mut state = GameState::new(1, Tuning::default(), FieldSize::default());
        state.drain_events();
        let heartbeats = |events: &[GameEvent]| {
            events
                .iter()
                .filter(|e| **e == GameEvent::Telemetry(TelemetryEvent::Play))
                .count()
        };
        state.any_key();
        state.any_key();
        assert_eq!(heartbeats(&state.drain_events()), 1);
        state.update_timers(10.5);
        state.any_key();
        assert_eq!(heartbeats(&state.drain_events()), 1);
    }

    #[test]
    fn test_cycle_view_and_toggles() {
        let mut state = GameState::new(1, Tuning::default(), FieldSize::default());
        state.drain_events();
        state.cycle_view();
        assert_eq!(state.fluid_view, FluidView::Velocity);
        assert_eq!(
            state.drain_events()[0],
            GameEvent::Fluid(FluidCommand::SetView(FluidView::Velocity))
        );
        state.toggle_bodies();
        assert!(!state.bodies_visible);
        state.toggle_pause();
        assert!(state.simulation_running);
        assert_eq!(state.phase(), GamePhase::Title);
    }

    #[test]
    fn test_set_field_size_rejects_degenerate() {
        let mut state = GameState::new(1, Tuning::default(), FieldSize::new(800.0, 600.0));
        state.set_field_size(FieldSize::new(0.0, 600.0));
        state.set_field_size(FieldSize::new(f32::NAN, 600.0));
        assert_eq!(state.field, FieldSize::new(800.0, 600.0));
        state.set_field_size(FieldSize::new(1024.0, 768.0));
        assert_eq!(state.field.width, 1024.0);
    }
}
