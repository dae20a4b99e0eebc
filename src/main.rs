//! Scale Control - headless demo driver
//!
//! Runs a scripted match at 60 Hz and logs the events a real host would
//! dispatch to its fluid, audio and overlay backends.
//!
//! Usage: `scale-control [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
use scale_control::sim::{GameEvent, GamePhase, GameState, Side, TickInput, tick};
#[cfg(not(target_arch = "wasm32"))]
use scale_control::{FieldSize, Tuning};

#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: u32 = 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Scale Control (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    let mut state = GameState::new(seed, tuning, FieldSize::default());
    let mut stats = DemoStats::default();

    for frame in 0..DEMO_SECONDS * 60 {
        let input = scripted_input(&state, frame);
        tick(&mut state, &input, FRAME_DT);
        for event in state.drain_events() {
            stats.record(&event);
        }
    }

    log::info!(
        "Demo finished after {} frames: score {}:{}, {} ball scale(s), {} pickup(s), {} fluid command(s)",
        state.time_ticks,
        state.players[0].score,
        state.players[1].score,
        stats.scales,
        stats.pickups,
        stats.fluid_commands
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // A wasm host drives `tick` itself
}

/// Both players sweep their aim and fire in bursts; a key is pressed once a
/// second so every Ready phase ends promptly.
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(state: &GameState, frame: u32) -> TickInput {
    let mut input = TickInput {
        any_key: frame % 60 == 0,
        ..TickInput::default()
    };
    if state.phase() != GamePhase::Play {
        return input;
    }

    for side in Side::BOTH {
        let phase_offset = side.index() as u32 * 45;
        let sweep = (frame + phase_offset) / 90 % 2 == 0;
        let intent = input.player_mut(side);
        intent.turn_left = sweep;
        intent.turn_right = !sweep;
        intent.shoot = (frame + phase_offset) % 120 < 80;
    }
    input
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
struct DemoStats {
    scales: u32,
    pickups: u32,
    fluid_commands: u32,
}

#[cfg(not(target_arch = "wasm32"))]
impl DemoStats {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GoalScored { scorer, exit } => {
                log::info!("{:?} scored through the {:?} gate", scorer, exit);
            }
            GameEvent::PhaseChanged(phase) => log::info!("Phase: {:?}", phase),
            GameEvent::BallScaled { radius } => {
                self.scales += 1;
                log::debug!("Ball radius now {:.1}", radius);
            }
            GameEvent::PowerUpCollected { side, sign } => {
                self.pickups += 1;
                log::debug!("{:?} picked up a {:+} orb", side, sign);
            }
            GameEvent::Fluid(_) => self.fluid_commands += 1,
            other => log::trace!("{:?}", other),
        }
    }
}
