//! Frame-driven simulation
//!
//! Everything here is independent of rendering, audio and input devices:
//! - Timers count down by the frame `dt`, never wall-clock time
//! - Orb placement uses the seeded RNG in [`GameState`]
//! - Side effects leave as [`GameEvent`]s for the host to dispatch

pub mod body;
pub mod collision;
pub mod events;
pub mod goal;
pub mod phase;
pub mod player;
pub mod powerup;
pub mod scale;
pub mod scoring;
pub mod state;
pub mod tick;

pub use body::{Body, BodyId, BodyKind, BodyRegistry};
pub use collision::{CollisionResult, ContactSource, StepReport, integrate};
pub use events::{FluidCommand, FluidView, GameEvent, Note, TelemetryEvent};
pub use goal::{GateGlow, GoalOpening, gate_glow, goal_opening};
pub use phase::GamePhase;
pub use player::{Player, Shot, Side};
pub use powerup::{Pickup, power_up_update};
pub use scale::BallScaler;
pub use scoring::{Goal, scoring_gate};
pub use state::GameState;
pub use tick::{PlayerInput, TickInput, tick, update};
