//! Output events
//!
//! The simulation appends requests for its collaborators (audio, fluid
//! field, overlay, telemetry) to a queue during a tick. The host drains
//! and dispatches them afterwards; nothing here waits on the outcome.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::phase::GamePhase;
use super::player::Side;
use crate::audio::SoundCommand;

/// Field the fluid renderer displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FluidView {
    #[default]
    Dye,
    Velocity,
    Pressure,
    Divergence,
    Curl,
}

impl FluidView {
    pub fn next(self) -> Self {
        match self {
            FluidView::Dye => FluidView::Velocity,
            FluidView::Velocity => FluidView::Pressure,
            FluidView::Pressure => FluidView::Divergence,
            FluidView::Divergence => FluidView::Curl,
            FluidView::Curl => FluidView::Dye,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FluidView::Dye => "dye",
            FluidView::Velocity => "velocity",
            FluidView::Pressure => "pressure",
            FluidView::Divergence => "divergence",
            FluidView::Curl => "curl",
        }
    }
}

/// Requests for the fluid field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FluidCommand {
    /// Paint dye along a streak
    SetDye {
        pos: Vec2,
        angle: f32,
        length: f32,
        width: f32,
        color: [f32; 3],
    },
    /// Inject velocity along a streak
    SetVelocity {
        pos: Vec2,
        angle: f32,
        length: f32,
        width: f32,
        force: Vec2,
    },
    /// Clear the field
    Reset,
    SetPaused(bool),
    SetView(FluidView),
}

/// Overlay text the host shows or fades out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Note {
    /// "Scale Control: A Liquid Experience"
    Title,
    /// "press any key"
    AnyKey,
    /// Control hint for one player
    Instructions(Side),
    /// One player's score
    Score { side: Side, value: u32 },
    ScoreDivider,
    /// Name of the fluid view just selected
    FluidView(FluidView),
}

impl Note {
    /// Text for notes whose content is fixed
    pub fn text(&self) -> String {
        match self {
            Note::Title => "Scale Control: A Liquid Experience".to_string(),
            Note::AnyKey => "press any key".to_string(),
            Note::Instructions(Side::Left) => "A W D".to_string(),
            Note::Instructions(Side::Right) => "← ↑ →".to_string(),
            Note::Score { value, .. } => value.to_string(),
            Note::ScoreDivider => ":".to_string(),
            Note::FluidView(view) => view.as_str().to_string(),
        }
    }
}

/// Coarse lifecycle events for analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    /// A round started; `level` is total goals so far
    LevelStart { level: u32 },
    /// A round ended; `level` is total goals before this one
    LevelEnd { level: u32 },
    /// A player scored; `level` is that player's new score
    LevelUp { side: Side, level: u32 },
    /// Rate-limited activity heartbeat
    Play,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCommand),
    Fluid(FluidCommand),
    ShowNote(Note),
    HideNote(Note),
    Telemetry(TelemetryEvent),
    PhaseChanged(GamePhase),
    /// Main ball changed size
    BallScaled { radius: f32 },
    GoalScored { scorer: Side, exit: Side },
    PowerUpCollected { side: Side, sign: i32 },
}

impl From<SoundCommand> for GameEvent {
    fn from(cmd: SoundCommand) -> Self {
        GameEvent::Sound(cmd)
    }
}

impl From<FluidCommand> for GameEvent {
    fn from(cmd: FluidCommand) -> Self {
        GameEvent::Fluid(cmd)
    }
}

impl From<TelemetryEvent> for GameEvent {
    fn from(event: TelemetryEvent) -> Self {
        GameEvent::Telemetry(event)
    }
}
