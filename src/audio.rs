//! Sound cue catalogue
//!
//! The simulation never plays audio. It emits [`SoundCommand`]s which the
//! host forwards to whatever backend it has (Web Audio, rodio, nothing).

use serde::{Deserialize, Serialize};

use crate::sim::Side;

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// A goal was scored
    Score,
    /// Weapon firing (looping while held)
    Shoot,
    /// Ball changed size
    BallScale,
    /// Positive power-up collected
    PowerUp,
    /// Negative power-up collected
    PowerDown,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Score => "score",
            SoundCue::Shoot => "shoot",
            SoundCue::BallScale => "ballScale",
            SoundCue::PowerUp => "powerUp",
            SoundCue::PowerDown => "powerDown",
        }
    }

    /// Sample file the host is expected to load for this cue
    pub fn source(&self) -> &'static str {
        match self {
            SoundCue::Score => "Ship Bell.mp3",
            SoundCue::Shoot => "Water Leak.mp3",
            SoundCue::BallScale => "440Hz beep.mp3",
            SoundCue::PowerUp => "Bubble up.mp3",
            SoundCue::PowerDown => "Bubble down.mp3",
        }
    }

    /// Per-cue gain applied on top of the requested gain
    pub fn base_gain(&self) -> f32 {
        match self {
            SoundCue::Shoot => 0.9,
            _ => 1.0,
        }
    }

    pub fn looping(&self) -> bool {
        matches!(self, SoundCue::Shoot)
    }
}

/// Playback parameters for a cue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueParams {
    /// Stereo pan, -1 (left) to 1 (right)
    pub pan: f32,
    pub gain: f32,
    /// Playback rate (1 = original pitch)
    pub rate: f32,
}

impl Default for CueParams {
    fn default() -> Self {
        Self {
            pan: 0.0,
            gain: 1.0,
            rate: 1.0,
        }
    }
}

impl CueParams {
    pub fn panned(pan: f32) -> Self {
        Self {
            pan,
            ..Self::default()
        }
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }
}

/// Fire-and-forget requests for the audio backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SoundCommand {
    /// One-shot cue
    Play { cue: SoundCue, params: CueParams },
    /// Start a looping cue owned by a player
    StartLoop {
        side: Side,
        cue: SoundCue,
        params: CueParams,
    },
    /// Adjust the gain of a running loop
    SetLoopGain { side: Side, gain: f32 },
    /// Fade out and stop a running loop
    StopLoop { side: Side, fade: f32 },
    /// Start (or continue) the background music
    PlayMusic,
}

/// A player's looping cue instance
///
/// `start` and `stop` are idempotent: the backend only hears about
/// transitions and gain changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopingCue {
    pub cue: SoundCue,
    pub side: Side,
    playing: bool,
    gain: f32,
}

impl LoopingCue {
    pub fn new(cue: SoundCue, side: Side) -> Self {
        Self {
            cue,
            side,
            playing: false,
            gain: 1.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn start(&mut self, gain: f32) -> Option<SoundCommand> {
        if !self.playing {
            self.playing = true;
            self.gain = gain;
            return Some(SoundCommand::StartLoop {
                side: self.side,
                cue: self.cue,
                params: CueParams::panned(self.side.pan()).with_gain(gain),
            });
        }
        if (self.gain - gain).abs() > f32::EPSILON {
            self.gain = gain;
            return Some(SoundCommand::SetLoopGain {
                side: self.side,
                gain,
            });
        }
        None
    }

    pub fn stop(&mut self, fade: f32) -> Option<SoundCommand> {
        if !self.playing {
            return None;
        }
        self.playing = false;
        Some(SoundCommand::StopLoop {
            side: self.side,
            fade,
        })
    }
}
