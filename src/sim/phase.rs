//! Game phase state machine
//!
//! Title → Ready → Play → Score → Ready → ... with no terminal state.
//! The phase can only change through the transition methods below; timed
//! transitions are countdowns advanced by [`PhaseMachine::update`].

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title shown, waiting for its timer
    Title,
    /// Waiting for any key
    Ready,
    /// Round in progress
    Play,
    /// Score shown, waiting for its timer
    Score,
}

#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: GamePhase,
    /// Seconds left before a timed transition (Title and Score only)
    timer: f32,
    score_delay: f32,
}

impl PhaseMachine {
    pub fn new(title_delay: f32, score_delay: f32) -> Self {
        Self {
            phase: GamePhase::Title,
            timer: title_delay,
            score_delay,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Seconds until the pending timed transition, if any
    pub fn time_remaining(&self) -> Option<f32> {
        match self.phase {
            GamePhase::Title | GamePhase::Score => Some(self.timer),
            GamePhase::Ready | GamePhase::Play => None,
        }
    }

    /// Advance timers; returns the new phase if a timed transition fired
    pub fn update(&mut self, dt: f32) -> Option<GamePhase> {
        match self.phase {
            GamePhase::Title | GamePhase::Score => {
                self.timer -= dt;
                if self.timer <= 0.0 {
                    self.timer = 0.0;
                    self.phase = GamePhase::Ready;
                    return Some(GamePhase::Ready);
                }
                None
            }
            GamePhase::Ready | GamePhase::Play => None,
        }
    }

    /// Ready → Play; refused from any other phase
    pub fn start_play(&mut self) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        self.phase = GamePhase::Play;
        true
    }

    /// Play → Score; refused from any other phase
    pub fn goal_scored(&mut self) -> bool {
        if self.phase != GamePhase::Play {
            return false;
        }
        self.phase = GamePhase::Score;
        self.timer = self.score_delay;
        true
    }
}
