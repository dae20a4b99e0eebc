//! Scoring detector
//!
//! A body has left through a side once its center is more than one radius
//! beyond that edge. For the main ball that is a goal for the opposite
//! player.

use super::body::{Body, BodyRegistry};
use super::player::{Player, Side};
use crate::tuning::FieldSize;

/// Side a body has fully exited through, if any
pub fn scoring_gate(body: &Body, field: FieldSize) -> Option<Side> {
    if body.pos.x < -body.radius {
        Some(Side::Left)
    } else if body.pos.x > field.width + body.radius {
        Some(Side::Right)
    } else {
        None
    }
}

/// A goal that was just scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal {
    /// Side the ball left through
    pub exit: Side,
    /// Player credited with the point
    pub scorer: Side,
    /// Scorer's score after the goal
    pub scorer_score: u32,
    /// Total goals scored before this one
    pub level: u32,
}

/// Check the main ball and, on exit, credit the receiving player and
/// remove the ball from play
///
/// Without a main ball there is nothing to check.
pub fn check_scoring(bodies: &mut BodyRegistry, players: &mut [Player; 2], field: FieldSize) -> Option<Goal> {
    let exit = scoring_gate(bodies.main_ball()?, field)?;
    let level = players.iter().map(|p| p.score).sum();
    let scorer = exit.opposite();

    let player = &mut players[scorer.index()];
    player.score += 1;
    bodies.remove_main_ball();

    log::info!(
        "Goal! {:?} scores through the {:?} gate ({}:{})",
        scorer,
        exit,
        players[0].score,
        players[1].score
    );

    Some(Goal {
        exit,
        scorer,
        scorer_score: players[scorer.index()].score,
        level,
    })
}
