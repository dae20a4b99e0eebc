//! Power-up subsystem
//!
//! Orbs that leave through a side change that side's target power level
//! and are respawned elsewhere. Power levels then ease toward their target
//! and fall back to 0 once the pickup's duration runs out.

use glam::Vec2;
use rand::Rng;

use super::body::{BodyId, BodyRegistry};
use super::player::{Player, Side};
use super::scoring::scoring_gate;
use crate::audio::{CueParams, SoundCommand, SoundCue};
use crate::tuning::{FieldSize, Tuning};

/// An orb collected this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub orb: BodyId,
    pub side: Side,
    pub sign: i32,
    /// Where the orb was placed afterwards
    pub respawned_at: Vec2,
}

/// Apply a pickup to a player and return the cue to play
pub fn power_up(player: &mut Player, sign: i32, duration: f32) -> SoundCommand {
    player.target_power_level += sign;
    player.power_up_remaining = duration;
    let cue = if sign > 0 {
        SoundCue::PowerUp
    } else {
        SoundCue::PowerDown
    };
    SoundCommand::Play {
        cue,
        params: CueParams::panned(player.side.pan()),
    }
}

/// Uniform position in the field at least `radius + avoid.radius` from
/// `avoid.center`
///
/// Gives up after `max_attempts` rejected samples and returns the field
/// center; the second value reports whether that fallback was used.
pub fn respawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    field: FieldSize,
    radius: f32,
    avoid: Option<(Vec2, f32)>,
    max_attempts: u32,
) -> (Vec2, bool) {
    for _ in 0..max_attempts {
        let pos = Vec2::new(
            field.width * rng.random::<f32>(),
            field.height * rng.random::<f32>(),
        );
        match avoid {
            Some((center, avoid_radius)) if pos.distance(center) < avoid_radius + radius => continue,
            _ => return (pos, false),
        }
    }
    (field.center(), true)
}

/// Collect orbs that left the field and respawn them
///
/// The player on the side the orb left through is credited (right edge
/// powers the right player).
pub fn check_power_ups<R: Rng + ?Sized>(
    bodies: &mut BodyRegistry,
    players: &mut [Player; 2],
    tuning: &Tuning,
    field: FieldSize,
    rng: &mut R,
    sounds: &mut Vec<SoundCommand>,
) -> Vec<Pickup> {
    let avoid = bodies.main_ball().map(|b| (b.pos, b.radius));
    let mut pickups = Vec::new();

    for orb in bodies.iter_mut() {
        let Some(sign) = orb.orb_sign() else {
            continue;
        };
        let Some(side) = scoring_gate(orb, field) else {
            continue;
        };

        sounds.push(power_up(&mut players[side.index()], sign, tuning.power_up_duration));

        let (pos, fell_back) = respawn_position(rng, field, orb.radius, avoid, tuning.respawn_max_attempts);
        if fell_back {
            log::warn!(
                "Orb {} respawn gave up after {} attempts; using field center",
                orb.id,
                tuning.respawn_max_attempts
            );
        }
        orb.pos = pos;
        orb.vel = Vec2::ZERO;

        log::debug!(
            "{:?} collected a {} orb (target power {})",
            side,
            if sign > 0 { "+" } else { "-" },
            players[side.index()].target_power_level
        );
        pickups.push(Pickup {
            orb: orb.id,
            side,
            sign,
            respawned_at: pos,
        });
    }

    pickups
}

/// Step a player's power level toward its target without overshooting
fn ease_power(player: &mut Player, dt: f32, transition: f32, epsilon: f32) {
    let target = player.target_power_level as f32;
    let diff = target - player.power_level;
    let step = dt / transition;
    if diff.abs() <= epsilon.max(step) {
        player.power_level = target;
    } else {
        player.power_level += diff.signum() * step;
    }
}

/// Run power timers and easing for both players
pub fn power_up_update(players: &mut [Player; 2], dt: f32, tuning: &Tuning) {
    for player in players.iter_mut() {
        if player.power_up_remaining > 0.0 {
            player.power_up_remaining -= dt;
        } else {
            player.target_power_level = 0;
        }
        ease_power(player, dt, tuning.power_up_transition, tuning.power_epsilon);
    }
}
