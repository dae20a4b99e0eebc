//! Dynamic bodies and the registry that owns them
//!
//! Bodies are circles: one main ball while a round is running plus a fixed
//! number of power-up orbs. Iteration order is insertion order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable body identifier
pub type BodyId = u32;

/// What a body is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// The scoring ball
    MainBall,
    /// Power-up orb; `sign` is +1 (raise) or -1 (lower) the collector's power
    PowerUpOrb { sign: i32 },
}

impl BodyKind {
    /// Label drawn on the orb
    pub fn label(&self) -> Option<&'static str> {
        match self {
            BodyKind::MainBall => None,
            BodyKind::PowerUpOrb { sign } if *sign > 0 => Some("+"),
            BodyKind::PowerUpOrb { .. } => Some("-"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub radius: f32,
    pub density: f32,
}

impl Body {
    /// Effective mass (density × radius²)
    #[inline]
    pub fn mass(&self) -> f32 {
        self.density * self.radius * self.radius
    }

    #[inline]
    pub fn is_main_ball(&self) -> bool {
        self.kind == BodyKind::MainBall
    }

    /// Orb sign, or `None` for the main ball
    #[inline]
    pub fn orb_sign(&self) -> Option<i32> {
        match self.kind {
            BodyKind::PowerUpOrb { sign } => Some(sign),
            BodyKind::MainBall => None,
        }
    }
}

/// Ordered collection of the bodies currently in play
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    next_id: BodyId,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every body (ids keep increasing)
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn spawn(&mut self, kind: BodyKind, pos: Vec2, vel: Vec2, radius: f32, density: f32) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        self.bodies.push(Body {
            id,
            kind,
            pos,
            vel,
            radius,
            density,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    pub fn as_slice(&self) -> &[Body] {
        &self.bodies
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn main_ball(&self) -> Option<&Body> {
        self.bodies.iter().find(|b| b.is_main_ball())
    }

    pub fn main_ball_mut(&mut self) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.is_main_ball())
    }

    /// Remove the main ball, returning it if present
    pub fn remove_main_ball(&mut self) -> Option<Body> {
        let idx = self.bodies.iter().position(|b| b.is_main_ball())?;
        Some(self.bodies.remove(idx))
    }

    pub fn orbs(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| !b.is_main_ball())
    }

    pub fn orb_count(&self) -> usize {
        self.orbs().count()
    }

    pub fn main_ball_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_main_ball()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_ball_and_orb() -> BodyRegistry {
        let mut registry = BodyRegistry::new();
        registry.spawn(BodyKind::MainBall, Vec2::new(10.0, 10.0), Vec2::ZERO, 5.0, 2.0);
        registry.spawn(
            BodyKind::PowerUpOrb { sign: -1 },
            Vec2::new(50.0, 50.0),
            Vec2::ZERO,
            3.0,
            2.0,
        );
        registry
    }

    #[test]
    fn test_mass_is_density_times_radius_squared() {
        let registry = registry_with_ball_and_orb();
        assert_eq!(registry.main_ball().unwrap().mass(), 50.0);
    }

    #[test]
    fn test_remove_main_ball_keeps_orbs() {
        let mut registry = registry_with_ball_and_orb();
        let ball = registry.remove_main_ball().unwrap();
        assert!(ball.is_main_ball());
        assert_eq!(registry.main_ball_count(), 0);
        assert_eq!(registry.orb_count(), 1);
        assert!(registry.remove_main_ball().is_none());
    }

    #[test]
    fn test_ids_are_unique_across_clear() {
        let mut registry = registry_with_ball_and_orb();
        registry.clear();
        let id = registry.spawn(BodyKind::MainBall, Vec2::ZERO, Vec2::ZERO, 1.0, 1.0);
        assert_eq!(id, 2);
        assert!(registry.get(id).is_some());
    }

    #[test]
    fn test_orb_labels() {
        assert_eq!(BodyKind::PowerUpOrb { sign: 1 }.label(), Some("+"));
        assert_eq!(BodyKind::PowerUpOrb { sign: -1 }.label(), Some("-"));
        assert_eq!(BodyKind::MainBall.label(), None);
    }
}
