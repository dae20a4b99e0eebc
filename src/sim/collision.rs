//! Collision detection and response
//!
//! Every frame each body gathers a handful of candidate contact points:
//! the nearest floor/ceiling, either the nearest side wall or the two rims
//! of the goal it is lined up with, and every other body. Contacts closer
//! than the collision distance push the body out and, if closing, add an
//! elastic impulse weighted by the mass ratio. Screen edges are half-planes
//! with a fixed inward normal; rims and bodies are points.
//!
//! All deltas are computed against the pre-frame snapshot and applied at
//! the end, so the result does not depend on body order.

use glam::Vec2;

use super::body::{Body, BodyRegistry};
use super::goal::GoalOpening;
use super::player::Side;
use crate::consts::STATIC_MASS;
use crate::tuning::{FieldSize, Tuning};

/// Where a candidate contact point came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSource {
    /// Bottom screen edge (y = 0)
    Floor,
    /// Top screen edge (y = height)
    Ceiling,
    /// Left or right screen edge outside the goal opening
    Wall(Side),
    /// Top or bottom rim of a goal opening
    GoalRim(Side),
    /// Another body, by index into the frame snapshot
    Body(usize),
}

impl ContactSource {
    /// Unit normal pointing into the field for the four static edges
    ///
    /// Edges are half-planes: a body is tested against the whole line, not
    /// the candidate point, so one whose center is already past the edge is
    /// still pushed back in.
    pub fn edge_inward(&self) -> Option<Vec2> {
        match self {
            ContactSource::Floor => Some(Vec2::Y),
            ContactSource::Ceiling => Some(Vec2::NEG_Y),
            ContactSource::Wall(Side::Left) => Some(Vec2::X),
            ContactSource::Wall(Side::Right) => Some(Vec2::NEG_X),
            ContactSource::GoalRim(_) | ContactSource::Body(_) => None,
        }
    }
}

/// A point a body may collide with this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub pos: Vec2,
    pub source: ContactSource,
}

/// Result of a contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the body overlaps the point
    pub hit: bool,
    /// Unit vector from the body center toward the point
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Per-body changes accumulated over one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyDelta {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Side effects of one integration step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Scale direction requested by the main ball touching the floor (+1)
    /// or ceiling (-1)
    pub scale_request: Option<i32>,
    /// Contacts skipped because the centers coincided
    pub degenerate_contacts: usize,
}

/// Candidate contact points for `snapshot[idx]`
pub fn collision_points(
    idx: usize,
    snapshot: &[Body],
    openings: &[GoalOpening; 2],
    field: FieldSize,
) -> Vec<ContactPoint> {
    let body = &snapshot[idx];
    let Vec2 { x, y } = body.pos;
    let near_side = Side::nearest(x, field);
    let near_x = match near_side {
        Side::Left => 0.0,
        Side::Right => field.width,
    };

    let mut points = Vec::with_capacity(snapshot.len() + 2);

    // Floor or ceiling, whichever is closer
    points.push(if y < field.height / 2.0 {
        ContactPoint {
            pos: Vec2::new(x, 0.0),
            source: ContactSource::Floor,
        }
    } else {
        ContactPoint {
            pos: Vec2::new(x, field.height),
            source: ContactSource::Ceiling,
        }
    });

    // Goal rims when lined up with the opening, the side wall otherwise
    let opening = openings[near_side.index()];
    if opening.contains_y(y, field) {
        for rim_y in [opening.bottom_px(field), opening.top_px(field)] {
            points.push(ContactPoint {
                pos: Vec2::new(near_x, rim_y),
                source: ContactSource::GoalRim(near_side),
            });
        }
    } else {
        points.push(ContactPoint {
            pos: Vec2::new(near_x, y),
            source: ContactSource::Wall(near_side),
        });
    }

    for (other_idx, other) in snapshot.iter().enumerate() {
        if other_idx != idx {
            points.push(ContactPoint {
                pos: other.pos,
                source: ContactSource::Body(other_idx),
            });
        }
    }

    points
}

/// Check a body (center `pos`) against a point at `col_dist`
///
/// Coincident centers have no usable normal and count as a miss.
pub fn check_contact(pos: Vec2, point: Vec2, col_dist: f32) -> CollisionResult {
    let delta = point - pos;
    let dist = delta.length();
    if !dist.is_finite() || dist >= col_dist || dist <= f32::EPSILON {
        return CollisionResult::miss();
    }
    CollisionResult {
        hit: true,
        normal: delta / dist,
        penetration: col_dist - dist,
    }
}

/// Check a body of `radius` against a static edge
///
/// `signed_dist` is the distance from the edge line to the body center,
/// negative once the center has crossed it. The returned normal points out
/// of the field whatever side of the line the center is on.
pub fn check_edge(signed_dist: f32, inward: Vec2, radius: f32) -> CollisionResult {
    if !signed_dist.is_finite() || signed_dist >= radius {
        return CollisionResult::miss();
    }
    CollisionResult {
        hit: true,
        normal: -inward,
        penetration: radius - signed_dist,
    }
}

/// Velocity change from an elastic collision along `normal`
///
/// `relative_vel` is the contact's velocity relative to the body. Only a
/// closing contact (negative projection on the normal) produces an impulse.
pub fn elastic_impulse(relative_vel: Vec2, normal: Vec2, mass_ratio: f32, restitution: f32) -> Vec2 {
    let closing = relative_vel.dot(normal);
    if closing < 0.0 {
        normal * (closing * (1.0 + restitution) * mass_ratio)
    } else {
        Vec2::ZERO
    }
}

/// Share of the impulse a body takes when hitting something of `other_mass`
#[inline]
pub fn mass_ratio(own_mass: f32, other_mass: f32) -> f32 {
    other_mass / (own_mass + other_mass)
}

/// Gravity and collision deltas for `snapshot[idx]`
fn body_delta(
    idx: usize,
    snapshot: &[Body],
    openings: &[GoalOpening; 2],
    field: FieldSize,
    tuning: &Tuning,
    dt: f32,
    report: &mut StepReport,
) -> BodyDelta {
    let body = &snapshot[idx];
    let mut delta = BodyDelta {
        pos: Vec2::ZERO,
        vel: Vec2::new(0.0, -dt * tuning.gravity),
    };

    for point in collision_points(idx, snapshot, openings, field) {
        let other = match point.source {
            ContactSource::Body(other_idx) => Some(&snapshot[other_idx]),
            _ => None,
        };
        let col_dist = body.radius + other.map_or(0.0, |o| o.radius);

        let result = match point.source.edge_inward() {
            Some(inward) => check_edge((body.pos - point.pos).dot(inward), inward, body.radius),
            None => {
                let result = check_contact(body.pos, point.pos, col_dist);
                if !result.hit && (point.pos - body.pos).length() <= f32::EPSILON {
                    report.degenerate_contacts += 1;
                }
                result
            }
        };
        if !result.hit {
            continue;
        }

        if body.is_main_ball() {
            match point.source {
                ContactSource::Floor => report.scale_request = Some(1),
                ContactSource::Ceiling => report.scale_request = Some(-1),
                _ => {}
            }
        }

        delta.pos -= result.normal * result.penetration;

        let (relative_vel, other_mass) = match other {
            Some(o) => (o.vel - body.vel, o.mass()),
            None => (-body.vel, STATIC_MASS),
        };
        delta.vel += elastic_impulse(
            relative_vel,
            result.normal,
            mass_ratio(body.mass(), other_mass),
            tuning.border_bounce,
        );
    }

    delta
}

/// Advance every body by one frame
///
/// Applies gravity and collision response, then (if enabled) moves bodies
/// by their velocity. The ball-scale side effect is returned rather than
/// applied so the caller can route it through the cooldown.
pub fn integrate(
    bodies: &mut BodyRegistry,
    openings: &[GoalOpening; 2],
    field: FieldSize,
    tuning: &Tuning,
    dt: f32,
) -> StepReport {
    let mut report = StepReport::default();
    if dt.is_nan() || dt <= 0.0 || bodies.is_empty() {
        return report;
    }

    let snapshot: Vec<Body> = bodies.as_slice().to_vec();
    let deltas: Vec<BodyDelta> = (0..snapshot.len())
        .map(|idx| body_delta(idx, &snapshot, openings, field, tuning, dt, &mut report))
        .collect();

    for (body, delta) in bodies.iter_mut().zip(deltas) {
        if !(delta.pos.is_finite() && delta.vel.is_finite()) {
            log::warn!("Dropping non-finite collision delta for body {}", body.id);
            continue;
        }
        body.pos += delta.pos;
        body.vel += delta.vel;
        if tuning.integrate_positions {
            body.pos += body.vel * dt;
        }
    }

    if report.degenerate_contacts > 0 {
        log::warn!(
            "Skipped {} contact(s) between coincident bodies",
            report.degenerate_contacts
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyKind;
    use crate::sim::goal::goal_opening;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn field() -> FieldSize {
        FieldSize::new(1000.0, 1000.0)
    }

    fn openings(tuning: &Tuning) -> [GoalOpening; 2] {
        [goal_opening(tuning, 0.0), goal_opening(tuning, 0.0)]
    }

    fn still_tuning() -> Tuning {
        Tuning {
            gravity: 0.0,
            integrate_positions: false,
            ..Tuning::default()
        }
    }

    fn orb(pos: Vec2, vel: Vec2) -> Body {
        Body {
            id: 0,
            kind: BodyKind::PowerUpOrb { sign: 1 },
            pos,
            vel,
            radius: 10.0,
            density: 2.0,
        }
    }

    #[test]
    fn test_points_low_body_outside_goal() {
        let tuning = Tuning::default();
        let snapshot = [orb(Vec2::new(100.0, 200.0), Vec2::ZERO)];
        let points = collision_points(0, &snapshot, &openings(&tuning), field());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].source, ContactSource::Floor);
        assert_eq!(points[0].pos, Vec2::new(100.0, 0.0));
        assert_eq!(points[1].source, ContactSource::Wall(Side::Left));
        assert_eq!(points[1].pos, Vec2::new(0.0, 200.0));
    }

    #[test]
    fn test_points_body_lined_up_with_goal() {
        let tuning = Tuning::default();
        let snapshot = [
            orb(Vec2::new(900.0, 700.0), Vec2::ZERO),
            orb(Vec2::new(500.0, 500.0), Vec2::ZERO),
        ];
        let points = collision_points(0, &snapshot, &openings(&tuning), field());
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].source, ContactSource::Ceiling);
        assert_eq!(points[1].source, ContactSource::GoalRim(Side::Right));
        assert_eq!(points[2].source, ContactSource::GoalRim(Side::Right));
        assert!((points[1].pos.y - 550.0).abs() < 1e-3);
        assert!((points[2].pos.y - 800.0).abs() < 1e-3);
        assert_eq!(points[1].pos.x, 1000.0);
        assert_eq!(points[3].source, ContactSource::Body(1));
    }

    #[test]
    fn test_wall_bounce_reverses_with_restitution() {
        let tuning = still_tuning();
        let mut bodies = BodyRegistry::new();
        bodies.spawn(
            BodyKind::PowerUpOrb { sign: 1 },
            Vec2::new(5.0, 200.0),
            Vec2::new(-100.0, 0.0),
            10.0,
            2.0,
        );
        integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);
        let body = bodies.iter().next().unwrap();
        assert!((body.pos.x - 10.0).abs() < 1e-3, "pushed out by the penetration depth");
        assert!((body.vel.x - 80.0).abs() < 1e-2, "bounced at 0.8 of incoming speed");
    }

    #[test]
    fn test_small_ball_below_floor_is_pushed_back_in() {
        let tuning = still_tuning();
        let mut bodies = BodyRegistry::new();
        bodies.spawn(BodyKind::MainBall, Vec2::new(500.0, -3.0), Vec2::new(0.0, -100.0), 6.0, 2.0);
        let report = integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);
        let ball = bodies.main_ball().unwrap();
        assert!((ball.pos.y - 6.0).abs() < 1e-4, "back on the floor, not further out");
        assert!((ball.vel.y - 80.0).abs() < 1e-2, "bounced upward");
        assert_eq!(report.scale_request, Some(1));
    }

    #[test]
    fn test_body_past_each_edge_comes_back() {
        let tuning = still_tuning();
        let cases = [
            (Vec2::new(-4.0, 200.0), Vec2::new(10.0, 200.0)),
            (Vec2::new(1004.0, 200.0), Vec2::new(990.0, 200.0)),
            (Vec2::new(300.0, 1004.0), Vec2::new(300.0, 990.0)),
            (Vec2::new(300.0, -4.0), Vec2::new(300.0, 10.0)),
        ];
        for (start, expected) in cases {
            let mut bodies = BodyRegistry::new();
            bodies.spawn(BodyKind::PowerUpOrb { sign: 1 }, start, Vec2::ZERO, 10.0, 2.0);
            integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);
            let pos = bodies.iter().next().unwrap().pos;
            assert!((pos - expected).length() < 1e-4, "{start} ended at {pos}");
        }
    }

    #[test]
    fn test_edge_contact_at_exact_radius_misses() {
        assert!(!check_edge(10.0, Vec2::Y, 10.0).hit);
        assert!(!check_edge(f32::NAN, Vec2::Y, 10.0).hit);
        let result = check_edge(-2.0, Vec2::X, 10.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_X);
        assert_eq!(result.penetration, 12.0);
    }

    #[test]
    fn test_resting_at_boundary_has_no_delta() {
        // Exactly touching: no contact at all
        let result = check_contact(Vec2::new(10.0, 200.0), Vec2::new(0.0, 200.0), 10.0);
        assert!(!result.hit);

        // Slightly overlapping but at rest: position fix only
        let result = check_contact(Vec2::new(9.5, 200.0), Vec2::new(0.0, 200.0), 10.0);
        assert!(result.hit);
        let impulse = elastic_impulse(Vec2::ZERO, result.normal, 1.0, 0.8);
        assert_eq!(impulse, Vec2::ZERO);
    }

    #[test]
    fn test_separating_contact_has_no_impulse() {
        let normal = Vec2::new(-1.0, 0.0);
        // Body moving right, away from a wall on its left
        let impulse = elastic_impulse(-Vec2::new(50.0, 0.0), normal, 1.0, 0.8);
        assert_eq!(impulse, Vec2::ZERO);
    }

    #[test]
    fn test_equal_masses_head_on() {
        let tuning = still_tuning();
        let v = 60.0;
        let mut bodies = BodyRegistry::new();
        let a = bodies.spawn(
            BodyKind::PowerUpOrb { sign: 1 },
            Vec2::new(491.0, 300.0),
            Vec2::new(v, 0.0),
            10.0,
            2.0,
        );
        let b = bodies.spawn(
            BodyKind::PowerUpOrb { sign: -1 },
            Vec2::new(509.0, 300.0),
            Vec2::new(-v, 0.0),
            10.0,
            2.0,
        );
        integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);

        let va = bodies.get(a).unwrap().vel;
        let vb = bodies.get(b).unwrap().vel;
        // Each receives (1 + e) / 2 of the closing speed 2v
        let change = (1.0 + tuning.border_bounce) / 2.0 * 2.0 * v;
        assert!((va.x - (v - change)).abs() < 1e-3);
        assert!((vb.x - (-v + change)).abs() < 1e-3);
        assert!((va.x + vb.x).abs() < 1e-3, "momentum conserved for equal masses");
        assert!(va.x < 0.0 && vb.x > 0.0, "bodies separate");
    }

    #[test]
    fn test_order_independent() {
        let tuning = still_tuning();
        let make = |flip: bool| {
            let mut bodies = BodyRegistry::new();
            let specs = [
                (Vec2::new(491.0, 300.0), Vec2::new(40.0, 5.0)),
                (Vec2::new(509.0, 302.0), Vec2::new(-70.0, 0.0)),
            ];
            let order: Vec<_> = if flip { specs.iter().rev().collect() } else { specs.iter().collect() };
            for (pos, vel) in order {
                bodies.spawn(BodyKind::PowerUpOrb { sign: 1 }, *pos, *vel, 10.0, 2.0);
            }
            integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);
            let mut out: Vec<(Vec2, Vec2)> = bodies.iter().map(|b| (b.pos, b.vel)).collect();
            out.sort_by(|a, b| a.0.x.total_cmp(&b.0.x));
            out
        };
        let forward = make(false);
        let reversed = make(true);
        for (f, r) in forward.iter().zip(&reversed) {
            assert!((f.0 - r.0).length() < 1e-4);
            assert!((f.1 - r.1).length() < 1e-4);
        }
    }

    #[test]
    fn test_coincident_bodies_do_not_produce_nan() {
        let tuning = Tuning::default();
        let mut bodies = BodyRegistry::new();
        for _ in 0..2 {
            bodies.spawn(
                BodyKind::PowerUpOrb { sign: 1 },
                Vec2::new(300.0, 300.0),
                Vec2::new(10.0, 0.0),
                10.0,
                2.0,
            );
        }
        let report = integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);
        assert_eq!(report.degenerate_contacts, 2);
        assert!(bodies.iter().all(|b| b.pos.is_finite() && b.vel.is_finite()));
    }

    #[test]
    fn test_main_ball_floor_requests_scale_up() {
        let tuning = still_tuning();
        let mut bodies = BodyRegistry::new();
        bodies.spawn(BodyKind::MainBall, Vec2::new(500.0, 20.0), Vec2::new(0.0, -50.0), 30.0, 2.0);
        let report = integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);
        assert_eq!(report.scale_request, Some(1));
    }

    #[test]
    fn test_goal_rim_does_not_request_scale() {
        let tuning = still_tuning();
        let mut bodies = BodyRegistry::new();
        // Lined up with the left goal, touching its bottom rim at y = 550
        bodies.spawn(BodyKind::MainBall, Vec2::new(10.0, 560.0), Vec2::new(-50.0, 0.0), 30.0, 2.0);
        let report = integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);
        assert_eq!(report.scale_request, None);
    }

    #[test]
    fn test_ball_passes_through_goal_center() {
        let tuning = still_tuning();
        let mut bodies = BodyRegistry::new();
        // Goal spans 550..800; a 30px ball at 675 clears both rims
        bodies.spawn(BodyKind::MainBall, Vec2::new(5.0, 675.0), Vec2::new(-50.0, 0.0), 30.0, 2.0);
        integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);
        let ball = bodies.main_ball().unwrap();
        assert_eq!(ball.vel, Vec2::new(-50.0, 0.0));
        assert_eq!(ball.pos, Vec2::new(5.0, 675.0));
    }

    #[test]
    fn test_gravity_and_motion() {
        let tuning = Tuning::default();
        let mut bodies = BodyRegistry::new();
        bodies.spawn(BodyKind::MainBall, Vec2::new(500.0, 400.0), Vec2::ZERO, 30.0, 2.0);
        integrate(&mut bodies, &openings(&tuning), field(), &tuning, 0.5);
        let ball = bodies.main_ball().unwrap();
        assert!((ball.vel.y + 10.0).abs() < 1e-4);
        assert!((ball.pos.y - 395.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_integration_stays_finite(
            positions in prop::collection::vec((0.0f32..1000.0, 0.0f32..1000.0), 1..6),
            speed in 0.0f32..500.0,
        ) {
            let tuning = Tuning::default();
            let mut bodies = BodyRegistry::new();
            for (i, (x, y)) in positions.iter().enumerate() {
                let kind = if i == 0 { BodyKind::MainBall } else { BodyKind::PowerUpOrb { sign: 1 } };
                bodies.spawn(kind, Vec2::new(*x, *y), Vec2::new(speed, -speed), 12.0, 2.0);
            }
            for _ in 0..30 {
                integrate(&mut bodies, &openings(&tuning), field(), &tuning, DT);
            }
            prop_assert!(bodies.iter().all(|b| b.pos.is_finite() && b.vel.is_finite()));
        }
    }
}
