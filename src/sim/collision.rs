//! Ball-peg collision detection and response
//!
//! Overlapping pegs are handled one at a time in peg order. Each response
//! moves the ball, so later pegs in the same pass see the corrected position.

use glam::Vec2;

use super::board::Peg;
use super::entropy::Entropy;
use super::physics::PhysicsTuning;
use super::state::Ball;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the peg surface
    pub point: Vec2,
    /// Unit normal from peg centre toward ball centre
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between a ball and a single peg
pub fn ball_peg_collision(ball_pos: Vec2, ball_radius: f32, peg: &Peg) -> CollisionResult {
    let offset = ball_pos - peg.pos;
    let distance = offset.length();
    let min_distance = ball_radius + peg.radius;

    if distance >= min_distance {
        return CollisionResult::miss();
    }

    // Centres coincide: push straight up, back the way the ball came
    let normal = offset.try_normalize().unwrap_or(Vec2::NEG_Y);
    CollisionResult {
        hit: true,
        point: peg.pos + normal * peg.radius,
        normal,
        penetration: min_distance - distance,
    }
}

/// Push the ball out of a peg and bounce it along a jittered contact normal
///
/// Afterwards the ball sits exactly `ball.radius + peg.radius` from the peg centre.
pub fn bounce_off_peg<E: Entropy + ?Sized>(
    ball: &mut Ball,
    peg: &Peg,
    hit: &CollisionResult,
    tuning: &PhysicsTuning,
    entropy: &mut E,
) {
    let contact_distance = ball.radius + peg.radius;
    ball.pos = peg.pos + hit.normal * contact_distance;

    let speed = ball.vel.length();
    let angle = hit.normal.y.atan2(hit.normal.x) + entropy.centered(tuning.jitter);
    ball.vel = Vec2::from_angle(angle) * speed * tuning.restitution;
}

/// Resolve every peg the ball currently overlaps, in peg order
///
/// Returns the number of pegs hit.
pub fn resolve_collisions<E: Entropy + ?Sized>(
    ball: &mut Ball,
    pegs: &[Peg],
    tuning: &PhysicsTuning,
    entropy: &mut E,
) -> u32 {
    let mut hits = 0;
    for (idx, peg) in pegs.iter().enumerate() {
        let result = ball_peg_collision(ball.pos, ball.radius, peg);
        if !result.hit {
            continue;
        }
        bounce_off_peg(ball, peg, &result, tuning, entropy);
        hits += 1;
        log::debug!(
            "Ball {} hit peg {} (penetration {:.3}), new vel ({:.3}, {:.3})",
            ball.id,
            idx,
            result.penetration,
            ball.vel.x,
            ball.vel.y
        );
    }
    ball.bounces += hits;
    hits
}
