//! Ball kinematics
//!
//! Semi-implicit Euler in tick units: velocity is updated before position and
//! `dt = 1.0` is one whole tick. Behaviour depends only on the tick count,
//! never on wall-clock frame timing.

use serde::{Deserialize, Serialize};

use super::state::Ball;
use crate::error::SimulationError;

/// Data-driven physics constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (px/tick²)
    pub gravity: f32,
    /// Horizontal velocity retained per tick
    pub damping: f32,
    /// Vertical velocity retained per tick (1.0 = undamped fall)
    pub vertical_damping: f32,
    /// Fraction of speed kept after a peg bounce
    pub restitution: f32,
    /// Width of the uniform angular perturbation applied to each bounce (radians)
    pub jitter: f32,
    /// Speed beyond which the flight is considered unstable (px/tick)
    pub max_speed: f32,
    /// Ticks after which a ball that has not settled is discarded
    pub max_flight_ticks: u64,
    /// Longest distance the ball may travel between collision checks (px).
    /// `None` runs exactly one step and one collision pass per tick.
    pub max_substep_travel: Option<f32>,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            damping: 0.98,
            vertical_damping: 1.0,
            restitution: 0.7,
            jitter: 0.5,
            max_speed: 400.0,
            max_flight_ticks: 20_000,
            max_substep_travel: None,
        }
    }
}

impl PhysicsTuning {
    /// Reject constants that would make the flight diverge
    pub fn is_stable(&self) -> bool {
        let unit = |v: f32| v.is_finite() && v > 0.0 && v <= 1.0;
        self.gravity.is_finite()
            && self.gravity > 0.0
            && unit(self.damping)
            && unit(self.vertical_damping)
            && self.restitution.is_finite()
            && (0.0..1.0).contains(&self.restitution)
            && self.jitter.is_finite()
            && self.jitter >= 0.0
            && self.max_speed > 0.0
            && self
                .max_substep_travel
                .is_none_or(|travel| travel.is_finite() && travel > 0.0)
            && self.max_flight_ticks > 0
    }
}

/// Advance one ball by `dt` ticks: gravity, damping, then position
pub fn step(ball: &mut Ball, tuning: &PhysicsTuning, dt: f32) {
    ball.vel.y += tuning.gravity * dt;
    if dt == 1.0 {
        ball.vel.x *= tuning.damping;
        ball.vel.y *= tuning.vertical_damping;
    } else {
        // Same per-tick decay when a tick is split into sub-steps
        ball.vel.x *= tuning.damping.powf(dt);
        ball.vel.y *= tuning.vertical_damping.powf(dt);
    }
    ball.pos += ball.vel * dt;
}

/// Number of sub-steps needed so no sub-step moves further than the tuning allows
pub fn substeps_for(ball: &Ball, tuning: &PhysicsTuning, max_substeps: u32) -> u32 {
    let Some(travel) = tuning.max_substep_travel else {
        return 1;
    };
    // Include this tick's gravity so a ball starting from rest is covered
    let speed = ball.vel.length() + tuning.gravity;
    let steps = (speed / travel).ceil();
    if steps.is_finite() {
        (steps as u32).clamp(1, max_substeps)
    } else {
        max_substeps
    }
}

/// Detect numeric divergence in a ball's state
pub fn check_stability(ball: &Ball, tuning: &PhysicsTuning) -> Result<(), SimulationError> {
    if !ball.pos.is_finite() || !ball.vel.is_finite() {
        return Err(SimulationError::NonFinite);
    }
    let speed = ball.vel.length();
    if speed > tuning.max_speed {
        return Err(SimulationError::SpeedLimit {
            speed,
            limit: tuning.max_speed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball::new(1, Vec2::new(x, y))
    }

    #[test]
    fn test_gravity_before_position() {
        let tuning = PhysicsTuning::default();
        let mut ball = ball_at(100.0, 50.0);
        step(&mut ball, &tuning, 1.0);
        // Semi-implicit: new velocity is used for this tick's displacement
        assert!((ball.vel.y - 0.3).abs() < 1e-6);
        assert!((ball.pos.y - 50.3).abs() < 1e-4);
        assert_eq!(ball.pos.x, 100.0);
    }

    #[test]
    fn test_horizontal_damping() {
        let tuning = PhysicsTuning::default();
        let mut ball = ball_at(100.0, 50.0);
        ball.vel = Vec2::new(10.0, 0.0);
        step(&mut ball, &tuning, 1.0);
        assert!((ball.vel.x - 9.8).abs() < 1e-6);
        assert!((ball.pos.x - 109.8).abs() < 1e-4);
    }

    #[test]
    fn test_vertical_damping_applies_when_configured() {
        let tuning = PhysicsTuning {
            vertical_damping: 0.5,
            ..Default::default()
        };
        let mut ball = ball_at(0.0, 0.0);
        ball.vel = Vec2::new(0.0, 1.7);
        step(&mut ball, &tuning, 1.0);
        assert!((ball.vel.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_substeps_match_whole_tick_velocity() {
        let tuning = PhysicsTuning::default();
        let mut whole = ball_at(0.0, 0.0);
        whole.vel = Vec2::new(5.0, 2.0);
        let mut split = whole.clone();

        step(&mut whole, &tuning, 1.0);
        for _ in 0..4 {
            step(&mut split, &tuning, 0.25);
        }
        assert!((whole.vel - split.vel).length() < 1e-4);
        // Positions differ slightly (integration), but stay close
        assert!((whole.pos - split.pos).length() < 0.5);
    }

    #[test]
    fn test_deterministic_per_tick() {
        let tuning = PhysicsTuning::default();
        let mut a = ball_at(400.0, 50.0);
        let mut b = ball_at(400.0, 50.0);
        a.vel = Vec2::new(1.5, -2.0);
        b.vel = a.vel;
        for _ in 0..100 {
            step(&mut a, &tuning, 1.0);
            step(&mut b, &tuning, 1.0);
        }
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.vel, b.vel);
    }

    #[test]
    fn test_default_runs_one_step_per_tick() {
        let tuning = PhysicsTuning::default();
        let mut ball = ball_at(0.0, 0.0);
        ball.vel = Vec2::new(0.0, 50.0);
        assert_eq!(substeps_for(&ball, &tuning, 16), 1);
    }

    #[test]
    fn test_substep_count() {
        let tuning = PhysicsTuning {
            max_substep_travel: Some(4.0),
            ..Default::default()
        };
        let mut ball = ball_at(0.0, 0.0);
        assert_eq!(substeps_for(&ball, &tuning, 16), 1);
        ball.vel = Vec2::new(0.0, 12.0);
        assert_eq!(substeps_for(&ball, &tuning, 16), 4);
        ball.vel = Vec2::new(0.0, 1000.0);
        assert_eq!(substeps_for(&ball, &tuning, 16), 16);
    }

    #[test]
    fn test_stability_checks() {
        let tuning = PhysicsTuning::default();
        let mut ball = ball_at(0.0, 0.0);
        assert!(check_stability(&ball, &tuning).is_ok());
        ball.vel = Vec2::new(f32::NAN, 0.0);
        assert_eq!(check_stability(&ball, &tuning), Err(SimulationError::NonFinite));
        ball.vel = Vec2::new(0.0, 500.0);
        assert!(matches!(
            check_stability(&ball, &tuning),
            Err(SimulationError::SpeedLimit { .. })
        ));
    }

    #[test]
    fn test_tuning_stability() {
        assert!(PhysicsTuning::default().is_stable());
        let bad = PhysicsTuning {
            restitution: 1.2,
            ..Default::default()
        };
        assert!(!bad.is_stable());
        let bad = PhysicsTuning {
            damping: 0.0,
            ..Default::default()
        };
        assert!(!bad.is_stable());
        let bad = PhysicsTuning {
            max_substep_travel: Some(0.0),
            ..Default::default()
        };
        assert!(!bad.is_stable());
    }
}
