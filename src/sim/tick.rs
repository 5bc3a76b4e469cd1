//! Fixed timestep simulation tick
//!
//! One tick is an atomic transition for the live ball: physics, collisions,
//! stability check, then the landing test. No partial-tick state escapes.

use serde::Serialize;

use super::collision::resolve_collisions;
use super::entropy::Entropy;
use super::landing::{has_landed, resolve_landing};
use super::physics::{check_stability, step, substeps_for};
use super::state::{BallSnapshot, GameResult, GameState, ResultSink, SessionPhase};
use crate::consts::*;
use crate::error::SimulationError;

/// What a single tick produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TickOutcome {
    /// Nothing in flight; the tick was a no-op
    Idle,
    /// Ball still falling
    InFlight(BallSnapshot),
    /// Ball landed and its result was handed to the sink
    Settled(GameResult),
    /// Flight diverged; ball discarded without a result
    Faulted(SimulationError),
}

impl TickOutcome {
    pub fn result(&self) -> Option<&GameResult> {
        match self {
            TickOutcome::Settled(result) => Some(result),
            _ => None,
        }
    }
}

/// Advance the session by one fixed tick
pub fn tick<E: Entropy, S: ResultSink + ?Sized>(
    state: &mut GameState<E>,
    sink: &mut S,
) -> TickOutcome {
    if state.phase != SessionPhase::Dropping {
        return TickOutcome::Idle;
    }
    let Some(mut ball) = state.ball.take() else {
        // Dropping without a ball cannot be reached through the public API
        log::error!("Session dropping without a ball; resetting to idle");
        state.phase = SessionPhase::Idle;
        return TickOutcome::Idle;
    };

    state.time_ticks += 1;
    ball.flight_ticks += 1;

    let substeps = substeps_for(&ball, &state.tuning, MAX_SUBSTEPS);
    let dt = SIM_DT / substeps as f32;
    for _ in 0..substeps {
        step(&mut ball, &state.tuning, dt);
        resolve_collisions(&mut ball, &state.board.pegs, &state.tuning, &mut state.entropy);
    }

    let landed = has_landed(&ball, &state.board);
    let fault = match check_stability(&ball, &state.tuning) {
        Err(err) => Some(err),
        Ok(()) if !landed && ball.flight_ticks >= state.tuning.max_flight_ticks => {
            Some(SimulationError::FlightTimeout {
                ticks: ball.flight_ticks,
            })
        }
        Ok(()) => None,
    };
    if let Some(err) = fault {
        log::error!("Ball {} discarded: {}", ball.id, err);
        state.phase = SessionPhase::Idle;
        state.bet = 0.0;
        return TickOutcome::Faulted(err);
    }

    if !landed {
        let snapshot = BallSnapshot::from(&ball);
        state.ball = Some(ball);
        return TickOutcome::InFlight(snapshot);
    }

    // Settlement: the ball is consumed here, so a second result is impossible
    let result = resolve_landing(&ball, &state.board.slots, state.bet, (state.clock)());
    state.phase = SessionPhase::Settled;
    log::info!(
        "Ball {} settled in slot {} after {} ticks, {} bounces: {}x, payout {}",
        ball.id,
        result.slot_index,
        ball.flight_ticks,
        ball.bounces,
        result.multiplier,
        result.payout
    );
    sink.accept(&result);
    state.phase = SessionPhase::Idle;
    state.bet = 0.0;
    TickOutcome::Settled(result)
}

/// Settle an abandoned ball by running its flight to completion
///
/// Uses the same physics and random source as normal ticking, so the result
/// follows the regular landing distribution. No-op when nothing is in flight.
pub fn abandon<E: Entropy, S: ResultSink + ?Sized>(
    state: &mut GameState<E>,
    sink: &mut S,
) -> TickOutcome {
    if state.phase == SessionPhase::Dropping {
        log::info!("Abandoning in-flight ball; settling immediately");
    }
    run_to_settlement(state, sink)
}

/// Tick until the current ball settles or faults
///
/// Always terminates: flights are bounded by `max_flight_ticks`.
pub fn run_to_settlement<E: Entropy, S: ResultSink + ?Sized>(
    state: &mut GameState<E>,
    sink: &mut S,
) -> TickOutcome {
    loop {
        match tick(state, sink) {
            TickOutcome::InFlight(_) => continue,
            outcome => return outcome,
        }
    }
}
