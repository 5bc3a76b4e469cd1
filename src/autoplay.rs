//! Auto-play: drop a run of balls at a fixed bet
//!
//! The driver tracks the balance the host handed it, so it can stop on its
//! own. Each ball still goes through the normal drop path, so the
//! single-flight rule holds: the next ball is only dropped once the previous
//! one has settled or faulted.

use serde::{Deserialize, Serialize};

use crate::error::{DropRejection, PlinkoError, SimulationError};
use crate::sim::{Entropy, GameResult, GameState, ResultSink, TickOutcome, run_to_settlement};

/// Drop delay between auto-play balls at speed 1 (ms)
pub const AUTO_DROP_INTERVAL_MS: f64 = 2000.0;
/// Drop delay in turbo mode at speed 1 (ms)
pub const TURBO_DROP_INTERVAL_MS: f64 = 1000.0;

/// Auto-play preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPlaySettings {
    /// Balls to drop before stopping
    pub balls: u32,
    /// Stop once the balance falls below `stop_amount`
    pub stop_on_loss: bool,
    pub stop_amount: f64,
    /// Pacing multiplier for hosts that animate drops
    pub speed: f64,
    /// Halve the delay between drops
    pub turbo: bool,
}

impl Default for AutoPlaySettings {
    fn default() -> Self {
        Self {
            balls: 10,
            stop_on_loss: false,
            stop_amount: 50_000.0,
            speed: 1.0,
            turbo: false,
        }
    }
}

impl AutoPlaySettings {
    pub fn validate(&self) -> Result<(), PlinkoError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(PlinkoError::InvalidConfiguration(format!(
                "auto-play speed must be positive, got {}",
                self.speed
            )));
        }
        if !self.stop_amount.is_finite() {
            return Err(PlinkoError::InvalidConfiguration(
                "auto-play stop amount must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay a host should leave between settled balls
    pub fn drop_interval_ms(&self) -> f64 {
        let base = if self.turbo {
            TURBO_DROP_INTERVAL_MS
        } else {
            AUTO_DROP_INTERVAL_MS
        };
        base / self.speed
    }
}

/// Why an auto-play run ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AutoPlayStop {
    /// All requested balls were dropped
    Completed,
    /// Balance fell below the stop-loss amount
    StopLoss,
    /// Bet exceeds the remaining balance
    InsufficientBalance,
    /// Stopped by the player
    Cancelled,
    /// A flight diverged; its bet was refunded
    Faulted(SimulationError),
}

/// Auto-play run in progress
#[derive(Debug, Clone, Serialize)]
pub struct AutoPlay {
    settings: AutoPlaySettings,
    bet: f64,
    balance: f64,
    played: u32,
    in_flight: bool,
    stopped: Option<AutoPlayStop>,
}

impl AutoPlay {
    /// Start a run of `settings.balls` drops at `bet` against `balance`
    pub fn new(settings: AutoPlaySettings, bet: f64, balance: f64) -> Result<Self, PlinkoError> {
        settings.validate()?;
        if !balance.is_finite() {
            return Err(PlinkoError::InvalidConfiguration(
                "auto-play balance must be finite".to_string(),
            ));
        }
        if !(bet.is_finite() && bet > 0.0) {
            return Err(PlinkoError::DropRejected(DropRejection::NonPositiveBet));
        }
        log::info!(
            "Auto-play started: {} balls at {} (balance {})",
            settings.balls,
            bet,
            balance
        );
        Ok(Self {
            settings,
            bet,
            balance,
            played: 0,
            in_flight: false,
            stopped: None,
        })
    }

    pub fn settings(&self) -> &AutoPlaySettings {
        &self.settings
    }

    /// Balance after every settled ball so far (bets of balls in flight deducted)
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Balls settled so far
    pub fn played(&self) -> u32 {
        self.played
    }

    pub fn stop_reason(&self) -> Option<AutoPlayStop> {
        self.stopped
    }

    pub fn is_running(&self) -> bool {
        self.stopped.is_none()
    }

    /// Stop before the next drop; a ball already in flight still settles
    pub fn cancel(&mut self) {
        if self.stopped.is_none() {
            self.finish(AutoPlayStop::Cancelled);
        }
    }

    fn finish(&mut self, reason: AutoPlayStop) {
        log::info!(
            "Auto-play stopped after {} balls: {:?} (balance {})",
            self.played,
            reason,
            self.balance
        );
        self.stopped = Some(reason);
    }

    fn stop_condition(&self) -> Option<AutoPlayStop> {
        if self.played >= self.settings.balls {
            Some(AutoPlayStop::Completed)
        } else if self.settings.stop_on_loss && self.balance < self.settings.stop_amount {
            Some(AutoPlayStop::StopLoss)
        } else if self.bet > self.balance {
            Some(AutoPlayStop::InsufficientBalance)
        } else {
            None
        }
    }

    /// Drop the next ball unless a stop condition holds
    ///
    /// Returns the new ball id, or `None` once the run has ended. The bet is
    /// deducted from the tracked balance as soon as the drop is accepted.
    pub fn next_drop<E: Entropy>(
        &mut self,
        state: &mut GameState<E>,
    ) -> Result<Option<u64>, PlinkoError> {
        if self.stopped.is_some() {
            return Ok(None);
        }
        if let Some(reason) = self.stop_condition() {
            self.finish(reason);
            return Ok(None);
        }
        let id = state.drop_ball_with_balance(self.bet, self.balance)?;
        self.balance -= self.bet;
        self.in_flight = true;
        Ok(Some(id))
    }

    /// Account for a tick outcome of an auto-play ball
    pub fn record(&mut self, outcome: &TickOutcome) {
        if !self.in_flight {
            return;
        }
        match outcome {
            TickOutcome::Settled(result) => {
                self.in_flight = false;
                self.balance += result.payout;
                self.played += 1;
            }
            TickOutcome::Faulted(err) => {
                self.in_flight = false;
                self.balance += self.bet;
                self.finish(AutoPlayStop::Faulted(*err));
            }
            TickOutcome::Idle | TickOutcome::InFlight(_) => {}
        }
    }

    /// Drop the next ball and fast-forward it to settlement
    pub fn play_next<E: Entropy, S: ResultSink + ?Sized>(
        &mut self,
        state: &mut GameState<E>,
        sink: &mut S,
    ) -> Result<Option<GameResult>, PlinkoError> {
        if self.next_drop(state)?.is_none() {
            return Ok(None);
        }
        let outcome = run_to_settlement(state, sink);
        self.record(&outcome);
        Ok(outcome.result().copied())
    }

    /// Play until a stop condition ends the run
    pub fn run<E: Entropy, S: ResultSink + ?Sized>(
        &mut self,
        state: &mut GameState<E>,
        sink: &mut S,
    ) -> Result<AutoPlayStop, PlinkoError> {
        loop {
            if let Some(reason) = self.stopped {
                return Ok(reason);
            }
            self.play_next(state, sink)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BoardConfig, NullSink, RiskLevel, SessionPhase, tick};
    use glam::Vec2;

    fn seeded_state(seed: u64) -> GameState {
        let config = BoardConfig::with_defaults(RiskLevel::Medium, 12).unwrap();
        GameState::with_seed(config, seed).unwrap()
    }

    #[test]
    fn test_stops_after_requested_balls() {
        let mut state = seeded_state(21);
        let settings = AutoPlaySettings {
            balls: 4,
            ..Default::default()
        };
        let mut auto = AutoPlay::new(settings, 10.0, 1000.0).unwrap();
        let mut results: Vec<GameResult> = Vec::new();
        assert_eq!(auto.run(&mut state, &mut results).unwrap(), AutoPlayStop::Completed);

        assert_eq!(auto.played(), 4);
        assert_eq!(results.len(), 4);
        let paid: f64 = results.iter().map(|r| r.payout).sum();
        assert!((auto.balance() - (1000.0 - 40.0 + paid)).abs() < 1e-9);
        assert_eq!(state.phase(), SessionPhase::Idle);
        // Finished runs drop nothing more
        assert_eq!(auto.play_next(&mut state, &mut results).unwrap(), None);
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_stop_loss_below_threshold() {
        let mut state = seeded_state(2);
        let settings = AutoPlaySettings {
            balls: 100,
            stop_on_loss: true,
            stop_amount: 500.0,
            ..Default::default()
        };
        let mut auto = AutoPlay::new(settings, 10.0, 400.0).unwrap();
        let mut results: Vec<GameResult> = Vec::new();
        assert_eq!(auto.run(&mut state, &mut results).unwrap(), AutoPlayStop::StopLoss);
        assert_eq!(auto.played(), 0);
        assert!(results.is_empty());
    }

    #[test]
    fn test_stop_loss_ignored_when_disabled() {
        let mut state = seeded_state(2);
        let settings = AutoPlaySettings {
            balls: 2,
            stop_on_loss: false,
            stop_amount: 500.0,
            ..Default::default()
        };
        let mut auto = AutoPlay::new(settings, 10.0, 400.0).unwrap();
        assert_eq!(auto.run(&mut state, &mut NullSink).unwrap(), AutoPlayStop::Completed);
        assert_eq!(auto.played(), 2);
    }

    #[test]
    fn test_stops_when_bet_exceeds_balance() {
        let mut state = seeded_state(3);
        let mut auto = AutoPlay::new(AutoPlaySettings::default(), 50.0, 20.0).unwrap();
        assert_eq!(
            auto.run(&mut state, &mut NullSink).unwrap(),
            AutoPlayStop::InsufficientBalance
        );
        assert_eq!(state.phase(), SessionPhase::Idle);
        assert!(state.ball().is_none());
    }

    #[test]
    fn test_respects_single_flight() {
        let mut state = seeded_state(4);
        state.drop_ball(1.0).unwrap();
        let mut auto = AutoPlay::new(AutoPlaySettings::default(), 1.0, 100.0).unwrap();
        assert_eq!(
            auto.play_next(&mut state, &mut NullSink),
            Err(PlinkoError::DropRejected(DropRejection::BallInFlight))
        );
        assert_eq!(auto.balance(), 100.0);
        assert_eq!(auto.played(), 0);
    }

    #[test]
    fn test_tick_driven_run() {
        let mut state = seeded_state(5);
        let settings = AutoPlaySettings {
            balls: 2,
            ..Default::default()
        };
        let mut auto = AutoPlay::new(settings, 5.0, 100.0).unwrap();
        let mut results: Vec<GameResult> = Vec::new();
        while auto.next_drop(&mut state).unwrap().is_some() {
            assert_eq!(state.phase(), SessionPhase::Dropping);
            loop {
                let outcome = tick(&mut state, &mut results);
                auto.record(&outcome);
                if !matches!(outcome, TickOutcome::InFlight(_)) {
                    break;
                }
            }
        }
        assert_eq!(auto.stop_reason(), Some(AutoPlayStop::Completed));
        assert_eq!(results.len(), 2);
        let profit: f64 = results.iter().map(GameResult::profit).sum();
        assert!((auto.balance() - (100.0 + profit)).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_stops_before_next_drop() {
        let mut state = seeded_state(6);
        let mut auto = AutoPlay::new(AutoPlaySettings::default(), 1.0, 100.0).unwrap();
        assert!(auto.play_next(&mut state, &mut NullSink).unwrap().is_some());
        auto.cancel();
        assert!(!auto.is_running());
        assert_eq!(auto.play_next(&mut state, &mut NullSink).unwrap(), None);
        assert_eq!(auto.stop_reason(), Some(AutoPlayStop::Cancelled));
        assert_eq!(auto.played(), 1);
    }

    #[test]
    fn test_fault_refunds_bet_and_stops() {
        let mut state = seeded_state(7);
        let mut auto = AutoPlay::new(AutoPlaySettings::default(), 10.0, 100.0).unwrap();
        auto.next_drop(&mut state).unwrap();
        assert_eq!(auto.balance(), 90.0);
        if let Some(ball) = state.ball.as_mut() {
            ball.vel = Vec2::new(f32::NAN, 0.0);
        }
        let outcome = tick(&mut state, &mut NullSink);
        auto.record(&outcome);
        assert_eq!(auto.balance(), 100.0);
        assert_eq!(
            auto.stop_reason(),
            Some(AutoPlayStop::Faulted(SimulationError::NonFinite))
        );
    }

    #[test]
    fn test_settings_validation_and_interval() {
        let settings = AutoPlaySettings::default();
        assert_eq!(settings.drop_interval_ms(), 2000.0);
        let turbo = AutoPlaySettings {
            turbo: true,
            speed: 2.0,
            ..Default::default()
        };
        assert_eq!(turbo.drop_interval_ms(), 500.0);
        let bad = AutoPlaySettings {
            speed: 0.0,
            ..Default::default()
        };
        assert!(AutoPlay::new(bad, 1.0, 10.0).unwrap_err().is_invalid_configuration());
        assert!(AutoPlay::new(settings, 0.0, 10.0).is_err());
    }
}
