//! Session state and core simulation types

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, BoardConfig};
use super::entropy::{self, Entropy};
use super::multipliers::{MultiplierTable, RiskLevel};
use super::physics::PhysicsTuning;
use crate::consts::*;
use crate::error::{DropRejection, PlinkoError};

/// Lifecycle of the session's single ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No ball in flight, drops accepted
    #[default]
    Idle,
    /// Exactly one ball under simulation
    Dropping,
    /// Ball landed; result is being handed off
    Settled,
}

/// The falling ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Pegs hit so far
    pub bounces: u32,
    /// Ticks since the drop
    pub flight_ticks: u64,
}

impl Ball {
    pub fn new(id: u64, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            bounces: 0,
            flight_ticks: 0,
        }
    }
}

/// Outcome of one completed drop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub ball_id: u64,
    pub slot_index: usize,
    pub multiplier: f64,
    pub bet: f64,
    pub payout: f64,
    /// Unix timestamp (ms) at settlement
    pub timestamp: f64,
}

impl GameResult {
    pub fn new(ball_id: u64, slot_index: usize, multiplier: f64, bet: f64, timestamp: f64) -> Self {
        Self {
            ball_id,
            slot_index,
            multiplier,
            bet,
            payout: bet * multiplier,
            timestamp,
        }
    }

    /// Net change to the player's balance
    pub fn profit(&self) -> f64 {
        self.payout - self.bet
    }

    /// Paid out more than was wagered
    pub fn is_win(&self) -> bool {
        self.payout > self.bet
    }
}

/// Receives settled results (balance, history, leaderboard glue)
pub trait ResultSink {
    fn accept(&mut self, result: &GameResult);
}

impl ResultSink for Vec<GameResult> {
    fn accept(&mut self, result: &GameResult) {
        self.push(*result);
    }
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn accept(&mut self, result: &GameResult) {
        (**self).accept(result);
    }
}

/// Discards results
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn accept(&mut self, _result: &GameResult) {}
}

/// Read-only view of the ball for presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

impl From<&Ball> for BallSnapshot {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id,
            x: ball.pos.x,
            y: ball.pos.y,
            vx: ball.vel.x,
            vy: ball.vel.y,
            radius: ball.radius,
        }
    }
}

/// Read-only view of the whole session after a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub ball: Option<BallSnapshot>,
    pub bet: Option<f64>,
    pub time_ticks: u64,
}

/// One Plinko session: board, at most one ball, and the random source
pub struct GameState<E: Entropy = Pcg32> {
    pub(crate) phase: SessionPhase,
    pub(crate) board: Board,
    pub(crate) table: MultiplierTable,
    pub(crate) tuning: PhysicsTuning,
    pub(crate) ball: Option<Ball>,
    pub(crate) bet: f64,
    pub(crate) entropy: E,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    pub(crate) next_ball_id: u64,
    pub(crate) clock: fn() -> f64,
}

impl GameState<Pcg32> {
    /// Session with an OS-seeded random source
    pub fn new(config: BoardConfig) -> Result<Self, PlinkoError> {
        Self::with_entropy(config, entropy::os_seeded())
    }

    /// Reproducible session
    pub fn with_seed(config: BoardConfig, seed: u64) -> Result<Self, PlinkoError> {
        Self::with_entropy(config, entropy::seeded(seed))
    }
}

impl<E: Entropy> GameState<E> {
    /// Session drawing spawn offsets and bounce jitter from `entropy`
    pub fn with_entropy(config: BoardConfig, entropy: E) -> Result<Self, PlinkoError> {
        let table = MultiplierTable::STANDARD;
        let board = Board::generate(config, &table)?;
        Ok(Self {
            phase: SessionPhase::Idle,
            board,
            table,
            tuning: PhysicsTuning::default(),
            ball: None,
            bet: 0.0,
            entropy,
            time_ticks: 0,
            next_ball_id: 1,
            clock: crate::platform::now_ms,
        })
    }

    /// Replace the physics constants. Only allowed between drops.
    pub fn set_tuning(&mut self, tuning: PhysicsTuning) -> Result<(), PlinkoError> {
        if self.phase != SessionPhase::Idle {
            return Err(PlinkoError::BoardBusy);
        }
        if !tuning.is_stable() {
            return Err(PlinkoError::InvalidConfiguration(
                "physics tuning out of range".to_string(),
            ));
        }
        self.tuning = tuning;
        Ok(())
    }

    /// Override the settlement timestamp source
    pub fn set_clock(&mut self, clock: fn() -> f64) {
        self.clock = clock;
    }

    /// Rebuild pegs and slots for a new risk level / row count on the current canvas
    pub fn configure(&mut self, risk: RiskLevel, rows: u8) -> Result<(), PlinkoError> {
        let current = self.board.config;
        self.reconfigure(BoardConfig {
            risk,
            rows,
            ..current
        })
    }

    /// Rebuild pegs and slots for a full configuration. The previous board is discarded.
    pub fn reconfigure(&mut self, config: BoardConfig) -> Result<(), PlinkoError> {
        if self.phase != SessionPhase::Idle {
            log::warn!("Configure ignored: ball {} still dropping", self.next_ball_id - 1);
            return Err(PlinkoError::BoardBusy);
        }
        // Build first so a failure leaves the old board in place
        let board = Board::generate(config, &self.table)?;
        self.board = board;
        Ok(())
    }

    /// Drop a ball with the given bet
    pub fn drop_ball(&mut self, bet: f64) -> Result<u64, PlinkoError> {
        self.drop_ball_inner(bet, None)
    }

    /// Drop a ball, also rejecting bets above the host-reported balance
    pub fn drop_ball_with_balance(&mut self, bet: f64, available: f64) -> Result<u64, PlinkoError> {
        self.drop_ball_inner(bet, Some(available))
    }

    fn drop_ball_inner(&mut self, bet: f64, available: Option<f64>) -> Result<u64, PlinkoError> {
        let rejection = if self.phase != SessionPhase::Idle {
            Some(DropRejection::BallInFlight)
        } else if !(bet.is_finite() && bet > 0.0) {
            Some(DropRejection::NonPositiveBet)
        } else if available.is_some_and(|balance| bet > balance) {
            Some(DropRejection::InsufficientBalance)
        } else {
            None
        };
        if let Some(reason) = rejection {
            log::warn!("Drop rejected (bet {}): {}", bet, reason);
            return Err(PlinkoError::DropRejected(reason));
        }

        let id = self.next_ball_id;
        self.next_ball_id += 1;

        let offset = self.entropy.centered(BALL_SPAWN_JITTER);
        let spawn = Vec2::new(self.board.width() / 2.0 + offset, BALL_SPAWN_Y);
        self.ball = Some(Ball::new(id, spawn));
        self.bet = bet;
        self.phase = SessionPhase::Dropping;

        log::info!("Dropped ball {} at x={:.2} with bet {}", id, spawn.x, bet);
        Ok(id)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn tuning(&self) -> &PhysicsTuning {
        &self.tuning
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            ball: self.ball.as_ref().map(BallSnapshot::from),
            bet: self.ball.as_ref().map(|_| self.bet),
            time_ticks: self.time_ticks,
        }
    }
}
