//! Plinko simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering:
//! - Fixed tick units only, no wall-clock scaling
//! - Randomness only through an injected `Entropy` source
//! - Pegs resolved in generation order
//! - No rendering or platform dependencies

pub mod board;
pub mod collision;
pub mod entropy;
pub mod landing;
pub mod multipliers;
pub mod physics;
pub mod state;
pub mod tick;

pub use board::{Board, BoardConfig, Peg, Slot};
pub use collision::{CollisionResult, ball_peg_collision, resolve_collisions};
pub use entropy::{Entropy, FixedEntropy};
pub use landing::{has_landed, resolve_landing, slot_index};
pub use multipliers::{MultiplierTable, RiskLevel, binomial_weights, format_multiplier};
pub use physics::{PhysicsTuning, step};
pub use state::{
    Ball, BallSnapshot, GameResult, GameState, NullSink, ResultSink, SessionPhase, Snapshot,
};
pub use tick::{TickOutcome, abandon, run_to_settlement, tick};
