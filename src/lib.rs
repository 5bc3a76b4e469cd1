//! Plinko simulation core
//!
//! Core modules:
//! - `sim`: Board generation, ball physics, collisions and settlement
//! - `autoplay`: Auto-play runs with stop conditions
//! - `stats`: Session statistics over settled results
//! - `settings`: Player configuration and physics tuning
//! - `audit`: Headless fairness audit (landing distribution vs. payout table)
//! - `platform`: Browser/native platform abstraction

pub mod audit;
pub mod autoplay;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod stats;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use autoplay::{AutoPlay, AutoPlaySettings, AutoPlayStop};
pub use error::{DropRejection, PlinkoError, SimulationError};
pub use settings::Settings;
pub use stats::SessionStats;

/// Board geometry and simulation constants
pub mod consts {
    /// One simulation tick. Physics constants are expressed per tick, not per second.
    pub const SIM_DT: f32 = 1.0;
    /// Maximum sub-steps a single tick may be split into
    pub const MAX_SUBSTEPS: u32 = 16;

    /// Default board extent (canvas pixels)
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 380.0;
    /// Distance from the top edge to the first peg row
    pub const TOP_MARGIN: f32 = 80.0;
    /// Height of the slot strip along the bottom edge
    pub const SLOT_HEIGHT: f32 = 50.0;

    /// Peg defaults
    pub const PEG_RADIUS: f32 = 3.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Spawn height, above the first peg row
    pub const BALL_SPAWN_Y: f32 = 50.0;
    /// Horizontal spawn offset from centre is uniform in [-JITTER/2, JITTER/2)
    pub const BALL_SPAWN_JITTER: f32 = 40.0;
    /// Ball settles once it passes `height - SLOT_HEIGHT - LANDING_EPSILON`
    pub const LANDING_EPSILON: f32 = 10.0;

    /// Supported row counts
    pub const ROW_COUNTS: [u8; 3] = [8, 12, 16];
}
