//! Headless fairness audit
//!
//! Drops many balls through a seeded session and compares the observed landing
//! distribution and mean multiplier with the ideal binomial expectation for
//! the configured table.

use serde::Serialize;

use crate::error::PlinkoError;
use crate::sim::{
    BoardConfig, GameResult, GameState, MultiplierTable, PhysicsTuning, ResultSink, TickOutcome,
    binomial_weights, run_to_settlement,
};

/// Audit report for one configuration
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub config: BoardConfig,
    pub seed: u64,
    pub drops: u32,
    pub settled: u32,
    pub faulted: u32,
    /// Landings per slot, left to right
    pub histogram: Vec<u32>,
    /// Multiplier per slot
    pub multipliers: Vec<f64>,
    /// Mean multiplier over settled drops
    pub observed_return: f64,
    /// Mean multiplier if landings were binomial
    pub binomial_return: f64,
    /// Total ticks simulated
    pub ticks: u64,
}

impl AuditReport {
    /// Observed landing frequency per slot
    pub fn frequencies(&self) -> Vec<f64> {
        let total = self.settled.max(1) as f64;
        self.histogram.iter().map(|&n| n as f64 / total).collect()
    }

    /// Ideal binomial frequency per slot
    pub fn expected_frequencies(&self) -> Vec<f64> {
        binomial_weights(self.config.rows)
    }
}

/// Tallies settled results into per-slot counts
struct Tally {
    histogram: Vec<u32>,
    multiplier_sum: f64,
    settled: u32,
}

impl ResultSink for Tally {
    fn accept(&mut self, result: &GameResult) {
        if let Some(count) = self.histogram.get_mut(result.slot_index) {
            *count += 1;
        }
        self.multiplier_sum += result.multiplier;
        self.settled += 1;
    }
}

/// Run `drops` unit bets through a session seeded with `seed`
pub fn run_audit(
    config: BoardConfig,
    drops: u32,
    seed: u64,
    tuning: PhysicsTuning,
) -> Result<AuditReport, PlinkoError> {
    let mut state = GameState::with_seed(config, seed)?;
    state.set_tuning(tuning)?;
    state.set_clock(|| 0.0);

    let multipliers = state.board().slots.iter().map(|s| s.multiplier).collect::<Vec<_>>();
    let mut tally = Tally {
        histogram: vec![0; multipliers.len()],
        multiplier_sum: 0.0,
        settled: 0,
    };
    let mut faulted = 0;

    for _ in 0..drops {
        state.drop_ball(1.0)?;
        if let TickOutcome::Faulted(err) = run_to_settlement(&mut state, &mut tally) {
            log::warn!("Audit drop faulted: {err}");
            faulted += 1;
        }
    }

    let observed_return = if tally.settled > 0 {
        tally.multiplier_sum / tally.settled as f64
    } else {
        0.0
    };
    let binomial_return = MultiplierTable::STANDARD.binomial_return(config.risk, config.rows)?;

    log::info!(
        "Audit {:?}/{}: {} drops, observed return {:.4}, binomial {:.4}, {} faulted",
        config.risk,
        config.rows,
        drops,
        observed_return,
        binomial_return,
        faulted
    );

    Ok(AuditReport {
        config,
        seed,
        drops,
        settled: tally.settled,
        faulted,
        histogram: tally.histogram,
        multipliers,
        observed_return,
        binomial_return,
        ticks: state.time_ticks(),
    })
}
