//! Session statistics
//!
//! Kept in memory for the current session, newest result first.

use serde::{Deserialize, Serialize};

use crate::sim::{GameResult, ResultSink};

/// Maximum number of results to keep
pub const MAX_HISTORY: usize = 50;

/// Number of most recent results considered for the streak figures
pub const STREAK_WINDOW: usize = 5;

/// Rolling history of settled drops
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionStats {
    pub entries: Vec<GameResult>,
}

impl SessionStats {
    /// Create empty history
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a result at the front, trimming the oldest beyond `MAX_HISTORY`
    pub fn record(&mut self, result: GameResult) {
        self.entries.insert(0, result);
        self.entries.truncate(MAX_HISTORY);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_wagered(&self) -> f64 {
        self.entries.iter().map(|r| r.bet).sum()
    }

    pub fn total_paid(&self) -> f64 {
        self.entries.iter().map(|r| r.payout).sum()
    }

    /// Total paid out minus total wagered
    pub fn profit_loss(&self) -> f64 {
        self.entries.iter().map(GameResult::profit).sum()
    }

    pub fn wins(&self) -> usize {
        self.entries.iter().filter(|r| r.is_win()).count()
    }

    /// Percentage of drops that paid more than their bet
    pub fn win_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.wins() as f64 / self.entries.len() as f64 * 100.0
    }

    pub fn average_multiplier(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries.iter().map(|r| r.multiplier).sum::<f64>() / self.entries.len() as f64
    }

    /// Largest single payout
    pub fn biggest_win(&self) -> Option<f64> {
        self.entries.iter().map(|r| r.payout).reduce(f64::max)
    }

    /// Consecutive wins counting back from the latest result (at most `STREAK_WINDOW`)
    pub fn current_streak(&self) -> usize {
        self.entries
            .iter()
            .take(STREAK_WINDOW)
            .take_while(|r| r.is_win())
            .count()
    }

    /// Wins among the latest `STREAK_WINDOW` results, consecutive or not
    pub fn recent_wins(&self) -> usize {
        self.entries
            .iter()
            .take(STREAK_WINDOW)
            .filter(|r| r.is_win())
            .count()
    }

    /// Serializable summary for the host UI
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            games: self.len(),
            wins: self.wins(),
            win_rate: self.win_rate(),
            average_multiplier: self.average_multiplier(),
            total_wagered: self.total_wagered(),
            total_paid: self.total_paid(),
            profit_loss: self.profit_loss(),
            biggest_win: self.biggest_win().unwrap_or(0.0),
            streak: self.current_streak(),
            recent_wins: self.recent_wins(),
        }
    }
}

impl ResultSink for SessionStats {
    fn accept(&mut self, result: &GameResult) {
        self.record(*result);
    }
}

/// Derived statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub games: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub average_multiplier: f64,
    pub total_wagered: f64,
    pub total_paid: f64,
    pub profit_loss: f64,
    pub biggest_win: f64,
    /// Consecutive wins, newest first, capped at `STREAK_WINDOW`
    pub streak: usize,
    /// Wins among the latest `STREAK_WINDOW` results
    pub recent_wins: usize,
}
