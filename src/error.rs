//! Error types for configuration, drops and simulation faults

use serde::Serialize;
use thiserror::Error;

use crate::sim::RiskLevel;

/// Why a drop request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
pub enum DropRejection {
    #[error("a ball is already in flight")]
    BallInFlight,

    #[error("bet must be positive")]
    NonPositiveBet,

    #[error("bet exceeds available balance")]
    InsufficientBalance,
}

/// Errors surfaced to the host
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlinkoError {
    #[error("no multiplier table for {risk:?} risk with {rows} rows")]
    UnsupportedTable { risk: RiskLevel, rows: u8 },

    #[error("invalid board configuration: {0}")]
    InvalidConfiguration(String),

    #[error("drop rejected: {0}")]
    DropRejected(DropRejection),

    #[error("board cannot be regenerated while a ball is dropping")]
    BoardBusy,
}

impl PlinkoError {
    /// True for any configuration failure, including unsupported tables
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            PlinkoError::UnsupportedTable { .. } | PlinkoError::InvalidConfiguration(_)
        )
    }
}

/// Fatal numeric fault in a ball's flight. The ball is discarded without a result.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize)]
pub enum SimulationError {
    #[error("ball state became non-finite")]
    NonFinite,

    #[error("ball speed {speed} exceeded limit {limit}")]
    SpeedLimit { speed: f32, limit: f32 },

    #[error("ball failed to settle within {ticks} ticks")]
    FlightTimeout { ticks: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_rejection_messages() {
        assert_eq!(DropRejection::BallInFlight.to_string(), "a ball is already in flight");
        let err = PlinkoError::DropRejected(DropRejection::InsufficientBalance);
        assert_eq!(err.to_string(), "drop rejected: bet exceeds available balance");
        assert!(!err.is_invalid_configuration());
    }
}
