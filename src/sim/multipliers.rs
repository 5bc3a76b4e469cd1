//! Payout multiplier tables
//!
//! One table per (risk level, row count). Each table has `rows + 1` entries,
//! one per slot from left to right, and is symmetric with its smallest value at
//! the centre: the edges pay most, the middle pays least.

use serde::{Deserialize, Serialize};

use crate::error::PlinkoError;

/// Variance profile of a multiplier table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    #[default]
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = PlinkoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" | "med" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(PlinkoError::InvalidConfiguration(format!(
                "unknown risk level '{other}'"
            ))),
        }
    }
}

const LOW_8: [f64; 9] = [5.0, 2.0, 1.5, 1.0, 0.5, 1.0, 1.5, 2.0, 5.0];
const LOW_12: [f64; 13] = [
    10.0, 3.0, 2.0, 1.5, 1.0, 0.5, 0.3, 0.5, 1.0, 1.5, 2.0, 3.0, 10.0,
];
const LOW_16: [f64; 17] = [
    25.0, 5.0, 3.0, 2.0, 1.5, 1.0, 0.5, 0.3, 0.3, 0.3, 0.5, 1.0, 1.5, 2.0, 3.0, 5.0, 25.0,
];

const MEDIUM_8: [f64; 9] = [15.0, 5.0, 2.0, 1.0, 0.5, 1.0, 2.0, 5.0, 15.0];
const MEDIUM_12: [f64; 13] = [
    25.0, 8.0, 3.0, 1.5, 1.0, 0.5, 0.3, 0.5, 1.0, 1.5, 3.0, 8.0, 25.0,
];
const MEDIUM_16: [f64; 17] = [
    110.0, 41.0, 10.0, 5.0, 3.0, 1.5, 1.0, 0.5, 0.3, 0.5, 1.0, 1.5, 3.0, 5.0, 10.0, 41.0, 110.0,
];

const HIGH_8: [f64; 9] = [50.0, 15.0, 5.0, 1.0, 0.2, 1.0, 5.0, 15.0, 50.0];
const HIGH_12: [f64; 13] = [
    100.0, 25.0, 8.0, 2.0, 1.0, 0.2, 0.2, 0.2, 1.0, 2.0, 8.0, 25.0, 100.0,
];
const HIGH_16: [f64; 17] = [
    1000.0, 130.0, 26.0, 9.0, 4.0, 2.0, 0.2, 0.2, 0.2, 0.2, 0.2, 2.0, 4.0, 9.0, 26.0, 130.0,
    1000.0,
];

/// Read-only payout tables, fixed at startup
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplierTable;

impl MultiplierTable {
    /// The standard table set
    pub const STANDARD: MultiplierTable = MultiplierTable;

    /// Multipliers for one configuration, left to right
    pub fn lookup(&self, risk: RiskLevel, rows: u8) -> Result<&'static [f64], PlinkoError> {
        let table: &'static [f64] = match (risk, rows) {
            (RiskLevel::Low, 8) => &LOW_8,
            (RiskLevel::Low, 12) => &LOW_12,
            (RiskLevel::Low, 16) => &LOW_16,
            (RiskLevel::Medium, 8) => &MEDIUM_8,
            (RiskLevel::Medium, 12) => &MEDIUM_12,
            (RiskLevel::Medium, 16) => &MEDIUM_16,
            (RiskLevel::High, 8) => &HIGH_8,
            (RiskLevel::High, 12) => &HIGH_12,
            (RiskLevel::High, 16) => &HIGH_16,
            _ => return Err(PlinkoError::UnsupportedTable { risk, rows }),
        };
        Ok(table)
    }

    /// Whether a (risk, rows) pair has a table
    pub fn supports(&self, risk: RiskLevel, rows: u8) -> bool {
        self.lookup(risk, rows).is_ok()
    }

    /// Expected multiplier if landings followed the ideal Galton distribution
    /// `C(rows, k) / 2^rows`
    pub fn binomial_return(&self, risk: RiskLevel, rows: u8) -> Result<f64, PlinkoError> {
        let table = self.lookup(risk, rows)?;
        Ok(binomial_weights(rows)
            .iter()
            .zip(table)
            .map(|(p, m)| p * m)
            .sum())
    }
}

/// Probability of each of the `rows + 1` slots under a fair binomial walk
pub fn binomial_weights(rows: u8) -> Vec<f64> {
    let n = rows as u32;
    let total = 2f64.powi(n as i32);
    let mut weights = Vec::with_capacity(n as usize + 1);
    let mut coeff = 1f64;
    for k in 0..=n {
        weights.push(coeff / total);
        coeff = coeff * (n - k) as f64 / (k + 1) as f64;
    }
    weights
}

/// Slot label as shown on the board ("1K", "130", "26x", "0.2x")
pub fn format_multiplier(multiplier: f64) -> String {
    if multiplier >= 1000.0 {
        "1K".to_string()
    } else if multiplier >= 100.0 {
        format!("{}", multiplier)
    } else {
        format!("{}x", multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn all_tables() -> Vec<(RiskLevel, u8, &'static [f64])> {
        let mut out = Vec::new();
        for risk in RiskLevel::ALL {
            for rows in crate::consts::ROW_COUNTS {
                out.push((risk, rows, MultiplierTable::STANDARD.lookup(risk, rows).unwrap()));
            }
        }
        out
    }

    #[test]
    fn test_every_table_has_one_entry_per_slot() {
        for (risk, rows, table) in all_tables() {
            assert_eq!(table.len(), rows as usize + 1, "{risk:?}/{rows}");
        }
    }

    #[test]
    fn test_tables_are_symmetric_with_min_at_centre() {
        for (risk, rows, table) in all_tables() {
            let n = table.len();
            for i in 0..n {
                assert_eq!(table[i], table[n - 1 - i], "{risk:?}/{rows} index {i}");
            }
            let min = table.iter().cloned().fold(f64::INFINITY, f64::min);
            let centre = n / 2;
            let at_or_adjacent = table[centre] == min
                || table[centre.saturating_sub(1)] == min
                || table.get(centre + 1) == Some(&min);
            assert!(at_or_adjacent, "{risk:?}/{rows} minimum not at centre");
            // Non-increasing toward the centre
            for i in 0..centre {
                assert!(table[i] >= table[i + 1], "{risk:?}/{rows} index {i}");
            }
        }
    }

    #[test]
    fn test_high_16_values() {
        let table = MultiplierTable::STANDARD.lookup(RiskLevel::High, 16).unwrap();
        assert_eq!(table[0], 1000.0);
        assert_eq!(table[8], 0.2);
        for m in table {
            assert!([1000.0, 130.0, 26.0, 9.0, 4.0, 2.0, 0.2].contains(m));
        }
    }

    #[test]
    fn test_unsupported_rows_rejected() {
        let err = MultiplierTable::STANDARD.lookup(RiskLevel::Low, 10).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(!MultiplierTable::STANDARD.supports(RiskLevel::Medium, 0));
    }

    #[test]
    fn test_binomial_weights_sum_to_one() {
        for rows in crate::consts::ROW_COUNTS {
            let w = binomial_weights(rows);
            assert_eq!(w.len(), rows as usize + 1);
            let sum: f64 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
        // C(8,4)/256
        assert!((binomial_weights(8)[4] - 70.0 / 256.0).abs() < 1e-12);
    }

    #[test]
    fn test_binomial_return_is_positive() {
        for (risk, rows, _) in all_tables() {
            let rtp = MultiplierTable::STANDARD.binomial_return(risk, rows).unwrap();
            assert!(rtp > 0.0 && rtp.is_finite());
        }
    }

    #[test]
    fn test_format_multiplier() {
        assert_eq!(format_multiplier(1000.0), "1K");
        assert_eq!(format_multiplier(130.0), "130");
        assert_eq!(format_multiplier(26.0), "26x");
        assert_eq!(format_multiplier(0.2), "0.2x");
    }

    #[test]
    fn test_risk_level_parse() {
        assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!("med".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert!("extreme".parse::<RiskLevel>().is_err());
    }

    proptest! {
        #[test]
        fn prop_only_supported_rows_resolve(rows in 0u8..=32) {
            let supported = crate::consts::ROW_COUNTS.contains(&rows);
            for risk in RiskLevel::ALL {
                prop_assert_eq!(MultiplierTable::STANDARD.supports(risk, rows), supported);
            }
        }
    }
}
