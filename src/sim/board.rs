//! Board generation
//!
//! Builds the triangular peg lattice and the slot strip for a configuration.
//! Geometry is a pure function of the configuration: no randomness.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::multipliers::{MultiplierTable, RiskLevel};
use crate::consts::*;
use crate::error::PlinkoError;

/// Immutable board configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: u8,
    pub risk: RiskLevel,
    pub width: f32,
    pub height: f32,
}

impl BoardConfig {
    /// Validate and build a configuration
    pub fn new(risk: RiskLevel, rows: u8, width: f32, height: f32) -> Result<Self, PlinkoError> {
        let config = Self {
            rows,
            risk,
            width,
            height,
        };
        config.validate(&MultiplierTable::STANDARD)?;
        Ok(config)
    }

    /// Configuration on the default 800x380 canvas
    pub fn with_defaults(risk: RiskLevel, rows: u8) -> Result<Self, PlinkoError> {
        Self::new(risk, rows, BOARD_WIDTH, BOARD_HEIGHT)
    }

    fn validate(&self, table: &MultiplierTable) -> Result<(), PlinkoError> {
        if !table.supports(self.risk, self.rows) {
            return Err(PlinkoError::UnsupportedTable {
                risk: self.risk,
                rows: self.rows,
            });
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(PlinkoError::InvalidConfiguration(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > TOP_MARGIN + SLOT_HEIGHT) {
            return Err(PlinkoError::InvalidConfiguration(format!(
                "height must exceed {}, got {}",
                TOP_MARGIN + SLOT_HEIGHT,
                self.height
            )));
        }
        Ok(())
    }
}

/// A fixed circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    pub radius: f32,
}

/// A bucket in the bottom strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub multiplier: f64,
}

impl Slot {
    /// Right edge (exclusive)
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Pegs and slots for one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub config: BoardConfig,
    pub pegs: Vec<Peg>,
    pub slots: Vec<Slot>,
    /// Width shared by every slot (also the horizontal peg pitch)
    pub slot_width: f32,
    /// Vertical distance between peg rows
    pub row_spacing: f32,
}

impl Board {
    /// Generate the board for a configuration
    pub fn generate(config: BoardConfig, table: &MultiplierTable) -> Result<Self, PlinkoError> {
        config.validate(table)?;
        let multipliers = table.lookup(config.risk, config.rows)?;

        let rows = config.rows as usize;
        let slot_count = multipliers.len();
        let slot_width = config.width / slot_count as f32;
        let row_spacing = (config.height - TOP_MARGIN - SLOT_HEIGHT) / rows as f32;
        let slot_y = config.height - SLOT_HEIGHT;

        // Widths come from consecutive edges so x + width lands exactly on the next edge
        let edge = |i: usize| {
            if i == slot_count {
                config.width
            } else {
                i as f32 * config.width / slot_count as f32
            }
        };
        let slots = multipliers
            .iter()
            .enumerate()
            .map(|(index, &multiplier)| Slot {
                index,
                x: edge(index),
                y: slot_y,
                width: edge(index + 1) - edge(index),
                height: SLOT_HEIGHT,
                multiplier,
            })
            .collect();

        // Row r has r + 1 pegs, centred, pitch = slot width so rows interleave
        let center_x = config.width / 2.0;
        let mut pegs = Vec::with_capacity(rows * (rows + 1) / 2);
        for row in 0..rows {
            let pegs_in_row = row + 1;
            let row_y = TOP_MARGIN + row as f32 * row_spacing;
            let row_width = (pegs_in_row - 1) as f32 * slot_width;
            let start_x = center_x - row_width / 2.0;
            for col in 0..pegs_in_row {
                pegs.push(Peg {
                    pos: Vec2::new(start_x + col as f32 * slot_width, row_y),
                    radius: PEG_RADIUS,
                });
            }
        }

        log::info!(
            "Generated {:?}/{} board: {} pegs, {} slots ({}x{})",
            config.risk,
            config.rows,
            pegs.len(),
            slot_count,
            config.width,
            config.height
        );

        Ok(Self {
            config,
            pegs,
            slots,
            slot_width,
            row_spacing,
        })
    }

    /// Vertical position past which a ball counts as landed
    pub fn landing_line(&self) -> f32 {
        self.config.height - SLOT_HEIGHT - LANDING_EPSILON
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn board(risk: RiskLevel, rows: u8) -> Board {
        let config = BoardConfig::with_defaults(risk, rows).unwrap();
        Board::generate(config, &MultiplierTable::STANDARD).unwrap()
    }

    #[test]
    fn test_peg_rows_are_triangular() {
        let b = board(RiskLevel::Low, 8);
        assert_eq!(b.pegs.len(), 8 * 9 / 2);
        // Row 0: single peg at centre, TOP_MARGIN below the top edge
        assert_eq!(b.pegs[0].pos, Vec2::new(BOARD_WIDTH / 2.0, TOP_MARGIN));
        // Row 1: two pegs straddling the centre
        let left = b.pegs[1].pos;
        let right = b.pegs[2].pos;
        assert!((left.x + right.x - BOARD_WIDTH).abs() < 1e-3);
        assert!((right.x - left.x - b.slot_width).abs() < 1e-3);
        assert!((left.y - (TOP_MARGIN + b.row_spacing)).abs() < 1e-3);
    }

    #[test]
    fn test_row_spacing() {
        let b = board(RiskLevel::Medium, 12);
        let expected = (BOARD_HEIGHT - TOP_MARGIN - SLOT_HEIGHT) / 12.0;
        assert!((b.row_spacing - expected).abs() < 1e-5);
        let last = b.pegs.last().unwrap();
        assert!((last.pos.y - (TOP_MARGIN + 11.0 * expected)).abs() < 1e-3);
        assert!(last.pos.y < b.landing_line());
    }

    #[test]
    fn test_slot_multipliers_follow_table() {
        let b = board(RiskLevel::High, 16);
        let table = MultiplierTable::STANDARD.lookup(RiskLevel::High, 16).unwrap();
        assert_eq!(b.slots.len(), 17);
        for (slot, m) in b.slots.iter().zip(table) {
            assert_eq!(slot.multiplier, *m);
            assert_eq!(slot.y, BOARD_HEIGHT - SLOT_HEIGHT);
            assert_eq!(slot.height, SLOT_HEIGHT);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = board(RiskLevel::High, 12);
        let b = board(RiskLevel::High, 12);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_configurations() {
        assert!(BoardConfig::new(RiskLevel::Low, 10, 800.0, 380.0)
            .unwrap_err()
            .is_invalid_configuration());
        assert!(BoardConfig::new(RiskLevel::Low, 8, 0.0, 380.0).is_err());
        assert!(BoardConfig::new(RiskLevel::Low, 8, f32::NAN, 380.0).is_err());
        assert!(BoardConfig::new(RiskLevel::Low, 8, 800.0, 100.0).is_err());
    }

    proptest! {
        #[test]
        fn prop_slots_tile_width(
            risk_idx in 0usize..3,
            rows_idx in 0usize..3,
            width in 50.0f32..4000.0,
            height in 200.0f32..4000.0,
        ) {
            let risk = RiskLevel::ALL[risk_idx];
            let rows = ROW_COUNTS[rows_idx];
            let config = BoardConfig::new(risk, rows, width, height).unwrap();
            let b = Board::generate(config, &MultiplierTable::STANDARD).unwrap();

            prop_assert_eq!(b.slots.len(), rows as usize + 1);
            prop_assert_eq!(b.slots[0].x, 0.0);
            for pair in b.slots.windows(2) {
                prop_assert_eq!(pair[0].right(), pair[1].x);
                prop_assert_eq!(pair[0].index + 1, pair[1].index);
                prop_assert!(pair[0].width > 0.0);
            }
            let last = b.slots.last().unwrap();
            prop_assert_eq!(last.right(), width);
        }

        #[test]
        fn prop_pegs_inside_board(rows_idx in 0usize..3, width in 100.0f32..2000.0) {
            let rows = ROW_COUNTS[rows_idx];
            let config = BoardConfig::new(RiskLevel::Low, rows, width, BOARD_HEIGHT).unwrap();
            let b = Board::generate(config, &MultiplierTable::STANDARD).unwrap();
            for peg in &b.pegs {
                prop_assert!(peg.pos.x > 0.0 && peg.pos.x < width);
                prop_assert!(peg.pos.y >= TOP_MARGIN && peg.pos.y < BOARD_HEIGHT - SLOT_HEIGHT);
            }
        }
    }
}
