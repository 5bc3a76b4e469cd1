//! Settlement: mapping a landed ball to its slot and payout

use super::board::{Board, Slot};
use super::state::{Ball, GameResult};

/// Whether the ball has crossed into the slot strip
#[inline]
pub fn has_landed(ball: &Ball, board: &Board) -> bool {
    ball.pos.y > board.landing_line()
}

/// Slot under horizontal position `x`
///
/// Positions left of the board resolve to slot 0 and positions at or past the
/// right edge resolve to the last slot. Drift outside the lattice is a normal
/// landing, not an error.
pub fn slot_index(x: f32, slot_width: f32, slot_count: usize) -> usize {
    let last = slot_count.saturating_sub(1);
    let raw = (x / slot_width).floor();
    if raw.is_nan() || raw < 0.0 {
        0
    } else if raw >= last as f32 {
        last
    } else {
        raw as usize
    }
}

/// Resolve a landed ball into a result
///
/// `slots` must be non-empty; every generated board has at least nine.
pub fn resolve_landing(ball: &Ball, slots: &[Slot], bet: f64, timestamp: f64) -> GameResult {
    let board_width = slots.last().map(Slot::right).unwrap_or(0.0);
    let slot_width = board_width / slots.len() as f32;
    let index = slot_index(ball.pos.x, slot_width, slots.len());
    let slot = &slots[index];
    GameResult::new(ball.id, slot.index, slot.multiplier, bet, timestamp)
}
