//! Autonomous paddle strategies
//!
//! Each variant answers one question per tick: where should the paddle's
//! left edge be? The loop then moves the paddle toward that target under
//! the per-tick speed limit. Strategy-local cursors (current column, sweep
//! direction, RNG) live on the variant, not in the game state.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::GameState;
use crate::config::StrategyKind;

/// Paddle control policy
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Shadow the ball's x position
    Follow,
    /// Camp under one column until it is empty, then move right
    Column(ColumnSweep),
    /// Clear rows bottom to top, serpentine
    Row(RowSweep),
    /// Camp under a seeded-random occupied column
    Random(RandomPick),
}

impl Strategy {
    /// Build the selected policy. The seed only feeds the Random variant's
    /// generator; construction itself never fails - name validation happened
    /// when the configuration was parsed.
    pub fn new(kind: StrategyKind, seed: u64) -> Self {
        match kind {
            StrategyKind::Follow => Strategy::Follow,
            StrategyKind::Column => Strategy::Column(ColumnSweep { col: 0 }),
            StrategyKind::Row => Strategy::Row(RowSweep {
                row: None,
                left_to_right: true,
            }),
            StrategyKind::Random => Strategy::Random(RandomPick {
                rng: Pcg32::seed_from_u64(seed),
                col: None,
            }),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Follow => StrategyKind::Follow,
            Strategy::Column(_) => StrategyKind::Column,
            Strategy::Row(_) => StrategyKind::Row,
            Strategy::Random(_) => StrategyKind::Random,
        }
    }

    /// Target x for the paddle's left edge this tick.
    pub fn decide(&mut self, state: &GameState) -> f64 {
        match self {
            Strategy::Follow => state.ball.pos.x - state.paddle.width / 2.0,
            Strategy::Column(sweep) => sweep.decide(state),
            Strategy::Row(sweep) => sweep.decide(state),
            Strategy::Random(pick) => pick.decide(state),
        }
    }
}

/// Left-to-right column cursor
#[derive(Debug, Clone)]
pub struct ColumnSweep {
    col: usize,
}

impl ColumnSweep {
    fn decide(&mut self, state: &GameState) -> f64 {
        // Advance only once the current column is empty; columns never
        // regain bricks, so the cursor moves strictly left to right.
        while self.col + 1 < state.wall.cols() && state.wall.column_remaining(self.col) == 0 {
            self.col += 1;
        }
        state.playfield.column_center_x(self.col) - state.paddle.width / 2.0
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> usize {
        self.col
    }
}

/// Bottom-to-top serpentine cursor
#[derive(Debug, Clone)]
pub struct RowSweep {
    /// Current target row; None until the first decision
    row: Option<usize>,
    left_to_right: bool,
}

impl RowSweep {
    fn decide(&mut self, state: &GameState) -> f64 {
        let row = match self.row {
            Some(row) => row,
            None => {
                // Start at the bottom-most occupied row
                let start = (0..state.wall.rows())
                    .rev()
                    .find(|&r| state.wall.row_remaining(r) > 0)
                    .unwrap_or(0);
                self.row = Some(start);
                start
            }
        };

        // One reversal per row transition; rows that were already clear are
        // skipped without reversing twice
        let row = if state.wall.row_remaining(row) == 0 {
            match (0..row).rev().find(|&r| state.wall.row_remaining(r) > 0) {
                Some(next) => {
                    self.left_to_right = !self.left_to_right;
                    self.row = Some(next);
                    next
                }
                None => return state.paddle.x,
            }
        } else {
            row
        };

        let target_col = state
            .wall
            .alive()
            .filter(|b| b.row == row)
            .map(|b| b.col)
            .reduce(|a, b| {
                if self.left_to_right { a.min(b) } else { a.max(b) }
            });

        match target_col {
            Some(col) => state.playfield.column_center_x(col) - state.paddle.width / 2.0,
            None => state.paddle.x,
        }
    }

    #[cfg(test)]
    pub(crate) fn direction(&self) -> bool {
        self.left_to_right
    }
}

/// Seeded uniform pick among occupied columns
#[derive(Debug, Clone)]
pub struct RandomPick {
    rng: Pcg32,
    col: Option<usize>,
}

impl RandomPick {
    fn decide(&mut self, state: &GameState) -> f64 {
        let needs_target = match self.col {
            Some(col) => state.wall.column_remaining(col) == 0,
            None => true,
        };
        if needs_target {
            let occupied: Vec<usize> = (0..state.wall.cols())
                .filter(|&c| state.wall.column_remaining(c) > 0)
                .collect();
            if occupied.is_empty() {
                return state.paddle.x;
            }
            self.col = Some(occupied[self.rng.random_range(0..occupied.len())]);
        }

        match self.col {
            Some(col) => state.playfield.column_center_x(col) - state.paddle.width / 2.0,
            None => state.paddle.x,
        }
    }
}
