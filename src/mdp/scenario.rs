//! The reference grid used by the `gridplan` binary and benchmarks.
//!
//! ```text
//!      0    1    2    3    4
//! 0    .    .    .    .  -100
//! 1    .    .    .    .  -100
//! 2    .    X    X    .  -100
//! 3    .    .   +1    .  -100
//! 4    .    X    X    .  -100
//! 5    .    .  +10    .  -100
//! ```

use crate::error::Result;
use crate::mdp::GridModel;

pub const ROWS: usize = 6;
pub const COLS: usize = 5;

pub const OBSTACLES: [(isize, isize); 4] = [(2, 1), (2, 2), (4, 1), (4, 2)];

pub const REWARDS: [(isize, isize, f64); 8] = [
    (3, 2, 1.0),
    (5, 2, 10.0),
    (0, 4, -100.0),
    (1, 4, -100.0),
    (2, 4, -100.0),
    (3, 4, -100.0),
    (4, 4, -100.0),
    (5, 4, -100.0),
];

/// A 6x5 grid with two wall segments, a small and a large reward in the middle
/// column and a penalty strip along the right edge.
pub fn reference_grid() -> Result<GridModel> {
    GridModel::new(ROWS, COLS, &OBSTACLES, &REWARDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_grid_layout() {
        let grid = reference_grid().unwrap();
        assert_eq!(grid.shape(), (6, 5));
        assert_eq!(grid.num_open(), 26);
        assert!(!grid.is_open(2, 1));
        assert!(!grid.is_open(4, 2));
        assert_eq!(grid.reward_at(5, 2), 10.0);
        assert_eq!(grid.reward_at(3, 2), 1.0);
        assert!((0..6).all(|r| grid.reward_at(r, 4) == -100.0));
    }
}
