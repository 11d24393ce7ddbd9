//! Grid dimensions, obstacles and rewards.

use std::collections::HashMap;
use std::fmt;

use bitvec::prelude::*;

use crate::error::{MdpError, Result};
use crate::mdp::Action;

/// A cell coordinate. Coordinates may point off the grid (for example the
/// intended target of a move into a wall); [`GridModel::is_open`] decides
/// whether a state is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    pub row: isize,
    pub col: isize,
}

impl State {
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// The neighbouring coordinate reached by `action`, open or not.
    pub fn step(self, action: Action) -> State {
        let (dr, dc) = action.delta();
        State::new(self.row + dr, self.col + dc)
    }
}

impl From<(isize, isize)> for State {
    fn from((row, col): (isize, isize)) -> Self {
        State::new(row, col)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An immutable `rows x cols` grid with an obstacle mask and a sparse reward map.
///
/// Rows grow downward and columns grow rightward, so [`Action::Up`] decreases
/// the row index. Cells without an explicit reward have reward 0.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    rows: usize,
    cols: usize,
    /// Row-major, `true` marks an obstacle.
    obstacles: BitVec,
    rewards: HashMap<(usize, usize), f64>,
}

impl GridModel {
    /// Builds a grid from obstacle coordinates and `(row, col, reward)` triples.
    ///
    /// # Errors
    /// * `InvalidDimensions` if either dimension is zero
    /// * `OutOfBounds` if any obstacle or reward lies outside the grid
    /// * `InvalidParameter` if a reward is not finite
    ///
    /// When the same cell is given several rewards, the last one wins.
    ///
    /// # Examples
    /// ```
    /// use gridplan::mdp::GridModel;
    ///
    /// let grid = GridModel::new(2, 3, &[(1, 1)], &[(0, 2, 10.0)]).unwrap();
    /// assert!(grid.is_open(0, 0));
    /// assert!(!grid.is_open(1, 1));
    /// assert!(!grid.is_open(-1, 0));
    /// assert_eq!(grid.reward_at(0, 2), 10.0);
    /// assert_eq!(grid.reward_at(0, 0), 0.0);
    /// ```
    pub fn new(
        rows: usize,
        cols: usize,
        obstacles: &[(isize, isize)],
        rewards: &[(isize, isize, f64)],
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MdpError::InvalidDimensions { rows, cols });
        }

        let mut mask = bitvec![0; rows * cols];
        for &(row, col) in obstacles {
            let (r, c) = Self::checked_cell(row, col, rows, cols)?;
            mask.set(r * cols + c, true);
        }

        let mut reward_map = HashMap::with_capacity(rewards.len());
        for &(row, col, value) in rewards {
            let cell = Self::checked_cell(row, col, rows, cols)?;
            if !value.is_finite() {
                return Err(MdpError::invalid_parameter(format!(
                    "reward at ({row}, {col}) must be finite, got {value}"
                )));
            }
            reward_map.insert(cell, value);
        }

        Ok(Self {
            rows,
            cols,
            obstacles: mask,
            rewards: reward_map,
        })
    }

    /// An open grid with no obstacles and no rewards.
    pub fn open(rows: usize, cols: usize) -> Result<Self> {
        Self::new(rows, cols, &[], &[])
    }

    fn checked_cell(row: isize, col: isize, rows: usize, cols: usize) -> Result<(usize, usize)> {
        if row < 0 || col < 0 || row as usize >= rows || col as usize >= cols {
            return Err(MdpError::out_of_bounds(row, col, rows, cols));
        }
        Ok((row as usize, col as usize))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`, the shape of every value and policy grid for this model.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// True when `(row, col)` is inside the grid and not an obstacle.
    pub fn is_open(&self, row: isize, col: isize) -> bool {
        self.in_bounds(row, col) && !self.obstacles[row as usize * self.cols + col as usize]
    }

    pub fn is_open_state(&self, state: State) -> bool {
        self.is_open(state.row, state.col)
    }

    /// Reward for entering `(row, col)`; 0 when none was configured. Defined for
    /// every coordinate, obstacles and off-grid cells included.
    pub fn reward_at(&self, row: isize, col: isize) -> f64 {
        if !self.in_bounds(row, col) {
            return 0.0;
        }
        self.rewards
            .get(&(row as usize, col as usize))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn reward_at_state(&self, state: State) -> f64 {
        self.reward_at(state.row, state.col)
    }

    /// Open cells in row-major order.
    pub fn open_states(&self) -> impl Iterator<Item = State> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols)
                .map(move |c| State::new(r as isize, c as isize))
                .filter(move |s| self.is_open_state(*s))
        })
    }

    pub fn num_open(&self) -> usize {
        self.rows * self.cols - self.obstacles.count_ones()
    }

    /// Array index of an in-bounds state.
    pub(crate) fn ix(&self, state: State) -> [usize; 2] {
        debug_assert!(self.in_bounds(state.row, state.col));
        [state.row as usize, state.col as usize]
    }

    /// Fails with `ShapeMismatch` unless `found` equals this grid's shape.
    pub(crate) fn check_shape(&self, found: (usize, usize)) -> Result<()> {
        if found != self.shape() {
            return Err(MdpError::ShapeMismatch {
                expected: self.shape(),
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> GridModel {
        GridModel::new(3, 4, &[(1, 1), (2, 3)], &[(0, 3, 1.0), (2, 0, -5.0)]).unwrap()
    }

    #[test]
    fn test_is_open() {
        let grid = sample_grid();
        assert!(grid.is_open(0, 0));
        assert!(grid.is_open(2, 2));
        assert!(!grid.is_open(1, 1));
        assert!(!grid.is_open(2, 3));
        assert!(!grid.is_open(-1, 0));
        assert!(!grid.is_open(0, -1));
        assert!(!grid.is_open(3, 0));
        assert!(!grid.is_open(0, 4));
    }

    #[test]
    fn test_reward_lookup_defaults_to_zero() {
        let grid = sample_grid();
        assert_eq!(grid.reward_at(0, 3), 1.0);
        assert_eq!(grid.reward_at(2, 0), -5.0);
        assert_eq!(grid.reward_at(0, 0), 0.0);
        assert_eq!(grid.reward_at(1, 1), 0.0);
        assert_eq!(grid.reward_at(-3, 9), 0.0);
    }

    #[test]
    fn test_reward_on_obstacle_is_still_reported() {
        let grid = GridModel::new(2, 2, &[(0, 1)], &[(0, 1, 7.0)]).unwrap();
        assert!(!grid.is_open(0, 1));
        assert_eq!(grid.reward_at(0, 1), 7.0);
    }

    #[test]
    fn test_open_states_skip_obstacles() {
        let grid = sample_grid();
        let open: Vec<State> = grid.open_states().collect();
        assert_eq!(open.len(), 10);
        assert_eq!(grid.num_open(), 10);
        assert_eq!(open[0], State::new(0, 0));
        assert!(!open.contains(&State::new(1, 1)));
        assert!(!open.contains(&State::new(2, 3)));
    }

    #[test]
    fn test_rejects_empty_grid() {
        assert_eq!(
            GridModel::open(0, 3).unwrap_err(),
            MdpError::InvalidDimensions { rows: 0, cols: 3 }
        );
        assert!(GridModel::open(2, 0).is_err());
    }

    #[test]
    fn test_rejects_out_of_bounds_configuration() {
        let err = GridModel::new(2, 2, &[(2, 0)], &[]).unwrap_err();
        assert!(matches!(err, MdpError::OutOfBounds { row: 2, col: 0, .. }));

        let err = GridModel::new(2, 2, &[], &[(0, -1, 1.0)]).unwrap_err();
        assert!(matches!(err, MdpError::OutOfBounds { row: 0, col: -1, .. }));
    }

    #[test]
    fn test_rejects_non_finite_reward() {
        let err = GridModel::new(2, 2, &[], &[(0, 0, f64::NAN)]).unwrap_err();
        assert!(matches!(err, MdpError::InvalidParameter(_)));
    }

    #[test]
    fn test_last_duplicate_reward_wins() {
        let grid = GridModel::new(1, 2, &[], &[(0, 1, 1.0), (0, 1, 3.0)]).unwrap();
        assert_eq!(grid.reward_at(0, 1), 3.0);
    }

    #[test]
    fn test_state_step() {
        let s = State::new(1, 1);
        assert_eq!(s.step(Action::Up), State::new(0, 1));
        assert_eq!(s.step(Action::Down), State::new(2, 1));
        assert_eq!(s.step(Action::Left), State::new(1, 0));
        assert_eq!(s.step(Action::Right), State::new(1, 2));
        assert_eq!(s.step(Action::Stay), s);
        assert_eq!(State::new(0, 0).step(Action::Up), State::new(-1, 0));
    }
}
