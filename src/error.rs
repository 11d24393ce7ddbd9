use thiserror::Error;

use crate::mdp::Action;

/// Errors raised while building a grid model or running a solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MdpError {
    /// An action tag outside `up`, `down`, `left`, `right`, `stay`.
    #[error("invalid action tag: {0:?}")]
    InvalidAction(String),

    #[error("grid dimensions must be at least 1x1, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// A configured coordinate lies outside `[0, rows) x [0, cols)`.
    #[error("coordinate ({row}, {col}) lies outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: isize,
        col: isize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("grid shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The iteration cap was reached before the stopping criterion held.
    #[error("{solver} did not converge within {iterations} iterations (last delta {delta})")]
    NotConverged {
        solver: &'static str,
        iterations: usize,
        delta: f64,
    },

    /// Policy iteration hit its round cap while the policy was still changing.
    #[error("policy iteration still changed {changed} cells after {rounds} rounds")]
    PolicyUnstable { rounds: usize, changed: usize },

    #[error("policy moves {action} from ({row}, {col}) into a blocked cell")]
    BlockedMove { row: isize, col: isize, action: Action },

    #[error("walk exceeded {limit} steps without reaching a stay action")]
    StepLimitExceeded { limit: usize },
}

impl MdpError {
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        MdpError::InvalidParameter(msg.into())
    }

    pub(crate) fn out_of_bounds(row: isize, col: isize, rows: usize, cols: usize) -> Self {
        MdpError::OutOfBounds {
            row,
            col,
            rows,
            cols,
        }
    }
}

pub type Result<T> = std::result::Result<T, MdpError>;
