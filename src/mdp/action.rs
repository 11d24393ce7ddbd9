//! The five moves available to the agent.

use std::fmt;
use std::str::FromStr;

use crate::error::MdpError;

/// A move on the 4-connected grid, or staying put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    #[default]
    Stay,
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Every action in the order backups scan them. Ties between equally valued
    /// actions resolve to the earliest entry.
    pub const ALL: [Action; 5] = [
        Action::Stay,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
    ];

    /// The four directional actions, in the same relative order as [`Action::ALL`].
    pub const DIRECTIONS: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Row and column offset applied by this action.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Stay => (0, 0),
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
        }
    }

    pub fn is_stay(self) -> bool {
        self == Action::Stay
    }

    /// The tag used when parsing and rendering policies.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Stay => "stay",
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = MdpError;

    /// Parses an action tag. `none` is accepted as a synonym for `stay`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stay" | "none" => Ok(Action::Stay),
            "up" => Ok(Action::Up),
            "down" => Ok(Action::Down),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            other => Err(MdpError::InvalidAction(other.to_string())),
        }
    }
}
