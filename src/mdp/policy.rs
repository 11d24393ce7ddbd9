use std::fmt;

use ndarray::Array2;

use crate::error::{MdpError, Result};
use crate::mdp::{Action, GridModel, State};

/// One action per grid cell. Entries for obstacle cells are kept at `Stay`
/// and carry no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    actions: Array2<Action>,
}

impl Policy {
    /// A policy that stays everywhere.
    pub fn new(grid: &GridModel) -> Self {
        Self {
            actions: Array2::from_elem(grid.shape(), Action::Stay),
        }
    }

    /// `action` on every open cell, `Stay` on obstacles.
    pub fn uniform(grid: &GridModel, action: Action) -> Self {
        let mut policy = Self::new(grid);
        for state in grid.open_states() {
            policy.set(state, action);
        }
        policy
    }

    /// Wraps an existing action grid after checking it matches `grid`.
    pub fn from_array(grid: &GridModel, actions: Array2<Action>) -> Result<Self> {
        grid.check_shape(actions.dim())?;
        Ok(Self { actions })
    }

    /// Builds a policy from rows of action tags such as `"up"` or `"stay"`.
    ///
    /// # Examples
    /// ```
    /// use gridplan::mdp::{Action, GridModel, Policy, State};
    ///
    /// let grid = GridModel::open(1, 3).unwrap();
    /// let policy = Policy::from_tags(&grid, &[vec!["right", "right", "stay"]]).unwrap();
    /// assert_eq!(policy.get(State::new(0, 0)), Some(Action::Right));
    /// assert!(Policy::from_tags(&grid, &[vec!["right", "jump", "stay"]]).is_err());
    /// ```
    pub fn from_tags<S: AsRef<str>>(grid: &GridModel, rows: &[Vec<S>]) -> Result<Self> {
        let found_cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != found_cols) {
            return Err(MdpError::invalid_parameter("policy rows differ in length"));
        }
        grid.check_shape((rows.len(), found_cols))?;

        let mut policy = Self::new(grid);
        for (r, row) in rows.iter().enumerate() {
            for (c, tag) in row.iter().enumerate() {
                policy.actions[[r, c]] = tag.as_ref().parse()?;
            }
        }
        Ok(policy)
    }

    /// The action for `state`, or `None` off the grid.
    pub fn get(&self, state: State) -> Option<Action> {
        if state.row < 0 || state.col < 0 {
            return None;
        }
        self.actions
            .get([state.row as usize, state.col as usize])
            .copied()
    }

    pub(crate) fn set(&mut self, state: State, action: Action) {
        self.actions[[state.row as usize, state.col as usize]] = action;
    }

    pub(crate) fn at(&self, state: State) -> Action {
        self.actions[[state.row as usize, state.col as usize]]
    }

    pub fn as_array(&self) -> &Array2<Action> {
        &self.actions
    }

    pub fn shape(&self) -> (usize, usize) {
        self.actions.dim()
    }

    /// Renders the policy as rows of strings: `"X"` on obstacles, the action tag elsewhere.
    pub fn render(&self, grid: &GridModel) -> Vec<Vec<String>> {
        (0..grid.rows())
            .map(|r| {
                (0..grid.cols())
                    .map(|c| {
                        let state = State::new(r as isize, c as isize);
                        if grid.is_open_state(state) {
                            self.at(state).to_string()
                        } else {
                            "X".to_string()
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// A [`fmt::Display`] adapter printing one bracketed row per line.
    pub fn display<'a>(&'a self, grid: &'a GridModel) -> PolicyDisplay<'a> {
        PolicyDisplay { policy: self, grid }
    }
}

pub struct PolicyDisplay<'a> {
    policy: &'a Policy,
    grid: &'a GridModel,
}

impl fmt::Display for PolicyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.policy.render(self.grid) {
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_leaves_obstacles_at_stay() {
        let grid = GridModel::new(2, 2, &[(0, 1)], &[]).unwrap();
        let policy = Policy::uniform(&grid, Action::Left);
        assert_eq!(policy.get(State::new(0, 0)), Some(Action::Left));
        assert_eq!(policy.get(State::new(0, 1)), Some(Action::Stay));
        assert_eq!(policy.get(State::new(1, 1)), Some(Action::Left));
        assert_eq!(policy.get(State::new(-1, 0)), None);
        assert_eq!(policy.get(State::new(2, 0)), None);
    }

    #[test]
    fn test_render_marks_obstacles() {
        let grid = GridModel::new(2, 3, &[(1, 1)], &[]).unwrap();
        let policy = Policy::from_tags(
            &grid,
            &[vec!["right", "right", "stay"], vec!["up", "stay", "up"]],
        )
        .unwrap();
        assert_eq!(
            policy.render(&grid),
            vec![
                vec!["right", "right", "stay"],
                vec!["up", "X", "up"]
            ]
        );
        assert_eq!(
            policy.display(&grid).to_string(),
            "[right, right, stay]\n[up, X, up]\n"
        );
    }

    #[test]
    fn test_from_tags_rejects_wrong_shape() {
        let grid = GridModel::open(2, 2).unwrap();
        let err = Policy::from_tags(&grid, &[vec!["up", "up"]]).unwrap_err();
        assert_eq!(
            err,
            MdpError::ShapeMismatch {
                expected: (2, 2),
                found: (1, 2)
            }
        );
        assert!(Policy::from_tags(&grid, &[vec!["up", "up"], vec!["up"]]).is_err());
    }

    #[test]
    fn test_from_array_checks_shape() {
        let grid = GridModel::open(2, 2).unwrap();
        assert!(Policy::from_array(&grid, Array2::from_elem((2, 2), Action::Up)).is_ok());
        assert!(Policy::from_array(&grid, Array2::from_elem((3, 2), Action::Up)).is_err());
    }
}
