//! Motion model of the agent: which moves are legal from a cell and how likely
//! each outcome is under a chosen action.

use crate::mdp::{Action, GridModel, SlipModel, SolverConfig, State};

/// Transition probabilities `P(s' | s, a)` over a [`GridModel`].
///
/// A directional action reaches its intended neighbour with probability
/// `1 - p + p/4` and slips into each other open neighbour with probability
/// `p/4`, where `p` is the slip probability. `Stay` is deterministic.
///
/// The model holds no mutable state; every query is a pure function of the
/// grid and the parameters, so any number of models over different grids can
/// coexist.
#[derive(Debug, Clone, Copy)]
pub struct TransitionModel<'a> {
    grid: &'a GridModel,
    slip_probability: f64,
    discount: f64,
    slip_model: SlipModel,
}

impl<'a> TransitionModel<'a> {
    pub fn new(grid: &'a GridModel, config: &SolverConfig) -> Self {
        Self {
            grid,
            slip_probability: config.slip_probability,
            discount: config.discount,
            slip_model: config.slip_model,
        }
    }

    pub fn grid(&self) -> &'a GridModel {
        self.grid
    }

    pub fn slip_probability(&self) -> f64 {
        self.slip_probability
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn slip_model(&self) -> SlipModel {
        self.slip_model
    }

    /// The cell itself followed by each open neighbour, in `Up, Down, Left, Right` order.
    pub fn legal_moves(&self, state: State) -> Vec<State> {
        let mut moves = Vec::with_capacity(5);
        moves.push(state);
        moves.extend(
            Action::DIRECTIONS
                .iter()
                .map(|&a| state.step(a))
                .filter(|s| self.grid.is_open_state(*s)),
        );
        moves
    }

    /// `Stay` followed by every direction leading to an open neighbour.
    pub fn legal_actions(&self, state: State) -> Vec<Action> {
        Action::ALL
            .iter()
            .copied()
            .filter(|&a| a.is_stay() || self.grid.is_open_state(state.step(a)))
            .collect()
    }

    /// Where `action` is meant to take the agent, whether or not that cell is open.
    pub fn intended_target(&self, state: State, action: Action) -> State {
        state.step(action)
    }

    /// Probability of ending in `candidate` after taking `action` in `state`.
    ///
    /// With [`SlipModel::DropBlocked`] a directional action never leaves the
    /// agent in place, so slip mass aimed at a wall is lost and the outcomes of
    /// a cell next to a wall sum to less than 1. [`SlipModel::RedirectToStay`]
    /// assigns that mass to `state` instead.
    ///
    /// # Examples
    /// ```
    /// use gridplan::mdp::{Action, GridModel, SolverConfig, State, TransitionModel};
    ///
    /// let grid = GridModel::open(3, 3).unwrap();
    /// let config = SolverConfig::default().with_slip_probability(0.2);
    /// let model = TransitionModel::new(&grid, &config);
    /// let centre = State::new(1, 1);
    ///
    /// let p = model.transition_probability(State::new(1, 2), Action::Right, centre);
    /// assert!((p - 0.85).abs() < 1e-12);
    /// let p = model.transition_probability(State::new(0, 1), Action::Right, centre);
    /// assert!((p - 0.05).abs() < 1e-12);
    /// ```
    pub fn transition_probability(&self, candidate: State, action: Action, state: State) -> f64 {
        if !self.grid.is_open_state(candidate) || !self.is_adjacent_or_same(candidate, state) {
            return 0.0;
        }

        if action.is_stay() {
            return if candidate == state { 1.0 } else { 0.0 };
        }

        let p = self.slip_probability;
        if candidate == self.intended_target(state, action) {
            1.0 - p + p / 4.0
        } else if candidate == state {
            match self.slip_model {
                SlipModel::DropBlocked => 0.0,
                SlipModel::RedirectToStay => self.blocked_mass(state, action),
            }
        } else {
            p / 4.0
        }
    }

    /// Every legal move paired with its probability under `action`, zero entries dropped.
    pub fn outcomes(&self, state: State, action: Action) -> Vec<(State, f64)> {
        self.legal_moves(state)
            .into_iter()
            .map(|s| (s, self.transition_probability(s, action, state)))
            .filter(|&(_, p)| p > 0.0)
            .collect()
    }

    /// Mass of all directions out of `state` that end in a blocked cell.
    fn blocked_mass(&self, state: State, action: Action) -> f64 {
        let p = self.slip_probability;
        Action::DIRECTIONS
            .iter()
            .filter(|&&d| !self.grid.is_open_state(state.step(d)))
            .map(|&d| if d == action { 1.0 - p + p / 4.0 } else { p / 4.0 })
            .sum()
    }

    fn is_adjacent_or_same(&self, a: State, b: State) -> bool {
        (a.row - b.row).abs() + (a.col - b.col).abs() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn total_mass(model: &TransitionModel, state: State, action: Action) -> f64 {
        model
            .legal_moves(state)
            .iter()
            .map(|&s| model.transition_probability(s, action, state))
            .sum()
    }

    #[test]
    fn test_legal_moves_and_actions() {
        let grid = GridModel::new(3, 3, &[(0, 1)], &[]).unwrap();
        let config = SolverConfig::default();
        let model = TransitionModel::new(&grid, &config);

        let moves = model.legal_moves(State::new(1, 1));
        assert_eq!(
            moves,
            vec![
                State::new(1, 1),
                State::new(2, 1),
                State::new(1, 0),
                State::new(1, 2)
            ]
        );

        let actions = model.legal_actions(State::new(1, 1));
        assert_eq!(
            actions,
            vec![Action::Stay, Action::Down, Action::Left, Action::Right]
        );

        let corner = model.legal_actions(State::new(0, 0));
        assert_eq!(corner, vec![Action::Stay, Action::Down]);
    }

    #[test]
    fn test_intended_target_ignores_walls() {
        let grid = GridModel::open(1, 1).unwrap();
        let config = SolverConfig::default();
        let model = TransitionModel::new(&grid, &config);
        let s = State::new(0, 0);
        assert_eq!(model.intended_target(s, Action::Stay), s);
        assert_eq!(model.intended_target(s, Action::Up), State::new(-1, 0));
        assert_eq!(model.intended_target(s, Action::Right), State::new(0, 1));
    }

    #[test]
    fn test_open_interior_cell_sums_to_one() {
        let grid = GridModel::open(3, 3).unwrap();
        let config = SolverConfig::default().with_slip_probability(0.2);
        let model = TransitionModel::new(&grid, &config);
        let centre = State::new(1, 1);
        for action in Action::ALL {
            assert_abs_diff_eq!(total_mass(&model, centre, action), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_stay_is_deterministic() {
        let grid = GridModel::open(3, 3).unwrap();
        let config = SolverConfig::default().with_slip_probability(0.4);
        let model = TransitionModel::new(&grid, &config);
        let centre = State::new(1, 1);
        assert_eq!(model.transition_probability(centre, Action::Stay, centre), 1.0);
        assert_eq!(
            model.transition_probability(State::new(0, 1), Action::Stay, centre),
            0.0
        );
    }

    #[test]
    fn test_mass_is_lost_next_to_walls() {
        let grid = GridModel::new(3, 3, &[(1, 2)], &[]).unwrap();
        let config = SolverConfig::default().with_slip_probability(0.2);
        let model = TransitionModel::new(&grid, &config);

        // Top-left corner: two of four slip directions leave the grid.
        let corner = State::new(0, 0);
        assert_abs_diff_eq!(total_mass(&model, corner, Action::Right), 0.9, epsilon = 1e-12);
        assert_eq!(model.transition_probability(corner, Action::Right, corner), 0.0);

        // Centre cell with an obstacle to the right.
        let centre = State::new(1, 1);
        assert_abs_diff_eq!(total_mass(&model, centre, Action::Up), 0.95, epsilon = 1e-12);
        assert!(total_mass(&model, centre, Action::Down) < 1.0);
    }

    #[test]
    fn test_redirect_to_stay_restores_full_mass() {
        let grid = GridModel::new(3, 3, &[(1, 2)], &[]).unwrap();
        let config = SolverConfig::default()
            .with_slip_probability(0.2)
            .with_slip_model(SlipModel::RedirectToStay);
        let model = TransitionModel::new(&grid, &config);

        for state in grid.open_states() {
            for action in Action::ALL {
                assert_abs_diff_eq!(total_mass(&model, state, action), 1.0, epsilon = 1e-12);
            }
        }

        let corner = State::new(0, 0);
        assert_abs_diff_eq!(
            model.transition_probability(corner, Action::Right, corner),
            0.1,
            epsilon = 1e-12
        );
        // An action straight into a wall keeps the agent in place most of the time.
        assert_abs_diff_eq!(
            model.transition_probability(corner, Action::Up, corner),
            0.9,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_outside_legal_moves() {
        let grid = GridModel::new(3, 3, &[(0, 1)], &[]).unwrap();
        let config = SolverConfig::default().with_slip_probability(0.5);
        let model = TransitionModel::new(&grid, &config);
        let origin = State::new(0, 0);
        let legal = model.legal_moves(origin);

        for row in -1..4 {
            for col in -1..4 {
                let candidate = State::new(row, col);
                if legal.contains(&candidate) {
                    continue;
                }
                for action in Action::ALL {
                    assert_eq!(
                        model.transition_probability(candidate, action, origin),
                        0.0,
                        "{candidate} under {action}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_outcomes_skip_zero_entries() {
        let grid = GridModel::open(1, 3).unwrap();
        let config = SolverConfig::default().with_slip_probability(0.0);
        let model = TransitionModel::new(&grid, &config);
        let outcomes = model.outcomes(State::new(0, 1), Action::Right);
        assert_eq!(outcomes, vec![(State::new(0, 2), 1.0)]);
    }
}
