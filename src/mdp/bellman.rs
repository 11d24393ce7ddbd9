//! One-state Bellman backup shared by value iteration and policy improvement.

use ndarray::Array2;

use crate::mdp::{Action, State, TransitionModel};

/// Compute Q(s, a) = sum_{s'} P(s'|s,a) [ R(s') + gamma * V(s') ] over `moves`.
pub fn action_value(
    model: &TransitionModel,
    state: State,
    action: Action,
    moves: &[State],
    values: &Array2<f64>,
) -> f64 {
    let grid = model.grid();
    let gamma = model.discount();
    moves
        .iter()
        .map(|&next| {
            let prob = model.transition_probability(next, action, state);
            prob * (grid.reward_at_state(next) + gamma * values[grid.ix(next)])
        })
        .sum()
}

/// Scores every action in `actions` against `values` and returns the best
/// `(action, value)` pair.
///
/// The running best starts at `(Stay, 0.0)` and is replaced only by a strictly
/// greater value, so when no action scores above zero the result is
/// `(Stay, 0.0)`, and among equal scores the first action in `actions` wins.
/// Callers pass actions in [`Action::ALL`] order.
///
/// # Examples
/// ```
/// use gridplan::mdp::{bellman_backup, Action, GridModel, SolverConfig, State, TransitionModel};
/// use ndarray::Array2;
///
/// let grid = GridModel::new(1, 2, &[], &[(0, 1, 1.0)]).unwrap();
/// let config = SolverConfig::default().with_slip_probability(0.0);
/// let model = TransitionModel::new(&grid, &config);
/// let s = State::new(0, 0);
/// let values = Array2::zeros(grid.shape());
///
/// let (action, value) = bellman_backup(
///     &model,
///     s,
///     &model.legal_actions(s),
///     &model.legal_moves(s),
///     &values,
/// );
/// assert_eq!(action, Action::Right);
/// assert_eq!(value, 1.0);
/// ```
pub fn bellman_backup(
    model: &TransitionModel,
    state: State,
    actions: &[Action],
    moves: &[State],
    values: &Array2<f64>,
) -> (Action, f64) {
    let mut best_action = Action::Stay;
    let mut best_value = 0.0;
    for &action in actions {
        let q = action_value(model, state, action, moves, values);
        if q > best_value {
            best_value = q;
            best_action = action;
        }
    }
    (best_action, best_value)
}

/// [`bellman_backup`] over the legal actions and moves of `state`.
pub fn backup_state(model: &TransitionModel, state: State, values: &Array2<f64>) -> (Action, f64) {
    let actions = model.legal_actions(state);
    let moves = model.legal_moves(state);
    bellman_backup(model, state, &actions, &moves, values)
}
