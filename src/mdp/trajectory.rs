//! Following a fixed policy from a start cell.

use log::warn;
use ndarray::Array2;
use rand::Rng;

use crate::error::{MdpError, Result};
use crate::mdp::{Action, Policy, State, TransitionModel};

/// The intended path of a policy from one start cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Actions taken, ending with `Stay`. Empty when the start cell already stays.
    pub actions: Vec<Action>,
    /// Cells visited, in order
    pub path: Vec<State>,
    /// `true` on every visited cell
    pub visited: Array2<bool>,
    /// Sum of `gamma^t * R(s_t)` over the visited cells
    pub total_reward: f64,
    /// Each step's discounted reward weighted by the probability that the
    /// step's action actually reaches its intended cell
    pub expected_reward: f64,
}

impl Trajectory {
    /// The path drawn on the grid: `*` on visited cells, `.` elsewhere.
    pub fn render(&self) -> Vec<String> {
        self.visited
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|&v| if v { '*' } else { '.' }).collect())
            .collect()
    }
}

/// Walks `policy` from `start` along intended moves, ignoring slips, until a
/// cell prescribes `Stay`.
///
/// The reward of the cell occupied at step `t` contributes `gamma^t * R`, the
/// start cell included. If the start cell itself stays, the result holds only
/// that cell's reward and no actions.
///
/// `max_steps` bounds the number of actions taken. `None` allows one step per
/// grid cell: a longer deterministic walk must have revisited a cell and will
/// never stop.
///
/// # Errors
/// * `OutOfBounds` if `start` is off the grid, `InvalidParameter` if it is an obstacle
/// * `ShapeMismatch` if `policy` does not match the grid
/// * `BlockedMove` if the policy walks into an obstacle or off the grid
/// * `InvalidParameter` if `max_steps` is `Some(0)`
/// * `StepLimitExceeded` if no `Stay` is reached within `max_steps`
///
/// # Examples
/// ```
/// use gridplan::mdp::{trace, Action, GridModel, Policy, SolverConfig, State, TransitionModel};
///
/// let grid = GridModel::new(1, 3, &[], &[(0, 2, 10.0)]).unwrap();
/// let config = SolverConfig::default().with_slip_probability(0.0);
/// let model = TransitionModel::new(&grid, &config);
/// let policy = Policy::from_tags(&grid, &[vec!["right", "right", "stay"]]).unwrap();
///
/// let t = trace(&model, &policy, State::new(0, 0), None).unwrap();
/// assert_eq!(t.actions, vec![Action::Right, Action::Right, Action::Stay]);
/// assert!((t.total_reward - 8.1).abs() < 1e-9);
/// ```
pub fn trace(
    model: &TransitionModel,
    policy: &Policy,
    start: State,
    max_steps: Option<usize>,
) -> Result<Trajectory> {
    let grid = model.grid();
    check_start(model, policy, start)?;
    if max_steps == Some(0) {
        return Err(MdpError::invalid_parameter("max_steps must be at least 1"));
    }
    let gamma = model.discount();

    let mut visited = Array2::from_elem(grid.shape(), false);
    visited[grid.ix(start)] = true;

    if policy.at(start).is_stay() {
        let reward = grid.reward_at_state(start);
        return Ok(Trajectory {
            actions: Vec::new(),
            path: vec![start],
            visited,
            total_reward: reward,
            expected_reward: reward,
        });
    }

    let limit = max_steps.unwrap_or(grid.rows() * grid.cols());
    let mut actions = Vec::new();
    let mut path = Vec::new();
    let mut total_reward = 0.0;
    let mut expected_reward = 0.0;
    let mut discount = 1.0;
    let mut state = start;

    loop {
        if actions.len() >= limit {
            warn!("trace from {start} stopped after {limit} steps");
            return Err(MdpError::StepLimitExceeded { limit });
        }
        visited[grid.ix(state)] = true;
        path.push(state);

        let action = policy.at(state);
        actions.push(action);
        let step_reward = discount * grid.reward_at_state(state);
        total_reward += step_reward;

        let next = model.intended_target(state, action);
        expected_reward += step_reward * model.transition_probability(next, action, state);
        if action.is_stay() {
            break;
        }
        if !grid.is_open_state(next) {
            return Err(MdpError::BlockedMove {
                row: state.row,
                col: state.col,
                action,
            });
        }
        state = next;
        discount *= gamma;
    }

    Ok(Trajectory {
        actions,
        path,
        visited,
        total_reward,
        expected_reward,
    })
}

/// A stochastic walk under the transition model.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollout {
    /// Cells occupied, starting with the start cell
    pub path: Vec<State>,
    /// Action taken in each cell of `path`; the last one is `Stay`
    pub actions: Vec<Action>,
    /// Sum of `gamma^t * R(s_t)` over `path`
    pub discounted_return: f64,
}

/// Simulates `policy` from `start`, drawing each successor from the
/// transition model, until a cell prescribes `Stay`.
///
/// Probability mass the model leaves unassigned (slips into walls under
/// [`SlipModel::DropBlocked`](crate::mdp::SlipModel::DropBlocked)) keeps the
/// agent where it is. With a slip probability of 0 the rollout follows the same
/// cells as [`trace`].
///
/// # Errors
/// * `OutOfBounds`, `InvalidParameter` or `ShapeMismatch` as for [`trace`]
/// * `InvalidParameter` if `max_steps` is 0
/// * `StepLimitExceeded` if no `Stay` is reached within `max_steps` actions
pub fn sample_rollout<R: Rng + ?Sized>(
    model: &TransitionModel,
    policy: &Policy,
    start: State,
    rng: &mut R,
    max_steps: usize,
) -> Result<Rollout> {
    let grid = model.grid();
    check_start(model, policy, start)?;
    if max_steps == 0 {
        return Err(MdpError::invalid_parameter("max_steps must be at least 1"));
    }
    let gamma = model.discount();

    let mut path = Vec::new();
    let mut actions = Vec::new();
    let mut discounted_return = 0.0;
    let mut discount = 1.0;
    let mut state = start;

    while actions.len() < max_steps {
        path.push(state);
        discounted_return += discount * grid.reward_at_state(state);
        let action = policy.at(state);
        actions.push(action);
        if action.is_stay() {
            return Ok(Rollout {
                path,
                actions,
                discounted_return,
            });
        }

        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        let mut next = state;
        for (candidate, prob) in model.outcomes(state, action) {
            cumulative += prob;
            if draw < cumulative {
                next = candidate;
                break;
            }
        }
        state = next;
        discount *= gamma;
    }

    warn!("rollout from {start} stopped after {max_steps} steps");
    Err(MdpError::StepLimitExceeded { limit: max_steps })
}

fn check_start(model: &TransitionModel, policy: &Policy, start: State) -> Result<()> {
    let grid = model.grid();
    grid.check_shape(policy.shape())?;
    if !grid.in_bounds(start.row, start.col) {
        return Err(MdpError::out_of_bounds(
            start.row,
            start.col,
            grid.rows(),
            grid.cols(),
        ));
    }
    if !grid.is_open_state(start) {
        return Err(MdpError::invalid_parameter(format!(
            "start cell {start} is an obstacle"
        )));
    }
    Ok(())
}
