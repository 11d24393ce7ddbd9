//! Policy iteration: evaluate a fixed policy to convergence, improve it
//! greedily, and repeat until the policy stops changing.

use log::{debug, info, trace, warn};
use ndarray::Array2;

use crate::error::{MdpError, Result};
use crate::mdp::bellman::{action_value, backup_state};
use crate::mdp::sweep::sweep;
use crate::mdp::{Action, GridModel, Policy, SolverConfig, TransitionModel};

/// Output of [`policy_iteration`].
#[derive(Debug, Clone)]
pub struct PolicyIterationResult {
    pub policy: Policy,
    /// Value of `policy` as computed by its final evaluation
    pub values: Array2<f64>,
    /// Number of evaluate-improve rounds
    pub rounds: usize,
}

/// Computes the value of following `policy` forever.
///
/// Sweeps `V(s) = sum_{s'} P(s'|s,policy(s)) [ R(s') + gamma * V(s') ]` from
/// all-zero values until the largest change falls below `config.tolerance`.
///
/// # Errors
/// * `InvalidParameter` if `config` is invalid
/// * `ShapeMismatch` if `policy` was built for a different grid shape
/// * `NotConverged` if `config.max_iterations` sweeps pass without meeting the tolerance
pub fn evaluate_policy(
    grid: &GridModel,
    policy: &Policy,
    config: &SolverConfig,
) -> Result<Array2<f64>> {
    config.validate()?;
    grid.check_shape(policy.shape())?;
    let model = TransitionModel::new(grid, config);
    evaluate(&model, policy, config)
}

/// One greedy improvement step: the best action of every open cell against `values`.
///
/// # Errors
/// * `InvalidParameter` if `config` is invalid
/// * `ShapeMismatch` if `values` was built for a different grid shape
pub fn improve_policy(
    grid: &GridModel,
    values: &Array2<f64>,
    config: &SolverConfig,
) -> Result<Policy> {
    config.validate()?;
    grid.check_shape(values.dim())?;
    let model = TransitionModel::new(grid, config);
    Ok(improve(&model, values))
}

/// Runs policy iteration from the policy that moves left on every open cell.
///
/// # Examples
/// ```
/// use gridplan::mdp::{policy_iteration, Action, GridModel, SolverConfig, State};
///
/// let grid = GridModel::new(1, 3, &[], &[(0, 2, 10.0)]).unwrap();
/// let config = SolverConfig::default().with_slip_probability(0.0);
/// let result = policy_iteration(&grid, &config).unwrap();
///
/// assert_eq!(result.policy.get(State::new(0, 0)), Some(Action::Right));
/// assert_eq!(result.policy.get(State::new(0, 1)), Some(Action::Right));
/// assert_eq!(result.policy.get(State::new(0, 2)), Some(Action::Stay));
/// ```
pub fn policy_iteration(grid: &GridModel, config: &SolverConfig) -> Result<PolicyIterationResult> {
    policy_iteration_from(grid, Policy::uniform(grid, Action::Left), config)
}

/// Runs policy iteration starting from `initial`.
///
/// Stops when an improvement step returns exactly the policy it was given.
///
/// # Errors
/// * `InvalidParameter` if `config` is invalid
/// * `ShapeMismatch` if `initial` was built for a different grid shape
/// * `NotConverged` if an evaluation exceeds `config.max_iterations` sweeps
/// * `PolicyUnstable` if the policy still changes after `config.max_iterations` rounds
pub fn policy_iteration_from(
    grid: &GridModel,
    initial: Policy,
    config: &SolverConfig,
) -> Result<PolicyIterationResult> {
    config.validate()?;
    grid.check_shape(initial.shape())?;
    let model = TransitionModel::new(grid, config);

    let mut policy = initial;
    let mut rounds = 0;
    loop {
        let values = evaluate(&model, &policy, config)?;
        let improved = improve(&model, &values);
        rounds += 1;

        if improved == policy {
            info!("policy iteration converged after {rounds} rounds");
            return Ok(PolicyIterationResult {
                policy,
                values,
                rounds,
            });
        }

        let changed = policy
            .as_array()
            .iter()
            .zip(improved.as_array().iter())
            .filter(|(a, b)| a != b)
            .count();
        debug!("policy iteration round {rounds}: {changed} cells changed");

        if config.max_iterations.is_some_and(|limit| rounds >= limit) {
            warn!("policy iteration stopped after {rounds} rounds");
            return Err(MdpError::PolicyUnstable { rounds, changed });
        }
        policy = improved;
    }
}

fn evaluate(model: &TransitionModel, policy: &Policy, config: &SolverConfig) -> Result<Array2<f64>> {
    let grid = model.grid();
    let mut values = Array2::<f64>::zeros(grid.shape());
    let mut sweeps = 0;

    loop {
        let updates = sweep(grid, |s| {
            let moves = model.legal_moves(s);
            action_value(model, s, policy.at(s), &moves, &values)
        });

        let mut new_values = Array2::<f64>::zeros(grid.shape());
        let mut delta = 0.0_f64;
        for (state, value) in updates {
            let ix = grid.ix(state);
            delta = delta.max((value - values[ix]).abs());
            new_values[ix] = value;
        }
        values = new_values;
        sweeps += 1;
        trace!("policy evaluation sweep {sweeps}: delta = {delta}");

        if delta < config.tolerance {
            return Ok(values);
        }
        if config.max_iterations.is_some_and(|limit| sweeps >= limit) {
            warn!("policy evaluation stopped after {sweeps} sweeps (delta = {delta})");
            return Err(MdpError::NotConverged {
                solver: "policy evaluation",
                iterations: sweeps,
                delta,
            });
        }
    }
}

fn improve(model: &TransitionModel, values: &Array2<f64>) -> Policy {
    let grid = model.grid();
    let mut policy = Policy::new(grid);
    for (state, (action, _)) in sweep(grid, |s| backup_state(model, s, values)) {
        policy.set(state, action);
    }
    policy
}
