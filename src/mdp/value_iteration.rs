//! Value iteration: repeated Bellman backups over every cell until the value
//! function stops changing, followed by reading off the greedy policy.

use log::{debug, info, warn};
use ndarray::Array2;

use crate::error::{MdpError, Result};
use crate::mdp::bellman::backup_state;
use crate::mdp::sweep::sweep;
use crate::mdp::{GridModel, Policy, SolverConfig, TransitionModel};

/// Output of [`value_iteration`].
#[derive(Debug, Clone)]
pub struct ValueIterationResult {
    /// Converged value of every cell (0 on obstacles)
    pub values: Array2<f64>,
    /// Action chosen by the last sweep's backups
    pub policy: Policy,
    /// Number of sweeps performed
    pub iterations: usize,
    /// Largest value change in the last sweep
    pub delta: f64,
}

/// Performs value iteration on `grid`, returning the value function and the
/// greedy policy.
///
/// Every sweep backs up each open cell against the previous sweep's values,
/// which stay read-only until the sweep completes. The run stops once the
/// largest change in a sweep is below `config.tolerance`.
///
/// # Errors
/// * `InvalidParameter` if `config` fails [`SolverConfig::validate`]
/// * `NotConverged` if `config.max_iterations` sweeps pass without meeting the tolerance
///
/// # Examples
/// ```
/// use gridplan::mdp::{value_iteration, Action, GridModel, SolverConfig, State};
///
/// let grid = GridModel::new(1, 3, &[], &[(0, 2, 10.0)]).unwrap();
/// let config = SolverConfig::default().with_slip_probability(0.0);
/// let result = value_iteration(&grid, &config).unwrap();
///
/// assert_eq!(result.policy.get(State::new(0, 0)), Some(Action::Right));
/// assert_eq!(result.policy.get(State::new(0, 2)), Some(Action::Stay));
/// ```
pub fn value_iteration(grid: &GridModel, config: &SolverConfig) -> Result<ValueIterationResult> {
    config.validate()?;
    let model = TransitionModel::new(grid, config);

    let mut values = Array2::<f64>::zeros(grid.shape());
    let mut policy = Policy::new(grid);
    let mut iterations = 0;

    loop {
        let updates = sweep(grid, |s| backup_state(&model, s, &values));

        let mut new_values = Array2::<f64>::zeros(grid.shape());
        let mut delta = 0.0_f64;
        for (state, (action, value)) in updates {
            let ix = grid.ix(state);
            delta = delta.max((value - values[ix]).abs());
            new_values[ix] = value;
            policy.set(state, action);
        }
        values = new_values;
        iterations += 1;
        debug!("value iteration sweep {iterations}: delta = {delta}");

        if delta < config.tolerance {
            info!("value iteration converged after {iterations} sweeps (delta = {delta})");
            return Ok(ValueIterationResult {
                values,
                policy,
                iterations,
                delta,
            });
        }

        if config.max_iterations.is_some_and(|limit| iterations >= limit) {
            warn!("value iteration stopped after {iterations} sweeps (delta = {delta})");
            return Err(MdpError::NotConverged {
                solver: "value iteration",
                iterations,
                delta,
            });
        }
    }
}
