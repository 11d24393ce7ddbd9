//! Planning on a grid-world Markov Decision Process.
//!
//! A [`GridModel`] fixes the cells, obstacles and rewards; a
//! [`TransitionModel`] adds slippery 4-connected motion. [`value_iteration`]
//! and [`policy_iteration`] compute an optimal [`Policy`] from the shared
//! [`bellman_backup`], and [`trace`] follows a policy from a start cell.

pub mod action;
pub mod bellman;
pub mod config;
pub mod grid;
pub mod policy;
pub mod policy_iteration;
pub mod scenario;
mod sweep;
pub mod trajectory;
pub mod transition;
pub mod value_iteration;


pub use action::Action;
pub use bellman::{action_value, backup_state, bellman_backup};
pub use config::{SlipModel, SolverConfig};
pub use grid::{GridModel, State};
pub use policy::{Policy, PolicyDisplay};
pub use policy_iteration::{
    evaluate_policy, improve_policy, policy_iteration, policy_iteration_from,
    PolicyIterationResult,
};
pub use trajectory::{sample_rollout, trace, Rollout, Trajectory};
pub use transition::TransitionModel;
pub use value_iteration::{value_iteration, ValueIterationResult};
