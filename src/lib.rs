pub mod error;
pub mod mdp;

pub use error::{MdpError, Result};
pub use mdp::{
    policy_iteration, trace, value_iteration, Action, GridModel, Policy, SolverConfig, State,
    TransitionModel,
};
