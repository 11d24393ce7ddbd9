//! A synchronous sweep: every open cell is updated from the same read-only
//! snapshot of the previous values, and the results are gathered before the
//! caller publishes them. With the `parallel` feature the cells are processed
//! on the rayon pool.

use crate::mdp::{GridModel, State};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Applies `update` to every open cell of `grid`, returning results in row-major order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn sweep<T, F>(grid: &GridModel, update: F) -> Vec<(State, T)>
where
    T: Send,
    F: Fn(State) -> T + Sync + Send,
{
    grid.open_states().map(|s| (s, update(s))).collect()
}

/// Applies `update` to every open cell of `grid`, returning results in row-major order.
#[cfg(feature = "parallel")]
pub(crate) fn sweep<T, F>(grid: &GridModel, update: F) -> Vec<(State, T)>
where
    T: Send,
    F: Fn(State) -> T + Sync + Send,
{
    let states: Vec<State> = grid.open_states().collect();
    states.into_par_iter().map(|s| (s, update(s))).collect()
}
