//! Solves the reference grid and prints the resulting policy.
//!
//! `RUST_LOG=gridplan=debug` shows per-sweep progress.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use gridplan::mdp::{
    policy_iteration, scenario, trace, value_iteration, SlipModel, SolverConfig, State,
    TransitionModel,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Solver {
    Value,
    Policy,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Which solver to run
    #[arg(long, value_enum, default_value_t = Solver::Value)]
    solver: Solver,

    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    discount: f64,

    /// Probability of slipping on a directional move
    #[arg(long, default_value_t = 0.01)]
    slip: f64,

    /// Stop once the largest value change falls below this
    #[arg(long, default_value_t = 0.01)]
    tolerance: f64,

    /// Give up after this many sweeps (0 = never)
    #[arg(long, default_value_t = 10_000)]
    max_iterations: usize,

    /// Keep blocked slip mass on the current cell instead of dropping it
    #[arg(long)]
    redirect_blocked_slip: bool,

    /// Print the value table
    #[arg(long)]
    values: bool,

    /// Trace the policy from ROW,COL
    #[arg(long, value_name = "ROW,COL")]
    trace: Option<String>,
}

fn parse_cell(s: &str) -> Result<State> {
    let Some((row, col)) = s.split_once(',') else {
        bail!("expected ROW,COL, got {s:?}");
    };
    let row = row.trim().parse().context("invalid row")?;
    let col = col.trim().parse().context("invalid column")?;
    Ok(State::new(row, col))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SolverConfig::default()
        .with_discount(args.discount)
        .with_slip_probability(args.slip)
        .with_tolerance(args.tolerance)
        .with_max_iterations((args.max_iterations > 0).then_some(args.max_iterations))
        .with_slip_model(if args.redirect_blocked_slip {
            SlipModel::RedirectToStay
        } else {
            SlipModel::DropBlocked
        });

    let grid = scenario::reference_grid()?;
    let (policy, values) = match args.solver {
        Solver::Value => {
            let result = value_iteration(&grid, &config)?;
            println!("value iteration: {} sweeps", result.iterations);
            (result.policy, result.values)
        }
        Solver::Policy => {
            let result = policy_iteration(&grid, &config)?;
            println!("policy iteration: {} rounds", result.rounds);
            (result.policy, result.values)
        }
    };

    print!("{}", policy.display(&grid));

    if args.values {
        println!();
        for row in values.rows() {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:8.2}")).collect();
            println!("{}", cells.join(" "));
        }
    }

    if let Some(cell) = args.trace.as_deref() {
        let start = parse_cell(cell)?;
        let model = TransitionModel::new(&grid, &config);
        let path = trace(&model, &policy, start, None)?;
        println!();
        for line in path.render() {
            println!("{line}");
        }
        let actions: Vec<&str> = path.actions.iter().map(|a| a.as_str()).collect();
        println!("actions: {}", actions.join(" "));
        println!("total reward: {:.4}", path.total_reward);
        println!("expected reward: {:.4}", path.expected_reward);
    }

    Ok(())
}
