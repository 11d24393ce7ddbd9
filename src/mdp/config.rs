use crate::error::{MdpError, Result};

/// How slip mass aimed at a blocked cell is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlipModel {
    /// Mass of a slip into an obstacle or off the grid is lost. Near walls the
    /// outcome distribution of a directional action sums to less than 1.
    #[default]
    DropBlocked,
    /// Mass of a blocked slip (and of a blocked intended move) keeps the agent
    /// in its current cell, so every outcome distribution sums to 1.
    RedirectToStay,
}

/// Parameters shared by the transition model and both solvers.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Discount factor applied per step, normally in `(0, 1)`
    pub discount: f64,
    /// Probability mass spread evenly over the 4 directions on a directional move
    pub slip_probability: f64,
    /// Sweeps stop once the largest value change drops below this
    pub tolerance: f64,
    /// Cap on sweeps (and on policy-improvement rounds). `None` never gives up.
    pub max_iterations: Option<usize>,
    pub slip_model: SlipModel,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            discount: 0.9,
            slip_probability: 0.01,
            tolerance: 0.01,
            max_iterations: Some(10_000),
            slip_model: SlipModel::DropBlocked,
        }
    }
}

impl SolverConfig {
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_slip_probability(mut self, slip_probability: f64) -> Self {
        self.slip_probability = slip_probability;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_slip_model(mut self, slip_model: SlipModel) -> Self {
        self.slip_model = slip_model;
        self
    }

    /// Checks the parameters before any solver loop starts.
    ///
    /// A discount of 1 or more, or a non-positive tolerance, may never meet the
    /// stopping criterion; both are accepted only while `max_iterations` bounds
    /// the run.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.slip_probability) {
            return Err(MdpError::invalid_parameter(format!(
                "slip probability must lie in [0, 1], got {}",
                self.slip_probability
            )));
        }
        if !self.discount.is_finite() || self.discount < 0.0 {
            return Err(MdpError::invalid_parameter(format!(
                "discount must be finite and non-negative, got {}",
                self.discount
            )));
        }
        if !self.tolerance.is_finite() {
            return Err(MdpError::invalid_parameter(format!(
                "tolerance must be finite, got {}",
                self.tolerance
            )));
        }
        match self.max_iterations {
            Some(0) => Err(MdpError::invalid_parameter(
                "max_iterations must be at least 1",
            )),
            None if self.discount >= 1.0 || self.tolerance <= 0.0 => {
                Err(MdpError::invalid_parameter(format!(
                    "an unbounded run needs discount < 1 and tolerance > 0, got discount {} and tolerance {}",
                    self.discount, self.tolerance
                )))
            }
            _ => Ok(()),
        }
    }
}
