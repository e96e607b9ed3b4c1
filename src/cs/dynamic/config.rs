use crate::error::{Error, Result};

/// Configuration options shared by the value-iteration agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueIterationConfig {
    /// Discount factor (0 <= gamma <= 1).
    pub discount: f64,
    /// Number of rounds (synchronous), single-state updates (cyclic) or
    /// queue pops (prioritized sweeping) to perform at most.
    pub iterations: usize,
    /// Residual above which prioritized sweeping re-queues a predecessor.
    /// Ignored by the other agents.
    pub theta: f64,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueIterationConfig {
    /// Create a new config with default values for discount (0.9),
    /// iterations (100) and theta (1e-5).
    pub fn new() -> Self {
        Self {
            discount: 0.9,
            iterations: 100,
            theta: 1e-5,
        }
    }

    /// Customize the discount factor.
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Customize the iteration budget.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Customize the convergence threshold used by prioritized sweeping.
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// # Errors
    /// * `InvalidDiscount` if the discount is NaN or outside `[0, 1]`
    /// * `InvalidTheta` if theta is NaN or negative
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::InvalidDiscount(self.discount));
        }
        if self.theta.is_nan() || self.theta < 0.0 {
            return Err(Error::InvalidTheta(self.theta));
        }
        Ok(())
    }
}
