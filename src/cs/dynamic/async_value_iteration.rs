//! Asynchronous (cyclic) value iteration.
//!
//! Each iteration updates a single state in place, cycling through the
//! model's state enumeration. A terminal state still consumes its
//! iteration.

use log::{debug, info};

use crate::cs::dynamic::agent::ValueEstimationAgent;
use crate::cs::dynamic::bellman_equation::backup_value;
use crate::cs::dynamic::config::ValueIterationConfig;
use crate::cs::dynamic::mdp::MarkovDecisionProcess;
use crate::cs::dynamic::value_function::ValueFunction;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct AsynchronousValueIterationAgent<M: MarkovDecisionProcess> {
    mdp: M,
    discount: f64,
    iterations: usize,
    values: ValueFunction<M::State>,
    updates: usize,
}

impl<M: MarkovDecisionProcess> AsynchronousValueIterationAgent<M> {
    /// Validates `config` and performs `config.iterations` single-state
    /// updates.
    ///
    /// # Errors
    /// * `InvalidDiscount` / `InvalidTheta` if the configuration is invalid
    pub fn new(mdp: M, config: ValueIterationConfig) -> Result<Self> {
        config.validate()?;

        let mut agent = Self {
            mdp,
            discount: config.discount,
            iterations: config.iterations,
            values: ValueFunction::new(),
            updates: 0,
        };
        agent.run_value_iteration();
        Ok(agent)
    }

    /// Number of iterations consumed, terminal visits included. Zero for a
    /// model without states.
    pub fn iterations_run(&self) -> usize {
        self.updates
    }

    fn run_value_iteration(&mut self) {
        let states = self.mdp.states();
        if states.is_empty() {
            return;
        }

        for state in states.iter().cycle().take(self.iterations) {
            if !self.mdp.is_terminal(state) {
                let value = backup_value(&self.mdp, &self.values, self.discount, state);
                self.values.set(state.clone(), value);
            }
            self.updates += 1;
            if self.updates % states.len() == 0 {
                let pass = self.updates / states.len();
                debug!("cyclic value iteration completed pass {}", pass);
            }
        }

        info!(
            "cyclic value iteration finished {} updates over {} states",
            self.updates,
            states.len()
        );
    }
}

impl<M: MarkovDecisionProcess> ValueEstimationAgent<M> for AsynchronousValueIterationAgent<M> {
    fn mdp(&self) -> &M {
        &self.mdp
    }

    fn discount(&self) -> f64 {
        self.discount
    }

    fn values(&self) -> &ValueFunction<M::State> {
        &self.values
    }
}
