//! Synchronous (batch) value iteration.
//!
//! Every round computes a fresh value for each state from the previous
//! round's complete value function, so no update within a round observes
//! another update from the same round.

use log::{debug, info};

use crate::cs::dynamic::agent::ValueEstimationAgent;
use crate::cs::dynamic::bellman_equation::backup_value;
use crate::cs::dynamic::config::ValueIterationConfig;
use crate::cs::dynamic::mdp::MarkovDecisionProcess;
use crate::cs::dynamic::value_function::ValueFunction;
use crate::error::Result;

/// Runs a fixed number of synchronous value-iteration rounds on
/// construction and then acts greedily with respect to the result.
///
/// # Examples
///
/// ```
/// use mdp_dp::dynamic::{
///     TabularMdp, ValueEstimationAgent, ValueIterationAgent, ValueIterationConfig,
/// };
///
/// // A --exit--> B (terminal), reward 10
/// let mdp = TabularMdp::builder()
///     .transition("A", "exit", "B", 1.0, 10.0)
///     .terminal("B")
///     .build()
///     .unwrap();
///
/// let config = ValueIterationConfig::new().with_discount(1.0).with_iterations(1);
/// let agent = ValueIterationAgent::new(mdp, config).unwrap();
///
/// assert_eq!(agent.value(&"A"), 10.0);
/// assert_eq!(agent.policy(&"A"), Some("exit"));
/// assert_eq!(agent.policy(&"B"), None);
/// ```
#[derive(Debug, Clone)]
pub struct ValueIterationAgent<M: MarkovDecisionProcess> {
    mdp: M,
    discount: f64,
    iterations: usize,
    values: ValueFunction<M::State>,
}

impl<M: MarkovDecisionProcess> ValueIterationAgent<M> {
    /// Validates `config` and runs `config.iterations` rounds.
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
        };
        agent.run_value_iteration();
        Ok(agent)
    }

    /// Number of rounds performed. Always the configured budget.
    pub fn iterations_run(&self) -> usize {
        self.iterations
    }

    fn run_value_iteration(&mut self) {
        let states = self.mdp.states();

        for round in 0..self.iterations {
            let mut new_values = ValueFunction::with_capacity(states.len());
            for state in &states {
                let value = backup_value(&self.mdp, &self.values, self.discount, state);
                new_values.set(state.clone(), value);
            }

            let delta = new_values.max_abs_diff(&self.values);
            debug!("value iteration round {}: max change {:.3e}", round + 1, delta);
            self.values = new_values;
        }

        info!(
            "value iteration finished {} rounds over {} states",
            self.iterations,
            states.len()
        );
    }
}

impl<M: MarkovDecisionProcess> ValueEstimationAgent<M> for ValueIterationAgent<M> {
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
