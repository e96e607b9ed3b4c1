//! Prioritized-sweeping value iteration.
//!
//! Instead of sweeping every state each round, the state with the largest
//! Bellman residual is updated first, in place, and only its predecessors
//! are re-examined afterwards. Runs stop early once no tracked residual
//! exceeds the convergence threshold.

use log::{debug, info, trace};

use crate::cs::dynamic::agent::ValueEstimationAgent;
use crate::cs::dynamic::bellman_equation::backup_value;
use crate::cs::dynamic::config::ValueIterationConfig;
use crate::cs::dynamic::mdp::MarkovDecisionProcess;
use crate::cs::dynamic::predecessors::Predecessors;
use crate::cs::dynamic::priority_queue::PriorityQueue;
use crate::cs::dynamic::value_function::ValueFunction;
use crate::error::Result;

/// Runs prioritized sweeping on construction and then acts greedily with
/// respect to the result.
///
/// The iteration budget bounds the number of states popped from the queue.
/// The predecessor index and the queue only live for the duration of the
/// run.
#[derive(Debug, Clone)]
pub struct PrioritizedSweepingValueIterationAgent<M: MarkovDecisionProcess> {
    mdp: M,
    discount: f64,
    iterations: usize,
    theta: f64,
    values: ValueFunction<M::State>,
    updates: usize,
    pending: usize,
}

impl<M: MarkovDecisionProcess> PrioritizedSweepingValueIterationAgent<M> {
    /// Validates `config` and runs prioritized sweeping with at most
    /// `config.iterations` updates.
    ///
    /// # Errors
    /// * `InvalidDiscount` / `InvalidTheta` if the configuration is invalid
    pub fn new(mdp: M, config: ValueIterationConfig) -> Result<Self> {
        config.validate()?;

        let mut agent = Self {
            mdp,
            discount: config.discount,
            iterations: config.iterations,
            theta: config.theta,
            values: ValueFunction::new(),
            updates: 0,
            pending: 0,
        };
        agent.run_value_iteration();
        Ok(agent)
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Number of states popped before the queue emptied or the budget ran
    /// out.
    pub fn iterations_run(&self) -> usize {
        self.updates
    }

    /// Whether the queue emptied, i.e. every tracked residual fell below
    /// theta before the budget ran out.
    pub fn converged(&self) -> bool {
        self.pending == 0
    }

    fn residual(&self, state: &M::State) -> f64 {
        let best = backup_value(&self.mdp, &self.values, self.discount, state);
        (self.values.get(state) - best).abs()
    }

    fn run_value_iteration(&mut self) {
        let predecessors = Predecessors::build(&self.mdp);
        let states = self.mdp.states();

        let mut queue = PriorityQueue::new();
        for state in &states {
            if !self.mdp.is_terminal(state) {
                queue.update(state.clone(), -self.residual(state));
            }
        }
        debug!(
            "prioritized sweeping seeded {} of {} states",
            queue.len(),
            states.len()
        );

        while self.updates < self.iterations {
            let Some((state, priority)) = queue.pop_with_priority() else {
                break;
            };
            self.updates += 1;
            trace!("updating {:?} with residual {:.3e}", state, -priority);

            if !self.mdp.is_terminal(&state) {
                let value = backup_value(&self.mdp, &self.values, self.discount, &state);
                self.values.set(state.clone(), value);
            }

            for predecessor in predecessors.of(&state) {
                if self.mdp.is_terminal(predecessor) {
                    continue;
                }
                let residual = self.residual(predecessor);
                if residual > self.theta {
                    queue.update(predecessor.clone(), -residual);
                }
            }
        }

        self.pending = queue.len();
        info!(
            "prioritized sweeping performed {} of {} updates ({} still pending)",
            self.updates, self.iterations, self.pending
        );
    }
}

impl<M: MarkovDecisionProcess> ValueEstimationAgent<M>
    for PrioritizedSweepingValueIterationAgent<M>
{
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::dynamic::tabular::TabularMdp;
    use crate::cs::dynamic::value_iteration::ValueIterationAgent;
    use crate::error::Error;
    use approx::assert_abs_diff_eq;

    fn sweep<M: MarkovDecisionProcess>(
        mdp: M,
        config: ValueIterationConfig,
    ) -> PrioritizedSweepingValueIterationAgent<M> {
        PrioritizedSweepingValueIterationAgent::new(mdp, config).unwrap()
    }

    fn config(discount: f64, iterations: usize, theta: f64) -> ValueIterationConfig {
        ValueIterationConfig::new()
            .with_discount(discount)
            .with_iterations(iterations)
            .with_theta(theta)
    }

    // a -> b -> c -> d (terminal), reward 1 on the last step
    fn chain() -> TabularMdp<&'static str, &'static str> {
        TabularMdp::builder()
            .transition("a", "go", "b", 1.0, 0.0)
            .transition("b", "go", "c", 1.0, 0.0)
            .transition("c", "go", "d", 1.0, 1.0)
            .terminal("d")
            .build()
            .unwrap()
    }

    #[test]
    fn test_two_state_exit() {
        let mdp = TabularMdp::builder()
            .transition("A", "exit", "B", 1.0, 10.0)
            .terminal("B")
            .build()
            .unwrap();
        let agent = sweep(mdp, config(1.0, 1, 1e-5));

        assert_eq!(agent.value(&"A"), 10.0);
        assert_eq!(agent.value(&"B"), 0.0);
        assert_eq!(agent.policy(&"A"), Some("exit"));
        assert_eq!(agent.policy(&"B"), None);
        assert_eq!(agent.iterations_run(), 1);
    }

    #[test]
    fn test_updates_propagate_backwards_in_place() {
        let agent = sweep(chain(), config(0.5, 100, 1e-5));

        assert_eq!(agent.value(&"c"), 1.0);
        assert_eq!(agent.value(&"b"), 0.5);
        assert_eq!(agent.value(&"a"), 0.25);
        assert_eq!(agent.value(&"d"), 0.0);
        // one pop per non-terminal state suffices on an acyclic chain
        assert_eq!(agent.iterations_run(), 3);
        assert!(agent.converged());
    }

    #[test]
    fn test_large_theta_prunes_small_residuals() {
        let agent = sweep(chain(), config(0.5, 100, 1.0));

        // seeding ignores theta, so every state is popped once, but a is
        // popped before b settles and never requeued
        assert_eq!(agent.value(&"c"), 1.0);
        assert_eq!(agent.value(&"b"), 0.5);
        assert_eq!(agent.value(&"a"), 0.0);
        assert_eq!(agent.theta(), 1.0);
    }

    #[test]
    fn test_budget_limits_pops() {
        let agent = sweep(chain(), config(0.5, 1, 1e-5));
        assert_eq!(agent.iterations_run(), 1);
        assert!(!agent.converged());
        assert_eq!(agent.value(&"c"), 1.0);
        assert_eq!(agent.value(&"b"), 0.0);
    }

    #[test]
    fn test_zero_budget_leaves_values_untouched() {
        let agent = sweep(chain(), config(0.5, 0, 1e-5));
        assert!(agent.values().is_empty());
        assert_eq!(agent.iterations_run(), 0);
    }

    #[test]
    fn test_extra_budget_after_convergence_is_idempotent() {
        let mdp = TabularMdp::builder()
            .transition(0, 'x', 0, 0.5, 1.0)
            .transition(0, 'x', 1, 0.5, 0.0)
            .transition(0, 'y', 2, 1.0, 3.0)
            .transition(1, 'x', 0, 1.0, 2.0)
            .transition(1, 'y', 2, 1.0, -1.0)
            .terminal(2)
            .build()
            .unwrap();

        let short = sweep(&mdp, config(0.9, 10_000, 1e-9));
        let long = sweep(&mdp, config(0.9, 1_000_000, 1e-9));

        assert!(short.converged());
        assert_eq!(short.iterations_run(), long.iterations_run());
        assert_eq!(short.values(), long.values());
    }

    #[test]
    fn test_matches_synchronous_fixed_point() {
        let mdp = TabularMdp::builder()
            .transition(0, 0, 0, 0.7, 1.0)
            .transition(0, 0, 1, 0.3, 0.5)
            .transition(0, 1, 1, 1.0, 2.0)
            .transition(1, 0, 0, 0.4, 0.8)
            .transition(1, 0, 1, 0.6, 0.0)
            .transition(1, 1, 0, 0.1, 0.0)
            .transition(1, 1, 1, 0.9, 1.5)
            .build()
            .unwrap();

        let sync_config = ValueIterationConfig::new().with_iterations(1_000);
        let synchronous = ValueIterationAgent::new(&mdp, sync_config).unwrap();
        let sweeping = sweep(&mdp, config(0.9, 100_000, 1e-12));

        for state in mdp.states() {
            assert_abs_diff_eq!(
                synchronous.value(&state),
                sweeping.value(&state),
                epsilon = 1e-8
            );
            assert_eq!(synchronous.policy(&state), sweeping.policy(&state));
        }
    }

    #[test]
    fn test_state_without_actions() {
        let mdp = TabularMdp::builder()
            .state("stuck")
            .transition("free", "into", "stuck", 1.0, 4.0)
            .build()
            .unwrap();
        let agent = sweep(mdp, config(0.9, 10, 1e-5));
        assert_eq!(agent.value(&"stuck"), 0.0);
        assert_eq!(agent.policy(&"stuck"), None);
        assert_eq!(agent.value(&"free"), 4.0);
    }

    #[test]
    fn test_invalid_theta_rejected() {
        let err = PrioritizedSweepingValueIterationAgent::new(chain(), config(0.9, 10, -1.0))
            .unwrap_err();
        assert_eq!(err, Error::InvalidTheta(-1.0));
    }
}
