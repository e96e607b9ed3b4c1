use crate::cs::dynamic::bellman_equation::{compute_action_from_values, compute_q_value};
use crate::cs::dynamic::mdp::MarkovDecisionProcess;
use crate::cs::dynamic::value_function::ValueFunction;

/// Read-only queries over a solved value function.
///
/// Implementors only expose their model, discount and frozen values; the
/// queries are pure functions of those, so calling them repeatedly yields
/// identical results. Q-values and actions are recomputed on every call.
pub trait ValueEstimationAgent<M: MarkovDecisionProcess> {
    fn mdp(&self) -> &M;

    fn discount(&self) -> f64;

    fn values(&self) -> &ValueFunction<M::State>;

    /// V(s), zero for states never assigned a value.
    fn value(&self, state: &M::State) -> f64 {
        self.values().get(state)
    }

    fn q_value(&self, state: &M::State, action: &M::Action) -> f64 {
        compute_q_value(self.mdp(), self.values(), self.discount(), state, action)
    }

    /// The greedy action in `state`, or `None` where no policy is defined.
    fn policy(&self, state: &M::State) -> Option<M::Action> {
        compute_action_from_values(self.mdp(), self.values(), self.discount(), state)
    }

    /// The action taken in `state`. No exploration.
    fn action(&self, state: &M::State) -> Option<M::Action> {
        self.policy(state)
    }
}
