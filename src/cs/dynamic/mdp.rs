//! The model contract consumed by the dynamic-programming agents.

use std::fmt::Debug;
use std::hash::Hash;

/// A finite Markov Decision Process with known dynamics.
///
/// The agents never validate a model: probabilities are trusted to be
/// non-negative and to sum to one for every `(state, action)` pair.
/// Enumeration order matters only for tie-breaking, never for correctness.
pub trait MarkovDecisionProcess {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + PartialEq + Debug;

    /// Every state of the model, in a fixed order.
    fn states(&self) -> Vec<Self::State>;

    /// Legal actions in `state`. Empty for terminal states.
    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// `(next_state, probability)` pairs for taking `action` in `state`.
    fn transition_states_and_probs(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<(Self::State, f64)>;

    /// Reward for the transition `state --action--> next_state`.
    fn reward(&self, state: &Self::State, action: &Self::Action, next_state: &Self::State) -> f64;

    fn is_terminal(&self, state: &Self::State) -> bool;
}

impl<M: MarkovDecisionProcess + ?Sized> MarkovDecisionProcess for &M {
    type State = M::State;
    type Action = M::Action;

    fn states(&self) -> Vec<Self::State> {
        (**self).states()
    }

    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        (**self).possible_actions(state)
    }

    fn transition_states_and_probs(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<(Self::State, f64)> {
        (**self).transition_states_and_probs(state, action)
    }

    fn reward(&self, state: &Self::State, action: &Self::Action, next_state: &Self::State) -> f64 {
        (**self).reward(state, action, next_state)
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        (**self).is_terminal(state)
    }
}
