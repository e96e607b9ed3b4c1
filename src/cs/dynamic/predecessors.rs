use std::collections::{HashMap, HashSet};

use crate::cs::dynamic::mdp::MarkovDecisionProcess;

/// For every state, the states that reach it in one step under some action
/// with positive probability.
///
/// Built from a single scan of states x actions x transitions. Predecessors
/// of a state are listed in the order the scan discovers them, so the index
/// is deterministic for a fixed model enumeration.
#[derive(Debug, Clone)]
pub struct Predecessors<S> {
    index: HashMap<S, Vec<S>>,
}

impl<S> Predecessors<S>
where
    S: Clone + Eq + std::hash::Hash,
{
    pub fn build<M>(mdp: &M) -> Self
    where
        M: MarkovDecisionProcess<State = S>,
    {
        let states = mdp.states();
        let mut index: HashMap<S, Vec<S>> =
            states.iter().map(|s| (s.clone(), Vec::new())).collect();
        let mut seen: HashSet<(S, S)> = HashSet::new();

        for state in &states {
            for action in mdp.possible_actions(state) {
                for (next_state, probability) in mdp.transition_states_and_probs(state, &action) {
                    if probability <= 0.0 {
                        continue;
                    }
                    if seen.insert((next_state.clone(), state.clone())) {
                        index.entry(next_state).or_default().push(state.clone());
                    }
                }
            }
        }

        Self { index }
    }

    /// Predecessors of `state`; empty for states nothing leads into.
    pub fn of(&self, state: &S) -> &[S] {
        self.index.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of states with an entry in the index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
