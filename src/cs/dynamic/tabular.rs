//! An explicit, table-driven MDP.
//!
//! For each (state, action) the table holds a list of
//! `(next_state, probability, reward)` triples:
//!
//! ```text
//! transitions[s][a] = [
//!     (s_next_0, p_0, r_0),
//!     (s_next_1, p_1, r_1),
//!     ...
//! ]
//! ```
//!
//! States and actions enumerate in the order they were first added.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::cs::dynamic::mdp::MarkovDecisionProcess;
use crate::error::{Error, Result};

type Outcomes<S> = Vec<(S, f64, f64)>;

/// A finite MDP stored as explicit transition tables.
#[derive(Debug, Clone)]
pub struct TabularMdp<S, A> {
    states: Vec<S>,
    actions: HashMap<S, Vec<(A, Outcomes<S>)>>,
    terminals: HashSet<S>,
}

impl<S, A> TabularMdp<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + PartialEq + Debug,
{
    pub fn builder() -> TabularMdpBuilder<S, A> {
        TabularMdpBuilder::new()
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    fn outcomes(&self, state: &S, action: &A) -> Option<&Outcomes<S>> {
        self.actions
            .get(state)?
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, outcomes)| outcomes)
    }
}

impl<S, A> MarkovDecisionProcess for TabularMdp<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + PartialEq + Debug,
{
    type State = S;
    type Action = A;

    fn states(&self) -> Vec<S> {
        self.states.clone()
    }

    fn possible_actions(&self, state: &S) -> Vec<A> {
        if self.is_terminal(state) {
            return Vec::new();
        }
        self.actions
            .get(state)
            .map(|actions| actions.iter().map(|(a, _)| a.clone()).collect())
            .unwrap_or_default()
    }

    fn transition_states_and_probs(&self, state: &S, action: &A) -> Vec<(S, f64)> {
        self.outcomes(state, action)
            .map(|outcomes| outcomes.iter().map(|(s, p, _)| (s.clone(), *p)).collect())
            .unwrap_or_default()
    }

    /// Reward of the outcome landing in `next_state`; zero if there is
    /// none. `build` guarantees at most one such outcome.
    fn reward(&self, state: &S, action: &A, next_state: &S) -> f64 {
        self.outcomes(state, action)
            .and_then(|outcomes| outcomes.iter().find(|(s, _, _)| s == next_state))
            .map(|&(_, _, r)| r)
            .unwrap_or(0.0)
    }

    fn is_terminal(&self, state: &S) -> bool {
        self.terminals.contains(state)
    }
}

/// Collects states, transitions and terminal markers for a [`TabularMdp`].
#[derive(Debug, Clone)]
pub struct TabularMdpBuilder<S, A> {
    states: Vec<S>,
    known: HashSet<S>,
    actions: HashMap<S, Vec<(A, Outcomes<S>)>>,
    terminals: HashSet<S>,
}

impl<S, A> Default for TabularMdpBuilder<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + PartialEq + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> TabularMdpBuilder<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + PartialEq + Debug,
{
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            known: HashSet::new(),
            actions: HashMap::new(),
            terminals: HashSet::new(),
        }
    }

    /// Registers a state without any transitions.
    pub fn state(mut self, state: S) -> Self {
        self.register(&state);
        self
    }

    /// Adds the outcome `state --action--> next_state` with the given
    /// probability and reward. Repeated calls for the same (state, action)
    /// append outcomes.
    pub fn transition(
        mut self,
        state: S,
        action: A,
        next_state: S,
        probability: f64,
        reward: f64,
    ) -> Self {
        self.register(&state);
        self.register(&next_state);

        let actions = self.actions.entry(state).or_default();
        match actions.iter_mut().find(|(a, _)| *a == action) {
            Some((_, outcomes)) => outcomes.push((next_state, probability, reward)),
            None => actions.push((action, vec![(next_state, probability, reward)])),
        }
        self
    }

    /// Marks `state` as terminal. Terminal states expose no actions even if
    /// transitions were added for them.
    pub fn terminal(mut self, state: S) -> Self {
        self.register(&state);
        self.terminals.insert(state);
        self
    }

    /// Finishes the model.
    ///
    /// Outcomes of one (state, action) that land in the same next state
    /// with the same reward are merged by summing their probabilities.
    ///
    /// # Errors
    /// * `InvalidProbability` if any outcome probability is not a finite
    ///   value in `[0, 1]`.
    /// * `ConflictingReward` if one (state, action, next state) is listed
    ///   with two different rewards.
    ///
    /// Probabilities of a (state, action) are not required to sum to one.
    pub fn build(mut self) -> Result<TabularMdp<S, A>> {
        for (state, actions) in &mut self.actions {
            for (_, outcomes) in actions.iter_mut() {
                *outcomes = merge_outcomes(state, outcomes)?;
            }
        }

        Ok(TabularMdp {
            states: self.states,
            actions: self.actions,
            terminals: self.terminals,
        })
    }

    fn register(&mut self, state: &S) {
        if self.known.insert(state.clone()) {
            self.states.push(state.clone());
        }
    }
}

fn merge_outcomes<S>(state: &S, outcomes: &[(S, f64, f64)]) -> Result<Outcomes<S>>
where
    S: Clone + PartialEq + Debug,
{
    let mut merged: Outcomes<S> = Vec::with_capacity(outcomes.len());
    for (next_state, probability, reward) in outcomes {
        if !(0.0..=1.0).contains(probability) {
            return Err(Error::InvalidProbability {
                state: format!("{:?}", state),
                probability: *probability,
            });
        }
        match merged.iter_mut().find(|(s, _, _)| s == next_state) {
            Some((_, p, r)) if *r == *reward => *p += probability,
            Some((_, _, r)) => {
                return Err(Error::ConflictingReward {
                    state: format!("{:?}", state),
                    next_state: format!("{:?}", next_state),
                    first: *r,
                    second: *reward,
                });
            }
            None => merged.push((next_state.clone(), *probability, *reward)),
        }
    }
    Ok(merged)
}
