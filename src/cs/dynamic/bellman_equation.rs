//! Bellman optimality primitives shared by every value-iteration agent.
//!
//! All functions here are pure reads of a value function: they never
//! mutate it, so the agents decide when an update becomes visible.

use crate::cs::dynamic::mdp::MarkovDecisionProcess;
use crate::cs::dynamic::value_function::ValueFunction;

/// Compute Q(s, a) = sum_{s'} P(s'|s,a) [ R(s,a,s') + gamma * V(s') ].
///
/// Unassigned successor values read as zero.
pub fn compute_q_value<M: MarkovDecisionProcess>(
    mdp: &M,
    values: &ValueFunction<M::State>,
    discount: f64,
    state: &M::State,
    action: &M::Action,
) -> f64 {
    let mut q = 0.0;
    for (next_state, prob) in mdp.transition_states_and_probs(state, action) {
        let reward = mdp.reward(state, action, &next_state);
        q += prob * (reward + discount * values.get(&next_state));
    }
    q
}

/// max_a Q(s, a) over the legal actions of `state`, or `None` when it has
/// none. Ties keep the first maximum.
pub fn best_q_value<M: MarkovDecisionProcess>(
    mdp: &M,
    values: &ValueFunction<M::State>,
    discount: f64,
    state: &M::State,
) -> Option<f64> {
    let mut best: Option<f64> = None;
    for action in mdp.possible_actions(state) {
        let q = compute_q_value(mdp, values, discount, state, &action);
        if best.map_or(true, |b| q > b) {
            best = Some(q);
        }
    }
    best
}

/// The value a state takes under one Bellman backup: zero for terminal
/// states and for states without legal actions.
pub fn backup_value<M: MarkovDecisionProcess>(
    mdp: &M,
    values: &ValueFunction<M::State>,
    discount: f64,
    state: &M::State,
) -> f64 {
    if mdp.is_terminal(state) {
        return 0.0;
    }
    best_q_value(mdp, values, discount, state).unwrap_or(0.0)
}

/// The greedy action in `state`.
///
/// Returns `None` for terminal states and states without legal actions.
/// Ties go to the action enumerated first: later actions must be strictly
/// better to replace it.
pub fn compute_action_from_values<M: MarkovDecisionProcess>(
    mdp: &M,
    values: &ValueFunction<M::State>,
    discount: f64,
    state: &M::State,
) -> Option<M::Action> {
    if mdp.is_terminal(state) {
        return None;
    }

    let mut best_action = None;
    let mut best_val = f64::NEG_INFINITY;
    for action in mdp.possible_actions(state) {
        let q_sa = compute_q_value(mdp, values, discount, state, &action);
        if q_sa > best_val {
            best_val = q_sa;
            best_action = Some(action);
        }
    }
    best_action
}
