pub mod agent;
pub mod async_value_iteration;
pub mod bellman_equation;
pub mod config;
pub mod gridworld;
pub mod mdp;
pub mod predecessors;
pub mod prioritized_sweeping;
pub mod priority_queue;
pub mod tabular;
pub mod value_function;
pub mod value_iteration;

// Re-export dynamic programming solvers with descriptive names
pub use agent::ValueEstimationAgent;
pub use async_value_iteration::AsynchronousValueIterationAgent;
pub use bellman_equation::{
    backup_value, best_q_value, compute_action_from_values, compute_q_value,
};
pub use config::ValueIterationConfig;
pub use gridworld::{GridAction, GridCell, GridState, GridWorld};
pub use mdp::MarkovDecisionProcess;
pub use predecessors::Predecessors;
pub use prioritized_sweeping::PrioritizedSweepingValueIterationAgent;
pub use priority_queue::PriorityQueue;
pub use tabular::{TabularMdp, TabularMdpBuilder};
pub use value_function::ValueFunction;
pub use value_iteration::ValueIterationAgent;
