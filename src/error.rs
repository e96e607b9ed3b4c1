/// Errors raised while configuring an agent or building a model.
///
/// Running value iteration itself never fails: once the configuration has
/// been validated, the solvers trust the model they are given.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("discount factor must lie in [0, 1], got {0}")]
    InvalidDiscount(f64),

    #[error("convergence threshold must be non-negative, got {0}")]
    InvalidTheta(f64),

    #[error("transition probability {probability} from state {state} is not in [0, 1]")]
    InvalidProbability { state: String, probability: f64 },

    #[error("outcome {state} -> {next_state} is listed with rewards {first} and {second}")]
    ConflictingReward {
        state: String,
        next_state: String,
        first: f64,
        second: f64,
    },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("noise must lie in [0, 1], got {0}")]
    InvalidNoise(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
