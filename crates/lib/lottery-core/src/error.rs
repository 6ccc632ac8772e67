use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error("invalid step string: {0:?}")]
    InvalidStepString(String),
    #[error("iterations per epoch must be positive")]
    ZeroIterationsPerEpoch,
    #[error("steps measured with {0} and {1} iterations per epoch cannot be compared")]
    MismatchedEpochLength(u64, u64),
    #[error("{epoch}ep{iteration}it at {iterations_per_epoch} iterations per epoch overflows")]
    Overflow {
        epoch: u64,
        iteration: u64,
        iterations_per_epoch: u64,
    },
}

#[derive(Error, Debug)]
pub enum HparamsError {
    #[error("unsupported optimizer {0:?}, expected sgd or adam")]
    UnknownOptimizer(String),
    #[error("unsupported pruning strategy {0:?}")]
    UnknownPruningStrategy(String),
    #[error("{name} must lie in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[error("{field}: {source}")]
    Step {
        field: &'static str,
        #[source]
        source: StepError,
    },
    #[error("failed to read hyperparameters: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse hyperparameters: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize hyperparameters: {0}")]
    Serialize(#[from] toml::ser::Error),
}
