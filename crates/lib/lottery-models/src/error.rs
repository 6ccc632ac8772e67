use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid model name: {0}")]
    InvalidModelName(String),
    #[error("Unknown initializer: {0}")]
    UnknownInitializer(String),
    #[error("A channel plan needs at least one width")]
    EmptyPlan,
    #[error("Channel widths must be positive, got {0:?}")]
    ZeroWidth(Vec<usize>),
    #[error("A {height}x{width} input does not survive {stages} pooling stages")]
    InputTooSmall {
        height: usize,
        width: usize,
        stages: usize,
    },
    #[error("Expected input of shape {expected:?}, got {actual:?}")]
    InputShape {
        expected: [usize; 3],
        actual: [usize; 3],
    },
    #[error("{model} takes {expected:?} inputs but {dataset} images are {actual:?}")]
    DatasetMismatch {
        model: String,
        dataset: String,
        expected: [usize; 3],
        actual: [usize; 3],
    },
    #[error("Flattened features ({actual}) do not match the output layer input ({expected})")]
    ShapeMismatch { expected: usize, actual: usize },
}
