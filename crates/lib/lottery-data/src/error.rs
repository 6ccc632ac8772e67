use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("no dataset is registered as {0:?}")]
    UnknownDataset(String),
    #[error("failed to fetch the {dataset} dataset: {reason}")]
    Fetch {
        dataset: &'static str,
        reason: String,
    },
    #[error("failed to read cached examples: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to decode an example image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("label {label} of example {index} is negative")]
    NegativeLabel { index: usize, label: i64 },
    #[error("{examples} examples but {labels} labels")]
    LabelCountMismatch { examples: usize, labels: usize },
    #[error("label {label} of example {index} is outside [0, {num_classes})")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        num_classes: usize,
    },
    #[error("expected {expected} values for shape {shape:?}, found {actual}")]
    BufferSize {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("example has {actual} values, a {height}x{width}x{channels} image needs {expected}")]
    ExampleShape {
        height: usize,
        width: usize,
        channels: usize,
        expected: usize,
        actual: usize,
    },
    #[error("batch size must be positive")]
    ZeroBatchSize,
    #[error("{name} must lie in (0, 1], got {value}")]
    InvalidFraction { name: &'static str, value: f64 },
}
