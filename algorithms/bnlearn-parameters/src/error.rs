use thiserror::Error;

/// Simplified `Result` using [`ParameterError`](crate::ParameterError) as error type
pub type Result<T> = std::result::Result<T, ParameterError>;

/// Error variants from hyper-parameter construction or parameter estimation
#[derive(Error, Debug, Clone)]
pub enum ParameterError {
    /// Value indices do not fit the stride table they are combined with
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// A flat offset lies outside of the allocated table
    #[error("offset {offset} is outside of a table with {len} entries")]
    IndexOutOfRange { offset: usize, len: usize },
    /// An observation is not part of the domain of its variable
    #[error("value {value} of variable {variable} in row {row} is not part of its domain")]
    UnknownCategory {
        variable: String,
        row: usize,
        value: String,
    },
    #[error("chunk size must be at least 1, but is {0}")]
    InvalidChunkSize(usize),
    #[error(transparent)]
    BaseCrate(#[from] bnlearn::Error),
}
