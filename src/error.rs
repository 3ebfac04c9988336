//! Error types in bnlearn
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("unknown variable {0}")]
    UnknownVariable(String),
    #[error("variable {0} is declared more than once")]
    DuplicateVariable(String),
    #[error("variable {0} has an empty domain")]
    EmptyDomain(String),
    #[error("variable {variable} lists category {value} more than once")]
    DuplicateCategory { variable: String, value: String },
    #[error("variable {variable} lists parent {parent} more than once")]
    DuplicateParent { variable: String, parent: String },
    #[error("variable {0} cannot be its own parent")]
    SelfLoop(String),
    #[error("parent relation is cyclic through variable {0}")]
    Cycle(String),
    #[error("no column found for variable {0}")]
    MissingColumn(String),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
