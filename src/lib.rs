//! `bnlearn` provides the building blocks for learning discrete Bayesian networks with Rust.
//!
//! A discrete Bayesian network is a directed acyclic graph of categorical random variables, in
//! which every variable carries a conditional probability table given its parents. Learning such
//! a network happens in two steps:
//!
//! * structure discovery, which finds the graph from data
//!   ([`LearnStructure`](traits::LearnStructure))
//! * parameter learning, which estimates the conditional probability tables of a known graph
//!   ([`Fit`](traits::Fit))
//!
//! This crate contains the shared vocabulary of both steps: the categorical
//! [`Dataset`](dataset::DatasetBase) adapter, the immutable
//! [`NetworkStructure`](structure::NetworkStructure), the error type and the traits implemented
//! by the algorithm crates of the workspace, for example `bnlearn-parameters`.
//!
//! ## Example
//!
//! ```
//! use bnlearn::prelude::*;
//! use ndarray::array;
//!
//! let structure = NetworkStructure::builder()
//!     .variable("X", vec!["a", "b"])
//!     .variable("Y", vec!["0", "1"])
//!     .edge("X", "Y")
//!     .build()?;
//!
//! let dataset = Dataset::new(array![["a", "0"], ["a", "1"], ["b", "1"]])
//!     .with_feature_names(vec!["X", "Y"]);
//!
//! let known = KnownStructure::new(structure);
//! let learned = known.learn_structure(&dataset)?;
//! assert_eq!(learned.parents("Y")?, vec!["X"]);
//! # Ok::<(), bnlearn::Error>(())
//! ```

pub mod benchmarks;
pub mod dataset;
pub mod error;
mod param_guard;
pub mod prelude;
pub mod structure;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, DatasetView, Float, Label};
pub use error::Error;
pub use param_guard::ParamGuard;
