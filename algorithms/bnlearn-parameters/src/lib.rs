//!
//! # Parameter learning
//! `bnlearn-parameters` estimates the conditional probability tables of a discrete Bayesian
//! network whose structure is already known.
//!
//! # The big picture
//!
//! `bnlearn-parameters` is a crate of the `bnlearn` workspace. Structure discovery produces a
//! [`NetworkStructure`](bnlearn::structure::NetworkStructure); this crate takes such a structure
//! together with a categorical dataset and fills in the numbers.
//!
//! Every variable owns one flat table over the joint assignments of itself and its parents. The
//! position of an assignment is given by a [`StrideIndexer`]: the outcome of the variable varies
//! fastest, followed by the parents in their declared order. Counting happens in a [`CptStorage`],
//! which is normalized block by block into a [`ConditionalProbabilityTable`].
//!
//! # Current state
//!
//! `bnlearn-parameters` currently provides [maximum likelihood](MaximumLikelihood) estimation,
//! optionally counting chunks of rows in parallel. Parent configurations without observations
//! are given the uniform distribution.
//!

mod algorithm;
mod cpt;
mod error;
mod hyperparams;
mod storage;
mod stride;

pub use algorithm::MaximumLikelihood;
pub use cpt::ConditionalProbabilityTable;
pub use error::{ParameterError, Result};
pub use hyperparams::{MaximumLikelihoodParams, MaximumLikelihoodValidParams, UnknownCategoryPolicy};
pub use storage::CptStorage;
pub use stride::{compute_offset, compute_strides, StrideIndexer};
