use bnlearn::{Float, ParamGuard};
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{ParameterError, Result};
use crate::MaximumLikelihood;

/// Handling of observations which are not part of the domain of their variable
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnknownCategoryPolicy {
    /// Fail the whole estimation with [`UnknownCategory`](ParameterError::UnknownCategory)
    Abort,
    /// Drop the offending row from every table and keep counting the remaining rows
    SkipRow,
}

impl Default for UnknownCategoryPolicy {
    fn default() -> Self {
        UnknownCategoryPolicy::Abort
    }
}

/// The set of hyperparameters that can be specified for the
/// [maximum likelihood](MaximumLikelihood) estimation of conditional probability tables.
///
/// ### Example
///
/// ```rust
/// use bnlearn::prelude::*;
/// use bnlearn_parameters::{MaximumLikelihood, UnknownCategoryPolicy};
/// use ndarray::array;
///
/// let structure = NetworkStructure::builder()
///     .variable("X", vec!["a", "b"])
///     .variable("Y", vec!["0", "1"])
///     .edge("X", "Y")
///     .build()?;
/// let dataset = array![["a", "0"], ["a", "1"], ["c", "1"], ["b", "1"]];
///
/// let model = MaximumLikelihood::<f64>::params()
///     .unknown_category(UnknownCategoryPolicy::SkipRow)
///     .fit(&structure, &dataset)?;
///
/// assert_eq!(model.n_skipped(), 1);
/// assert_eq!(model.cpt("Y")?.probability(&[1, 1])?, 1.0);
/// # Ok::<(), bnlearn_parameters::ParameterError>(())
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaximumLikelihoodValidParams<F> {
    unknown_category: UnknownCategoryPolicy,
    parallel: bool,
    chunk_size: usize,

    float_marker: PhantomData<F>,
}

impl<F: Float> MaximumLikelihoodValidParams<F> {
    pub fn unknown_category(&self) -> UnknownCategoryPolicy {
        self.unknown_category
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaximumLikelihoodParams<F>(MaximumLikelihoodValidParams<F>);

impl<F: Float> MaximumLikelihoodParams<F> {
    pub fn new() -> Self {
        Self(MaximumLikelihoodValidParams {
            unknown_category: UnknownCategoryPolicy::Abort,
            parallel: false,
            chunk_size: 4096,
            float_marker: PhantomData,
        })
    }

    /// Sets the handling of values outside of the declared domains
    pub fn unknown_category(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.0.unknown_category = policy;
        self
    }

    /// Count disjoint chunks of rows on the rayon thread pool
    ///
    /// The partial tables are merged in chunk order, the estimate is identical to a sequential
    /// pass.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.0.parallel = parallel;
        self
    }

    /// Sets the number of rows counted by a single parallel task
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.0.chunk_size = chunk_size;
        self
    }
}

impl<F: Float> Default for MaximumLikelihoodParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> MaximumLikelihood<F> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `unknown_category = UnknownCategoryPolicy::Abort`
    /// * `parallel = false`
    /// * `chunk_size = 4096`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> MaximumLikelihoodParams<F> {
        MaximumLikelihoodParams::new()
    }
}

impl<F: Float> ParamGuard for MaximumLikelihoodParams<F> {
    type Checked = MaximumLikelihoodValidParams<F>;
    type Error = ParameterError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.chunk_size == 0 {
            Err(ParameterError::InvalidChunkSize(self.0.chunk_size))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
