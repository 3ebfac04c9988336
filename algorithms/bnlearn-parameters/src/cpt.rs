use bnlearn::Float;
use ndarray::{s, Array1, ArrayView1, ArrayView2};

use crate::error::{ParameterError, Result};
use crate::storage::CptStorage;
use crate::stride::StrideIndexer;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Conditional probability table of a single variable
///
/// Stores `P(variable | parents)` as a flat array of `k_v * k_1 * .. * k_m` probabilities, laid
/// out by the [`StrideIndexer`] of the variable. The `k_v` entries of every parent configuration
/// are contiguous and sum to one. The raw counts the probabilities were estimated from are kept
/// for diagnostics.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalProbabilityTable<F> {
    variable: String,
    parents: Vec<String>,
    indexer: StrideIndexer,
    counts: Array1<usize>,
    probabilities: Array1<F>,
}

impl<F: Float> ConditionalProbabilityTable<F> {
    pub(crate) fn from_storage(variable: String, parents: Vec<String>, storage: CptStorage) -> Self {
        let probabilities = storage.normalize();
        let (indexer, counts) = storage.into_parts();

        ConditionalProbabilityTable {
            variable,
            parents,
            indexer,
            counts,
            probabilities,
        }
    }

    /// Name of the variable
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Names of the parents, in the order used for the table layout
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn indexer(&self) -> &StrideIndexer {
        &self.indexer
    }

    pub fn strides(&self) -> &[usize] {
        self.indexer.strides()
    }

    /// Raw observation counts, in the same layout as the probabilities
    pub fn counts(&self) -> &Array1<usize> {
        &self.counts
    }

    /// Number of observations the table was estimated from
    pub fn total_counts(&self) -> usize {
        self.counts.sum()
    }

    pub fn probabilities(&self) -> &Array1<F> {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// `P(variable = x_v | parents = x_1, .., x_m)` for value indices `[x_v, x_1, .., x_m]`
    pub fn probability(&self, value_indices: &[usize]) -> Result<F> {
        self.indexer
            .offset(value_indices)
            .map(|offset| self.probabilities[offset])
    }

    /// Distribution of the variable given the parent value indices `[x_1, .., x_m]`
    pub fn distribution(&self, parent_indices: &[usize]) -> Result<ArrayView1<'_, F>> {
        let k = self.indexer.cardinality();
        let start = self.indexer.parent_configuration(parent_indices)? * k;

        Ok(self.probabilities.slice(s![start..start + k]))
    }

    /// The table as a matrix with one row per parent configuration and one column per outcome
    pub fn as_matrix(&self) -> Result<ArrayView2<'_, F>> {
        let shape = (
            self.indexer.n_parent_configurations(),
            self.indexer.cardinality(),
        );

        self.probabilities
            .view()
            .into_shape(shape)
            .map_err(|err| ParameterError::from(bnlearn::Error::from(err)))
    }
}
