use bnlearn::Float;
use ndarray::{Array1, Axis, Zip};

use crate::error::{ParameterError, Result};
use crate::stride::StrideIndexer;

/// Flat count table of a single variable
///
/// Holds one counter per joint assignment of the variable and its parents, laid out by the
/// [`StrideIndexer`] it was allocated with. A storage is owned by exactly one learning pass (or
/// one worker of it) and frozen into probabilities with [`normalize`](Self::normalize).
#[derive(Debug, Clone, PartialEq)]
pub struct CptStorage {
    indexer: StrideIndexer,
    counts: Array1<usize>,
}

impl CptStorage {
    /// Zero-filled storage sized to `indexer.len()`
    pub fn allocate(indexer: StrideIndexer) -> Self {
        CptStorage {
            counts: Array1::zeros(indexer.len()),
            indexer,
        }
    }

    pub fn indexer(&self) -> &StrideIndexer {
        &self.indexer
    }

    pub fn counts(&self) -> &Array1<usize> {
        &self.counts
    }

    pub(crate) fn into_parts(self) -> (StrideIndexer, Array1<usize>) {
        (self.indexer, self.counts)
    }

    /// Sum of all counters
    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Add one observation at `offset`
    pub fn increment(&mut self, offset: usize) -> Result<()> {
        let len = self.counts.len();
        let cell = self
            .counts
            .get_mut(offset)
            .ok_or(ParameterError::IndexOutOfRange { offset, len })?;
        *cell += 1;

        Ok(())
    }

    /// Add the counters of a partial storage, for example the result of another worker
    pub fn merge(&mut self, other: &CptStorage) -> Result<()> {
        if self.indexer != other.indexer {
            return Err(ParameterError::DimensionMismatch(format!(
                "cannot merge a table with strides {:?} into a table with strides {:?}",
                other.indexer.strides(),
                self.indexer.strides()
            )));
        }

        self.counts += &other.counts;

        Ok(())
    }

    /// Conditional probabilities of the counted observations
    ///
    /// Every block of `cardinality()` contiguous counters, one per parent configuration, is
    /// divided by its sum. A block without any observation becomes the uniform distribution, so
    /// that every block is a valid distribution.
    pub fn normalize<F: Float>(&self) -> Array1<F> {
        let k = self.indexer.cardinality();
        let mut probabilities = Array1::zeros(self.counts.len());
        if k == 0 {
            return probabilities;
        }

        let uniform = F::one() / F::cast(k);
        for (block, mut out) in self
            .counts
            .axis_chunks_iter(Axis(0), k)
            .zip(probabilities.axis_chunks_iter_mut(Axis(0), k))
        {
            let total = block.sum();
            if total == 0 {
                out.fill(uniform);
            } else {
                let total = F::cast(total);
                Zip::from(&mut out)
                    .and(&block)
                    .for_each(|p, &count| *p = F::cast(count) / total);
            }
        }

        probabilities
    }
}
