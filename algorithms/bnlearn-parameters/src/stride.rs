//! Flattening of joint assignments
//!
//! The conditional probability table of a variable `v` with parents `p_1..p_m` is stored as a
//! single flat array. A joint assignment `(x_v, x_1, .., x_m)` lives at offset
//! `x_v * s_v + x_1 * s_1 + .. + x_m * s_m`, where `s_v = 1` and `s_i` is the product of the
//! domain sizes of `v` and all parents preceding `p_i`. The outcome of `v` is the fastest varying
//! index, so the `k_v` outcomes of one parent configuration are contiguous.
use crate::error::{ParameterError, Result};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Strides of the given domain sizes together with the number of cells they span
fn checked_strides(cardinalities: &[usize]) -> Result<(Vec<usize>, usize)> {
    let mut strides = Vec::with_capacity(cardinalities.len());
    let mut len: usize = 1;
    for &k in cardinalities {
        strides.push(len);
        len = len.checked_mul(k).ok_or_else(|| {
            ParameterError::DimensionMismatch(format!(
                "a table over domains of sizes {:?} has more cells than fit into usize",
                cardinalities
            ))
        })?;
    }

    Ok((strides, len))
}

/// Compute the stride table of a variable with `cardinality` outcomes and the given parent
/// domain sizes, in parent order
///
/// The result has length `1 + parent_cardinalities.len()` and starts with `1`. Fails with
/// [`DimensionMismatch`](ParameterError::DimensionMismatch) if the table would have more than
/// `usize::MAX` cells.
pub fn compute_strides(cardinality: usize, parent_cardinalities: &[usize]) -> Result<Vec<usize>> {
    let cardinalities = std::iter::once(cardinality)
        .chain(parent_cardinalities.iter().copied())
        .collect::<Vec<_>>();

    checked_strides(&cardinalities).map(|(strides, _)| strides)
}

/// Dot product of value indices and strides
///
/// Only the lengths are checked here, use [`StrideIndexer::offset`] to also validate every index
/// against its domain.
pub fn compute_offset(value_indices: &[usize], strides: &[usize]) -> Result<usize> {
    if value_indices.len() != strides.len() {
        return Err(ParameterError::DimensionMismatch(format!(
            "got {} value indices for {} strides",
            value_indices.len(),
            strides.len()
        )));
    }

    value_indices
        .iter()
        .zip(strides)
        .try_fold(0usize, |offset, (idx, stride)| {
            idx.checked_mul(*stride)
                .and_then(|term| offset.checked_add(term))
        })
        .ok_or_else(|| {
            ParameterError::DimensionMismatch(format!(
                "offset of {:?} with strides {:?} does not fit into usize",
                value_indices, strides
            ))
        })
}

/// Stride table of a single variable
///
/// Converts joint value-index tuples `[x_v, x_1, .., x_m]` into flat offsets and back. The mapping
/// is a bijection between all valid tuples and `0..len()`.
///
/// ```
/// use bnlearn_parameters::StrideIndexer;
///
/// // binary variable with a ternary and a binary parent
/// let indexer = StrideIndexer::new(2, &[3, 2])?;
/// assert_eq!(indexer.strides(), &[1, 2, 6]);
/// assert_eq!(indexer.len(), 12);
///
/// let offset = indexer.offset(&[1, 2, 1])?;
/// assert_eq!(offset, 11);
/// assert_eq!(indexer.decode(offset)?, vec![1, 2, 1]);
/// # Ok::<(), bnlearn_parameters::ParameterError>(())
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrideIndexer {
    cardinalities: Vec<usize>,
    strides: Vec<usize>,
    len: usize,
}

impl StrideIndexer {
    /// Stride table of a variable with `cardinality` outcomes and the given parent domain sizes
    ///
    /// # Errors
    ///
    /// Returns [`DimensionMismatch`](ParameterError::DimensionMismatch) if the table would have
    /// more than `usize::MAX` cells.
    pub fn new(cardinality: usize, parent_cardinalities: &[usize]) -> Result<Self> {
        let cardinalities = std::iter::once(cardinality)
            .chain(parent_cardinalities.iter().copied())
            .collect::<Vec<_>>();
        let (strides, len) = checked_strides(&cardinalities)?;

        Ok(StrideIndexer {
            cardinalities,
            strides,
            len,
        })
    }

    /// Domain sizes `[k_v, k_1, .., k_m]`
    pub fn cardinalities(&self) -> &[usize] {
        &self.cardinalities
    }

    /// Domain size of the variable itself
    pub fn cardinality(&self) -> usize {
        self.cardinalities[0]
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of cells in the flat table
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of parent configurations, one block of `cardinality()` cells each
    pub fn n_parent_configurations(&self) -> usize {
        self.len.checked_div(self.cardinality()).unwrap_or(0)
    }

    /// Flat offset of the joint assignment `[x_v, x_1, .., x_m]`
    ///
    /// # Errors
    ///
    /// Returns [`DimensionMismatch`](ParameterError::DimensionMismatch) if the number of indices
    /// differs from the number of strides or an index is outside of its domain.
    pub fn offset(&self, value_indices: &[usize]) -> Result<usize> {
        if let Some((position, (idx, k))) = value_indices
            .iter()
            .zip(&self.cardinalities)
            .enumerate()
            .find(|(_, (idx, k))| idx >= k)
        {
            return Err(ParameterError::DimensionMismatch(format!(
                "value index {} at position {} is outside of a domain of size {}",
                idx, position, k
            )));
        }

        compute_offset(value_indices, &self.strides)
    }

    /// Joint assignment stored at `offset`
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`](ParameterError::IndexOutOfRange) if `offset >= len()`.
    pub fn decode(&self, offset: usize) -> Result<Vec<usize>> {
        if offset >= self.len {
            return Err(ParameterError::IndexOutOfRange {
                offset,
                len: self.len,
            });
        }

        Ok(self
            .strides
            .iter()
            .zip(&self.cardinalities)
            .map(|(stride, k)| (offset / stride) % k)
            .collect())
    }

    /// Block number of a parent configuration `[x_1, .., x_m]`
    pub fn parent_configuration(&self, parent_indices: &[usize]) -> Result<usize> {
        let value_indices = std::iter::once(0)
            .chain(parent_indices.iter().copied())
            .collect::<Vec<_>>();

        self.offset(&value_indices)
            .map(|offset| offset / self.cardinality())
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_offset, compute_strides, StrideIndexer};
    use crate::ParameterError;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<StrideIndexer>();
    }

    #[test]
    fn strides_follow_parent_order() {
        assert_eq!(compute_strides(2, &[]).unwrap(), vec![1]);
        assert_eq!(compute_strides(2, &[2]).unwrap(), vec![1, 2]);
        assert_eq!(compute_strides(3, &[4, 2, 5]).unwrap(), vec![1, 3, 12, 24]);
        assert_eq!(compute_strides(2, &[5, 4, 2]).unwrap(), vec![1, 2, 10, 40]);
    }

    #[test]
    fn oversized_tables_are_rejected() {
        let parents = vec![2; 64];

        assert!(matches!(
            StrideIndexer::new(2, &parents),
            Err(ParameterError::DimensionMismatch(_))
        ));
        assert!(matches!(
            compute_strides(2, &parents),
            Err(ParameterError::DimensionMismatch(_))
        ));
        assert!(matches!(
            compute_offset(&[2, 1], &[1, usize::MAX]),
            Err(ParameterError::DimensionMismatch(_))
        ));

        let indexer = StrideIndexer::new(2, &parents[..62]).unwrap();
        assert_eq!(indexer.len(), 1usize << 63);
        assert_eq!(indexer.strides()[62], 1usize << 62);
    }

    #[test]
    fn offset_is_a_dot_product() {
        assert_eq!(compute_offset(&[1, 2, 1], &[1, 3, 12]).unwrap(), 1 + 6 + 12);
        assert_eq!(compute_offset(&[], &[]).unwrap(), 0);

        assert!(matches!(
            compute_offset(&[1, 2], &[1, 3, 12]),
            Err(ParameterError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn indexer_without_parents() {
        let indexer = StrideIndexer::new(4, &[]).unwrap();

        assert_eq!(indexer.strides(), &[1]);
        assert_eq!(indexer.len(), 4);
        assert_eq!(indexer.n_parent_configurations(), 1);
        assert_eq!(indexer.offset(&[3]).unwrap(), 3);
        assert_eq!(indexer.parent_configuration(&[]).unwrap(), 0);
    }

    #[test]
    fn offset_validates_indices() {
        let indexer = StrideIndexer::new(2, &[3]).unwrap();

        assert!(matches!(
            indexer.offset(&[0, 3]),
            Err(ParameterError::DimensionMismatch(_))
        ));
        assert!(matches!(
            indexer.offset(&[2, 0]),
            Err(ParameterError::DimensionMismatch(_))
        ));
        assert!(matches!(
            indexer.offset(&[0]),
            Err(ParameterError::DimensionMismatch(_))
        ));
        assert!(matches!(
            indexer.offset(&[0, 1, 0]),
            Err(ParameterError::DimensionMismatch(_))
        ));
        assert!(matches!(
            indexer.decode(6),
            Err(ParameterError::IndexOutOfRange { offset: 6, len: 6 })
        ));
    }

    #[test]
    fn parent_configurations_are_contiguous_blocks() {
        let indexer = StrideIndexer::new(3, &[2, 2]).unwrap();

        assert_eq!(indexer.n_parent_configurations(), 4);
        for (config, parents) in [[0, 0], [1, 0], [0, 1], [1, 1]].iter().enumerate() {
            assert_eq!(indexer.parent_configuration(parents).unwrap(), config);
            for outcome in 0..3 {
                let offset = indexer.offset(&[outcome, parents[0], parents[1]]).unwrap();
                assert_eq!(offset, config * 3 + outcome);
            }
        }
    }

    #[test]
    fn offsets_are_a_bijection() {
        let indexer = StrideIndexer::new(3, &[2, 4, 1, 3]).unwrap();

        let offsets = (0..indexer.len())
            .map(|offset| {
                let tuple = indexer.decode(offset).unwrap();
                assert_eq!(tuple.len(), 5);
                indexer.offset(&tuple).unwrap()
            })
            .collect::<Vec<_>>();

        assert_eq!(offsets, (0..indexer.len()).collect::<Vec<_>>());
    }

    #[test]
    fn random_tuples_round_trip() {
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let cardinality = rng.gen_range(1..5);
            let parents = (0..rng.gen_range(0..4))
                .map(|_| rng.gen_range(1..5))
                .collect::<Vec<usize>>();
            let indexer = StrideIndexer::new(cardinality, &parents).unwrap();

            let mut seen = HashSet::new();
            for _ in 0..20 {
                let tuple = indexer
                    .cardinalities()
                    .iter()
                    .map(|&k| rng.gen_range(0..k))
                    .collect::<Vec<_>>();

                let offset = indexer.offset(&tuple).unwrap();
                assert!(offset < indexer.len());
                assert_eq!(indexer.decode(offset).unwrap(), tuple);
                seen.insert((tuple, offset));
            }

            // equal offsets only for equal tuples
            let offsets = seen.iter().map(|(_, offset)| offset).collect::<HashSet<_>>();
            assert_eq!(offsets.len(), seen.len());
        }
    }
}
