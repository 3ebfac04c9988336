use std::collections::HashMap;

use bnlearn::dataset::{AsRecords, Label};
use bnlearn::structure::NetworkStructure;
use bnlearn::traits::Fit;
use bnlearn::Float;
use ndarray::{s, ArrayView2};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::cpt::ConditionalProbabilityTable;
use crate::error::{ParameterError, Result};
use crate::hyperparams::{MaximumLikelihoodValidParams, UnknownCategoryPolicy};
use crate::storage::CptStorage;
use crate::stride::StrideIndexer;

/// Columns and stride table of the conditional probability table of one node
///
/// `columns` holds the node itself followed by its parents, in the order of the strides.
struct TableLayout {
    columns: Vec<usize>,
    indexer: StrideIndexer,
}

impl TableLayout {
    fn of<L: Label>(structure: &NetworkStructure<L>, node: usize) -> Result<Self> {
        let variable = &structure.variables()[node];

        Ok(TableLayout {
            columns: std::iter::once(node)
                .chain(variable.parents().iter().copied())
                .collect(),
            indexer: StrideIndexer::new(
                variable.cardinality(),
                &structure.parent_cardinalities(node),
            )?,
        })
    }
}

/// Count tables of a contiguous range of rows
struct PartialCounts {
    storages: Vec<CptStorage>,
    n_counted: usize,
    n_skipped: usize,
}

impl PartialCounts {
    fn merge(mut self, other: PartialCounts) -> Result<Self> {
        for (storage, partial) in self.storages.iter_mut().zip(&other.storages) {
            storage.merge(partial)?;
        }
        self.n_counted += other.n_counted;
        self.n_skipped += other.n_skipped;

        Ok(self)
    }
}

/// Count every row of `records` into freshly allocated tables
///
/// `first_row` is the position of the first row of `records` in the whole dataset and only used
/// for error reporting. All offsets of a row are computed before any table is touched, so a
/// rejected row leaves no partial counts behind.
fn count_rows<L: Label>(
    structure: &NetworkStructure<L>,
    layouts: &[TableLayout],
    records: ArrayView2<'_, L>,
    first_row: usize,
    policy: UnknownCategoryPolicy,
) -> Result<PartialCounts> {
    let mut storages = layouts
        .iter()
        .map(|layout| CptStorage::allocate(layout.indexer.clone()))
        .collect::<Vec<_>>();
    let (mut n_counted, mut n_skipped) = (0, 0);

    let mut value_indices = vec![0; structure.nnodes()];
    let mut offsets = vec![0; layouts.len()];
    let mut tuple = Vec::new();

    'rows: for (i, row) in records.outer_iter().enumerate() {
        for (node, variable) in structure.variables().iter().enumerate() {
            let value = &row[node];
            match variable.value_index(value) {
                Some(idx) => value_indices[node] = idx,
                None if policy == UnknownCategoryPolicy::SkipRow => {
                    warn!(
                        row = first_row + i,
                        variable = variable.name(),
                        "skipping row with unknown category {:?}",
                        value
                    );
                    n_skipped += 1;
                    continue 'rows;
                }
                None => {
                    return Err(ParameterError::UnknownCategory {
                        variable: variable.name().to_string(),
                        row: first_row + i,
                        value: format!("{:?}", value),
                    })
                }
            }
        }

        for (offset, layout) in offsets.iter_mut().zip(layouts) {
            tuple.clear();
            tuple.extend(layout.columns.iter().map(|&column| value_indices[column]));
            *offset = layout.indexer.offset(&tuple)?;
        }

        for (storage, &offset) in storages.iter_mut().zip(&offsets) {
            storage.increment(offset)?;
        }
        n_counted += 1;
    }

    Ok(PartialCounts {
        storages,
        n_counted,
        n_skipped,
    })
}

/// Maximum likelihood estimate of the parameters of a discrete Bayesian network
///
/// Every variable `v` with parents `p_1..p_m` gets the table
///
/// ```text
/// P(v = x | p_1 = y_1, .., p_m = y_m) = N(x, y_1, .., y_m) / N(y_1, .., y_m)
/// ```
///
/// where `N` counts the matching rows of the dataset. Parent configurations which never occur
/// get the uniform distribution `1 / k_v`.
///
/// The dataset has one row per observation and one column per variable, in the node order of
/// the network structure. Further columns are ignored. Use
/// [`DatasetBase::align_to`](bnlearn::DatasetBase::align_to) to reorder a dataset with named
/// columns.
///
/// ### Example
///
/// ```rust
/// use bnlearn::prelude::*;
/// use bnlearn_parameters::MaximumLikelihood;
/// use ndarray::array;
///
/// let structure = NetworkStructure::builder()
///     .variable("X", vec!["a", "b"])
///     .variable("Y", vec!["0", "1"])
///     .edge("X", "Y")
///     .build()?;
/// let dataset = array![["a", "0"], ["a", "1"], ["b", "1"]];
///
/// let model = MaximumLikelihood::<f64>::params().fit(&structure, &dataset)?;
///
/// let y = model.cpt("Y")?;
/// assert_eq!(y.strides(), &[1, 2]);
/// assert_eq!(y.probabilities().to_vec(), vec![0.5, 0.5, 0.0, 1.0]);
/// # Ok::<(), bnlearn_parameters::ParameterError>(())
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct MaximumLikelihood<F> {
    tables: Vec<ConditionalProbabilityTable<F>>,
    index: HashMap<String, usize>,
    n_counted: usize,
    n_skipped: usize,
}

impl<F: Float> MaximumLikelihood<F> {
    /// Conditional probability table of a variable
    pub fn cpt(&self, name: &str) -> Result<&ConditionalProbabilityTable<F>> {
        self.index
            .get(name)
            .map(|&idx| &self.tables[idx])
            .ok_or_else(|| bnlearn::Error::UnknownVariable(name.to_string()).into())
    }

    /// All tables in node order
    pub fn tables(&self) -> &[ConditionalProbabilityTable<F>] {
        &self.tables
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionalProbabilityTable<F>)> + '_ {
        self.tables.iter().map(|table| (table.variable(), table))
    }

    pub fn nvariables(&self) -> usize {
        self.tables.len()
    }

    /// Number of rows which contributed to the tables
    pub fn n_counted(&self) -> usize {
        self.n_counted
    }

    /// Number of rows dropped by [`UnknownCategoryPolicy::SkipRow`]
    pub fn n_skipped(&self) -> usize {
        self.n_skipped
    }

    /// Consume the model and return the tables keyed by variable name
    pub fn into_map(self) -> HashMap<String, ConditionalProbabilityTable<F>> {
        self.tables
            .into_iter()
            .map(|table| (table.variable().to_string(), table))
            .collect()
    }
}

impl<F: Float, R: AsRecords> Fit<R, ParameterError> for MaximumLikelihoodValidParams<F> {
    type Object = MaximumLikelihood<F>;

    /// Count every row of the dataset and normalize the counts of each variable per parent
    /// configuration
    ///
    /// # Errors
    ///
    /// * [`DimensionMismatch`](ParameterError::DimensionMismatch) if the dataset has fewer columns
    ///   than the structure has nodes
    /// * [`UnknownCategory`](ParameterError::UnknownCategory) for the first value outside of its
    ///   domain, unless rows are skipped
    fn fit(
        &self,
        structure: &NetworkStructure<R::Elem>,
        dataset: &R,
    ) -> Result<MaximumLikelihood<F>> {
        let records = dataset.as_records();
        let (nrows, nnodes) = (records.nrows(), structure.nnodes());

        if records.ncols() < nnodes {
            return Err(ParameterError::DimensionMismatch(format!(
                "dataset has {} columns, but the network has {} nodes",
                records.ncols(),
                nnodes
            )));
        }

        let layouts = (0..nnodes)
            .map(|node| TableLayout::of(structure, node))
            .collect::<Result<Vec<_>>>()?;

        let policy = self.unknown_category();
        let chunk_size = self.chunk_size();
        debug!(
            nodes = nnodes,
            rows = nrows,
            parallel = self.parallel(),
            "estimating conditional probability tables"
        );

        let counts = if self.parallel() && nrows > chunk_size {
            let starts = (0..nrows).step_by(chunk_size).collect::<Vec<_>>();
            trace!(chunks = starts.len(), chunk_size, "counting rows in parallel");

            let partials = starts
                .into_par_iter()
                .map(|start| {
                    let end = usize::min(start + chunk_size, nrows);
                    count_rows(
                        structure,
                        &layouts,
                        records.slice(s![start..end, ..]),
                        start,
                        policy,
                    )
                })
                .collect::<Vec<_>>();

            // chunks are in row order, so the first error belongs to the lowest row
            let mut partials = partials.into_iter().collect::<Result<Vec<_>>>()?.into_iter();
            match partials.next() {
                Some(first) => partials.try_fold(first, PartialCounts::merge)?,
                None => count_rows(structure, &layouts, records, 0, policy)?,
            }
        } else {
            count_rows(structure, &layouts, records, 0, policy)?
        };

        let variables = structure.variables();
        let tables = counts
            .storages
            .into_iter()
            .zip(variables)
            .map(|(storage, variable)| {
                trace!(
                    variable = variable.name(),
                    cells = storage.counts().len(),
                    observations = storage.total(),
                    "normalizing table"
                );
                let parents = variable
                    .parents()
                    .iter()
                    .map(|&parent| variables[parent].name().to_string())
                    .collect();

                ConditionalProbabilityTable::from_storage(
                    variable.name().to_string(),
                    parents,
                    storage,
                )
            })
            .collect::<Vec<_>>();

        let index = structure
            .nodes()
            .enumerate()
            .map(|(idx, name)| (name.to_string(), idx))
            .collect();

        debug!(
            counted = counts.n_counted,
            skipped = counts.n_skipped,
            "finished parameter estimation"
        );

        Ok(MaximumLikelihood {
            tables,
            index,
            n_counted: counts.n_counted,
            n_skipped: counts.n_skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnknownCategoryPolicy;
    use approx::assert_abs_diff_eq;
    use bnlearn::prelude::*;
    use ndarray::{array, Array2};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn chain() -> NetworkStructure<&'static str> {
        NetworkStructure::builder()
            .variable("X", vec!["a", "b", "c"])
            .variable("Y", vec!["0", "1"])
            .edge("X", "Y")
            .build()
            .unwrap()
    }

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<MaximumLikelihood<f64>>();
    }

    #[test]
    fn single_variable_frequencies() {
        let structure = NetworkStructure::builder()
            .variable("A", vec!["a", "b"])
            .build()
            .unwrap();
        let dataset = array![["a"], ["a"], ["b"]];

        let model = MaximumLikelihood::<f64>::params()
            .fit(&structure, &dataset)
            .unwrap();
        let cpt = model.cpt("A").unwrap();

        assert_eq!(cpt.counts(), &array![2, 1]);
        assert_abs_diff_eq!(
            cpt.probabilities(),
            &array![2. / 3., 1. / 3.],
            epsilon = 1e-12
        );
        assert_eq!(model.n_counted(), 3);
    }

    #[test]
    fn conditional_frequencies() {
        let structure = NetworkStructure::builder()
            .variable("X", vec!["a", "b"])
            .variable("Y", vec!["0", "1"])
            .edge("X", "Y")
            .build()
            .unwrap();
        let dataset = array![["a", "0"], ["a", "1"], ["b", "1"]];

        let model = MaximumLikelihood::<f64>::params()
            .fit(&structure, &dataset)
            .unwrap();

        let x = model.cpt("X").unwrap();
        assert_eq!(x.counts(), &array![2, 1]);

        let y = model.cpt("Y").unwrap();
        assert_eq!(y.parents(), &["X".to_string()]);
        assert_eq!(y.strides(), &[1, 2]);
        assert_eq!(y.counts(), &array![1, 1, 0, 1]);
        assert_abs_diff_eq!(y.probabilities(), &array![0.5, 0.5, 0.0, 1.0]);

        let names = model
            .tables()
            .iter()
            .map(|table| table.variable())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn unobserved_parent_configurations_are_uniform() {
        let dataset = array![["a", "1"], ["a", "1"], ["a", "0"], ["a", "1"]];

        let model = MaximumLikelihood::<f32>::params()
            .fit(&chain(), &dataset)
            .unwrap();
        let y = model.cpt("Y").unwrap();

        assert_abs_diff_eq!(y.distribution(&[0]).unwrap(), array![0.25f32, 0.75]);
        assert_abs_diff_eq!(y.distribution(&[1]).unwrap(), array![0.5f32, 0.5]);
        assert_abs_diff_eq!(y.distribution(&[2]).unwrap(), array![0.5f32, 0.5]);
    }

    #[test]
    fn empty_dataset_gives_uniform_tables() {
        let dataset = Array2::<&str>::from_shape_vec((0, 2), vec![]).unwrap();

        let model = MaximumLikelihood::<f64>::params()
            .fit(&chain(), &dataset)
            .unwrap();

        assert_eq!(model.n_counted(), 0);
        assert_abs_diff_eq!(
            model.cpt("X").unwrap().probabilities(),
            &array![1. / 3., 1. / 3., 1. / 3.],
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            model.cpt("Y").unwrap().probabilities(),
            &array![0.5, 0.5, 0.5, 0.5, 0.5, 0.5]
        );
    }

    #[test]
    fn duplicate_rows_accumulate() {
        let dataset = array![["b", "0"], ["b", "0"], ["b", "0"]];

        let model = MaximumLikelihood::<f64>::params()
            .fit(&chain(), &dataset)
            .unwrap();

        assert_eq!(model.cpt("X").unwrap().counts(), &array![0, 3, 0]);
        assert_abs_diff_eq!(
            model.cpt("Y").unwrap().distribution(&[1]).unwrap(),
            array![1.0, 0.0]
        );
    }

    #[test]
    fn extra_columns_are_ignored() {
        let dataset = array![["a", "0", "ignored"], ["c", "1", "ignored"]];

        let model = MaximumLikelihood::<f64>::params()
            .fit(&chain(), &dataset)
            .unwrap();

        assert_eq!(model.cpt("Y").unwrap().counts(), &array![1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn rejects_missing_columns() {
        let dataset = array![["a"], ["b"]];

        let err = MaximumLikelihood::<f64>::params()
            .fit(&chain(), &dataset)
            .unwrap_err();

        assert!(matches!(err, ParameterError::DimensionMismatch(_)));
    }

    #[test]
    fn rejects_tables_larger_than_the_address_space() {
        let parents = (0..64).map(|idx| format!("p{}", idx)).collect::<Vec<_>>();
        let structure = parents
            .iter()
            .fold(NetworkStructure::builder(), |builder, name| {
                builder.variable(name.as_str(), vec![0, 1])
            })
            .variable("child", vec![0, 1])
            .parents("child", parents.iter().map(|x| x.as_str()))
            .build()
            .unwrap();

        let err = MaximumLikelihood::<f64>::params()
            .fit(&structure, &Array2::<i32>::zeros((1, 65)))
            .unwrap_err();

        assert!(matches!(err, ParameterError::DimensionMismatch(_)));
    }

    #[test]
    fn rejects_unknown_category() {
        let dataset = array![["a", "0"], ["b", "1"], ["z", "1"], ["a", "2"]];

        let err = MaximumLikelihood::<f64>::params()
            .fit(&chain(), &dataset)
            .unwrap_err();

        assert!(matches!(
            err,
            ParameterError::UnknownCategory { variable, row, value }
                if variable == "X" && row == 2 && value == "\"z\""
        ));
    }

    #[test]
    fn parallel_reports_the_first_unknown_category() {
        let dataset = array![["a", "0"], ["b", "1"], ["c", "1"], ["a", "2"], ["z", "1"]];

        let err = MaximumLikelihood::<f64>::params()
            .parallel(true)
            .chunk_size(1)
            .fit(&chain(), &dataset)
            .unwrap_err();

        assert!(matches!(
            err,
            ParameterError::UnknownCategory { variable, row, .. } if variable == "Y" && row == 3
        ));
    }

    #[test]
    fn skips_rows_with_unknown_categories() {
        let dataset = array![["a", "0"], ["z", "1"], ["a", "1"], ["b", "9"]];

        let model = MaximumLikelihood::<f64>::params()
            .unknown_category(UnknownCategoryPolicy::SkipRow)
            .fit(&chain(), &dataset)
            .unwrap();

        assert_eq!(model.n_counted(), 2);
        assert_eq!(model.n_skipped(), 2);
        // the valid X value of the last row must not be counted either
        assert_eq!(model.cpt("X").unwrap().counts(), &array![2, 0, 0]);
        assert_eq!(model.cpt("Y").unwrap().total_counts(), 2);
    }

    #[test]
    fn counts_sum_to_number_of_rows() {
        let structure = NetworkStructure::builder()
            .variable("A", vec![0, 1, 2])
            .variable("B", vec![0, 1])
            .variable("C", vec![0, 1, 2, 3])
            .parents("C", vec!["B", "A"])
            .edge("A", "B")
            .build()
            .unwrap();

        let mut rng = SmallRng::seed_from_u64(42);
        let dataset = Array2::from_shape_fn((500, 3), |(_, col)| match col {
            0 => rng.gen_range(0..3),
            1 => rng.gen_range(0..2),
            _ => rng.gen_range(0..4),
        });

        let model = MaximumLikelihood::<f64>::params()
            .fit(&structure, &dataset)
            .unwrap();

        for (name, cpt) in model.iter() {
            assert_eq!(cpt.total_counts(), 500, "{}", name);

            let matrix = cpt.as_matrix().unwrap();
            for row in matrix.rows() {
                assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
            }
        }

        let c = model.cpt("C").unwrap();
        assert_eq!(c.strides(), &[1, 4, 8]);
        assert_eq!(c.len(), 24);
    }

    #[test]
    fn fitting_is_idempotent_and_parallel_is_exact() {
        let structure = NetworkStructure::builder()
            .variable("A", vec![0, 1, 2])
            .variable("B", vec![0, 1])
            .variable("C", vec![0, 1])
            .parents("C", vec!["A", "B"])
            .build()
            .unwrap();

        let mut rng = SmallRng::seed_from_u64(7);
        let dataset = Array2::from_shape_fn((1000, 3), |(_, col)| {
            if col == 0 {
                rng.gen_range(0..3)
            } else {
                rng.gen_range(0..2)
            }
        });

        let params = MaximumLikelihood::<f64>::params();
        let sequential = params.fit(&structure, &dataset).unwrap();
        assert_eq!(sequential, params.fit(&structure, &dataset).unwrap());

        for &chunk_size in &[1, 7, 128, 999, 4096] {
            let parallel = params
                .parallel(true)
                .chunk_size(chunk_size)
                .fit(&structure, &dataset)
                .unwrap();
            assert_eq!(parallel, sequential);
        }
    }

    #[test]
    fn lookup_of_unknown_variables() {
        let model = MaximumLikelihood::<f64>::params()
            .fit(&chain(), &array![["a", "0"]])
            .unwrap();

        assert!(matches!(
            model.cpt("Z"),
            Err(ParameterError::BaseCrate(bnlearn::Error::UnknownVariable(_)))
        ));
        let mut names = model.into_map().into_keys().collect::<Vec<_>>();
        names.sort();
        assert_eq!(names, vec!["X", "Y"]);
    }
}
