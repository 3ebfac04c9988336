use super::{Dataset, DatasetBase, DatasetView, Label, Records};
use crate::error::{Error, Result};
use crate::structure::NetworkStructure;
use ndarray::{Array2, ArrayBase, ArrayView1, Axis, Data, Ix2};
use std::collections::HashSet;
use tracing::trace;

impl<R: Records> DatasetBase<R> {
    /// Create a new dataset from records
    ///
    /// ```
    /// use bnlearn::Dataset;
    /// use ndarray::array;
    ///
    /// let ds = Dataset::new(array![["rain", "wet"], ["sun", "dry"]]);
    /// ```
    pub fn new(records: R) -> DatasetBase<R> {
        DatasetBase {
            records,
            feature_names: Vec::new(),
        }
    }

    /// Returns reference to records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Updates the records of a dataset
    ///
    /// Feature names are reset when the number of columns changes.
    pub fn with_records<T: Records>(self, records: T) -> DatasetBase<T> {
        let feature_names = if records.nfeatures() == self.records.nfeatures() {
            self.feature_names
        } else {
            Vec::new()
        };

        DatasetBase {
            records,
            feature_names,
        }
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R> {
        let feature_names = names.into_iter().map(|x| x.into()).collect();

        self.feature_names = feature_names;

        self
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single column.
    /// This can be useful for matching columns to network variables by name. If no feature
    /// names were given, `feature-{index}` is returned for every column.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Return the number of observations in this dataset
    pub fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    /// Return the number of columns in this dataset
    pub fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }
}

impl<L: Label, S: Data<Elem = L>> DatasetBase<ArrayBase<S, Ix2>> {
    /// Creates a view of a dataset
    pub fn view(&self) -> DatasetView<'_, L> {
        DatasetBase::new(self.records.view()).with_feature_names(self.feature_names.clone())
    }

    /// Returns the column with the given feature name
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, L>> {
        self.feature_names()
            .iter()
            .position(|x| x == name)
            .map(|idx| self.records.column(idx))
    }

    /// Returns the distinct values of every column in sorted order
    ///
    /// This is the domain a variable would have if it were inferred from the data alone.
    pub fn categories(&self) -> Vec<Vec<L>>
    where
        L: Ord,
    {
        self.records
            .axis_iter(Axis(1))
            .map(|column| {
                let mut categories = column
                    .iter()
                    .collect::<HashSet<_>>()
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>();
                categories.sort();
                categories
            })
            .collect()
    }

    /// Reorders the columns of this dataset so that column `i` holds node `i` of the structure
    ///
    /// Columns are matched by feature name. Columns which do not belong to any node are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MissingColumn`](Error::MissingColumn) if a node has no column of the same name.
    pub fn align_to(&self, structure: &NetworkStructure<L>) -> Result<Dataset<L>> {
        let names = self.feature_names();
        let columns = structure
            .nodes()
            .map(|node| {
                names
                    .iter()
                    .position(|x| x == node)
                    .ok_or_else(|| Error::MissingColumn(node.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        trace!(?columns, "aligning dataset columns to network nodes");
        let records = self.records.select(Axis(1), &columns);

        Ok(DatasetBase::new(records).with_feature_names(structure.nodes().collect::<Vec<_>>()))
    }
}

impl<L: Label> Dataset<L> {
    /// Create a dataset from named columns of equal length
    ///
    /// This is the adapter for labelled tabular data: every entry is a column name together with
    /// the values of that column, in observation order.
    ///
    /// ```
    /// use bnlearn::Dataset;
    ///
    /// let ds = Dataset::from_columns(vec![
    ///     ("cloudy", vec!["yes", "no", "no"]),
    ///     ("rain", vec!["yes", "no", "yes"]),
    /// ])?;
    /// assert_eq!(ds.nsamples(), 3);
    /// # Ok::<(), bnlearn::Error>(())
    /// ```
    pub fn from_columns<I: Into<String>>(columns: Vec<(I, Vec<L>)>) -> Result<Dataset<L>> {
        let (names, columns): (Vec<String>, Vec<Vec<L>>) = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .unzip();

        let nsamples = match columns.first() {
            Some(column) => column.len(),
            None => {
                return Err(Error::Parameters(
                    "a dataset needs at least one column".to_string(),
                ))
            }
        };

        if let Some(idx) = columns.iter().position(|x| x.len() != nsamples) {
            return Err(Error::Parameters(format!(
                "column {} has {} values, expected {}",
                names[idx],
                columns[idx].len(),
                nsamples
            )));
        }

        let records = Array2::from_shape_fn((nsamples, columns.len()), |(row, col)| {
            columns[col][row].clone()
        });

        Ok(DatasetBase::new(records).with_feature_names(names))
    }
}

impl<L: Label> From<Array2<L>> for Dataset<L> {
    fn from(records: Array2<L>) -> Self {
        DatasetBase::new(records)
    }
}

/// Implement the row view for a dataset so it can be passed wherever records are expected
impl<'a, L: Label> From<&'a Dataset<L>> for DatasetView<'a, L> {
    fn from(dataset: &'a Dataset<L>) -> Self {
        dataset.view()
    }
}
