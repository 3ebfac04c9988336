use super::{AsRecords, DatasetBase, Label, Records};
use ndarray::{ArrayBase, ArrayView2, Axis, Data, Ix2};

/// Implement records for NdArrays
impl<L, S: Data<Elem = L>> Records for ArrayBase<S, Ix2> {
    type Elem = L;

    fn nsamples(&self) -> usize {
        self.len_of(Axis(0))
    }

    fn nfeatures(&self) -> usize {
        self.len_of(Axis(1))
    }
}

/// Implement records for a DatasetBase
impl<R: Records> Records for DatasetBase<R> {
    type Elem = R::Elem;

    fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }
}

/// Implement records for references
impl<R: Records> Records for &R {
    type Elem = R::Elem;

    fn nsamples(&self) -> usize {
        (*self).nsamples()
    }

    fn nfeatures(&self) -> usize {
        (*self).nfeatures()
    }
}

impl<L: Label, S: Data<Elem = L>> AsRecords for ArrayBase<S, Ix2> {
    type Elem = L;

    fn as_records(&self) -> ArrayView2<'_, L> {
        self.view()
    }
}

impl<R: Records + AsRecords> AsRecords for DatasetBase<R> {
    type Elem = <R as AsRecords>::Elem;

    fn as_records(&self) -> ArrayView2<'_, Self::Elem> {
        self.records.as_records()
    }
}

impl<R: AsRecords> AsRecords for &R {
    type Elem = R::Elem;

    fn as_records(&self) -> ArrayView2<'_, Self::Elem> {
        (*self).as_records()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{AsRecords, Dataset, Records};
    use ndarray::array;

    #[test]
    fn raw_arrays_and_datasets_expose_the_same_rows() {
        let records = array![["a", "x"], ["b", "y"], ["a", "y"]];
        let dataset = Dataset::new(records.clone()).with_feature_names(vec!["A", "B"]);

        assert_eq!(records.nsamples(), 3);
        assert_eq!(dataset.nfeatures(), 2);
        assert_eq!(dataset.as_records(), records.as_records());
        assert_eq!((&dataset).as_records().row(1), array!["b", "y"]);
    }
}
