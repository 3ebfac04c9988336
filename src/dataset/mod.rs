//! Datasets
//!
//! This module implements the categorical dataset struct and the helper traits which turn either
//! a raw two-dimensional array or a labelled table into the row-iteration contract consumed by
//! the learners.
use ndarray::{ArrayBase, ArrayView2, Ix2, OwnedRepr, ScalarOperand};

use num_traits::{FromPrimitive, NumAssignOps, NumCast};

use std::fmt;
use std::hash::Hash;
use std::iter::Sum;

mod impl_dataset;
mod impl_records;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. Learned probabilities are stored with this
/// element type.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Sum
    + NumAssignOps
    + ScalarOperand
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// Categorical values
///
/// Labels are comparable, hashable and printable. Every variable of a network draws its values
/// from an ordered domain of labels, and every cell of a dataset holds one of them.
pub trait Label: PartialEq + Eq + Hash + Clone + fmt::Debug + Send + Sync {}

impl Label for bool {}
impl Label for u8 {}
impl Label for u32 {}
impl Label for usize {}
impl Label for i32 {}
impl Label for i64 {}
impl Label for char {}
impl Label for String {}
impl Label for &str {}

/// DatasetBase
///
/// This is the fundamental structure of a dataset. It contains a number of observations, one per
/// row, with one categorical value per column, and may carry a name for every column. Columns are
/// matched to network variables either by position (column `i` holds node `i`) or, after
/// [`align_to`](DatasetBase::align_to), by name.
///
/// # Fields
///
/// * `records`: a two-dimensional matrix with dimensionality (nsamples, nfeatures)
/// * `feature_names`: optional descriptive column names with dimensionality (nfeatures)
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<R>
where
    R: Records,
{
    pub records: R,

    feature_names: Vec<String>,
}

/// Dataset
///
/// The most commonly used type of dataset. It owns its observations as an `Array2` of labels.
pub type Dataset<L> = DatasetBase<ArrayBase<OwnedRepr<L>, Ix2>>;

/// DatasetView
///
/// A read only view of a Dataset
pub type DatasetView<'a, L> = DatasetBase<ArrayView2<'a, L>>;

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}

/// Row-major access to categorical observations
///
/// This is the single capability a learner needs from its input: a matrix whose rows are
/// observations and whose column `i` holds the value of node `i` of the structure.
pub trait AsRecords {
    type Elem: Label;

    fn as_records(&self) -> ArrayView2<'_, Self::Elem>;
}
