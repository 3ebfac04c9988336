//! Provide traits for different classes of algorithms
//!

use crate::dataset::AsRecords;
use crate::structure::NetworkStructure;
use std::convert::From;

/// Fittable algorithms
///
/// A fittable algorithm takes a network structure and a dataset and estimates the parameters of
/// the network. The structure is only read; the estimated parameters are returned as a new model
/// object.
///
/// This trait is implemented for hyper-parameter sets, for example `MaximumLikelihoodParams`.
pub trait Fit<R: AsRecords, E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, structure: &NetworkStructure<R::Elem>, dataset: &R) -> Result<Self::Object, E>;
}

/// Structure discovery algorithms
///
/// A structure learner consumes a dataset and produces the network structure, which may then be
/// handed to a [`Fit`] implementation. Parameter learners never depend on which learner (if any)
/// produced the structure they are given.
pub trait LearnStructure<R: AsRecords, E: std::error::Error + From<crate::error::Error>> {
    fn learn_structure(&self, dataset: &R) -> Result<NetworkStructure<R::Elem>, E>;
}
