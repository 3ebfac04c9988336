//! Catalogue of structure discovery algorithms
//!
//! Discovery algorithms consume a dataset and produce a [`NetworkStructure`]. Parameter learners
//! never depend on which of them produced the structure they are given, so the only contract is
//! the [`LearnStructure`](crate::traits::LearnStructure) capability. The enums below name the
//! algorithm families, conditional independence tests and network scores an implementation of
//! that capability can declare.
use super::NetworkStructure;
use crate::dataset::{AsRecords, Label};
use crate::error::{Error, Result};
use crate::traits::LearnStructure;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Family of a structure discovery algorithm
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureFamily {
    ConstraintBased,
    ScoreBased,
    Hybrid,
    LocalDiscovery,
}

/// Constraint-based algorithms, driven by conditional independence tests
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintBased {
    GrowShrink,
    Iamb,
    FastIamb,
    InterIamb,
}

/// Score-based algorithms, searching the space of DAGs for the best scoring one
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBased {
    HillClimbing,
    Tabu,
}

/// Hybrid algorithms, restricting a score-based search with independence tests
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hybrid {
    MaxMinHillClimbing,
    Rsmax2,
}

/// Local discovery algorithms, learning the neighbourhood of every node
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalDiscovery {
    ChowLiu,
    Aracne,
    MaxMinParentsChildren,
    SemiInterleavedHitonPc,
}

/// A structure discovery algorithm, one variant per family
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureAlgorithm {
    ConstraintBased(ConstraintBased),
    ScoreBased(ScoreBased),
    Hybrid(Hybrid),
    LocalDiscovery(LocalDiscovery),
}

impl StructureAlgorithm {
    pub fn family(&self) -> StructureFamily {
        match self {
            StructureAlgorithm::ConstraintBased(_) => StructureFamily::ConstraintBased,
            StructureAlgorithm::ScoreBased(_) => StructureFamily::ScoreBased,
            StructureAlgorithm::Hybrid(_) => StructureFamily::Hybrid,
            StructureAlgorithm::LocalDiscovery(_) => StructureFamily::LocalDiscovery,
        }
    }

    /// Conventional name of the algorithm
    pub fn name(&self) -> &'static str {
        match self {
            StructureAlgorithm::ConstraintBased(x) => match x {
                ConstraintBased::GrowShrink => "Grow-Shrink",
                ConstraintBased::Iamb => "Incremental Association Markov Blanket",
                ConstraintBased::FastIamb => "Fast Incremental Association",
                ConstraintBased::InterIamb => "Interleaved Incremental Association",
            },
            StructureAlgorithm::ScoreBased(x) => match x {
                ScoreBased::HillClimbing => "Hill Climbing",
                ScoreBased::Tabu => "Tabu Search",
            },
            StructureAlgorithm::Hybrid(x) => match x {
                Hybrid::MaxMinHillClimbing => "Max-Min Hill Climbing",
                Hybrid::Rsmax2 => "General 2-Phase Restricted Maximization",
            },
            StructureAlgorithm::LocalDiscovery(x) => match x {
                LocalDiscovery::ChowLiu => "Chow-Liu",
                LocalDiscovery::Aracne => "ARACNE",
                LocalDiscovery::MaxMinParentsChildren => "Max-Min Parents & Children",
                LocalDiscovery::SemiInterleavedHitonPc => "Semi-Interleaved Hiton-PC",
            },
        }
    }

    /// Every catalogued algorithm, grouped by family
    pub fn all() -> Vec<StructureAlgorithm> {
        vec![
            StructureAlgorithm::ConstraintBased(ConstraintBased::GrowShrink),
            StructureAlgorithm::ConstraintBased(ConstraintBased::Iamb),
            StructureAlgorithm::ConstraintBased(ConstraintBased::FastIamb),
            StructureAlgorithm::ConstraintBased(ConstraintBased::InterIamb),
            StructureAlgorithm::ScoreBased(ScoreBased::HillClimbing),
            StructureAlgorithm::ScoreBased(ScoreBased::Tabu),
            StructureAlgorithm::Hybrid(Hybrid::MaxMinHillClimbing),
            StructureAlgorithm::Hybrid(Hybrid::Rsmax2),
            StructureAlgorithm::LocalDiscovery(LocalDiscovery::ChowLiu),
            StructureAlgorithm::LocalDiscovery(LocalDiscovery::Aracne),
            StructureAlgorithm::LocalDiscovery(LocalDiscovery::MaxMinParentsChildren),
            StructureAlgorithm::LocalDiscovery(LocalDiscovery::SemiInterleavedHitonPc),
        ]
    }
}

/// Conditional independence tests used by constraint-based algorithms
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CiTest {
    MutualInformation,
    ShrinkageMutualInformation,
    PearsonChiSquared,
}

/// Network scores used by score-based algorithms
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkScore {
    LogLikelihood,
    Aic,
    Bic,
    Bde,
    MixedBde,
    K2,
}

/// A structure given by hand
///
/// This is the trivial discovery procedure: it returns the structure it was created with, after
/// checking that the dataset has a column for every node.
#[derive(Debug, Clone, PartialEq)]
pub struct KnownStructure<L: Label> {
    structure: NetworkStructure<L>,
}

impl<L: Label> KnownStructure<L> {
    pub fn new(structure: NetworkStructure<L>) -> Self {
        KnownStructure { structure }
    }

    pub fn structure(&self) -> &NetworkStructure<L> {
        &self.structure
    }
}

impl<L: Label, R: AsRecords<Elem = L>> LearnStructure<R, Error> for KnownStructure<L> {
    fn learn_structure(&self, dataset: &R) -> Result<NetworkStructure<L>> {
        let ncols = dataset.as_records().ncols();

        if let Some(missing) = self.structure.nodes().nth(ncols) {
            return Err(Error::MissingColumn(missing.to_string()));
        }

        Ok(self.structure.clone())
    }
}
