//! Network structures
//!
//! A [`NetworkStructure`] is the immutable description of a discrete Bayesian network: an ordered
//! list of categorical variables, each with an ordered domain of labels and an ordered list of
//! parents. The order of the variables is the order in which they were declared and fixes the
//! column of every variable in a dataset row. The order of the parents of a variable fixes the
//! layout of its conditional probability table.
//!
//! Structures are usually assembled with a [`NetworkStructureBuilder`], which rejects unknown
//! parents, duplicated labels and cyclic parent relations.
use std::collections::HashMap;

use crate::dataset::Label;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

mod builder;
mod catalogue;

pub use builder::NetworkStructureBuilder;
pub use catalogue::{
    CiTest, ConstraintBased, Hybrid, KnownStructure, LocalDiscovery, NetworkScore, ScoreBased,
    StructureAlgorithm, StructureFamily,
};

/// A categorical random variable of a network
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Variable<L: Label> {
    name: String,
    domain: Vec<L>,
    categories: HashMap<L, usize>,
    parents: Vec<usize>,
    children: Vec<usize>,
}

impl<L: Label> Variable<L> {
    /// Name of the variable
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered domain, the position of a label is its value index
    pub fn domain(&self) -> &[L] {
        &self.domain
    }

    /// Number of values the variable can take
    pub fn cardinality(&self) -> usize {
        self.domain.len()
    }

    /// Node indices of the parents, in the order used for table layout
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    /// Node indices of the children, in declaration order
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Position of `value` in the domain
    pub fn value_index(&self, value: &L) -> Option<usize> {
        self.categories.get(value).copied()
    }
}

/// Immutable structure of a discrete Bayesian network
///
/// The parent relation of a built structure is guaranteed to be acyclic.
///
/// ```
/// use bnlearn::structure::NetworkStructure;
///
/// let structure = NetworkStructure::builder()
///     .variable("cloudy", vec!["no", "yes"])
///     .variable("rain", vec!["no", "yes"])
///     .variable("wet grass", vec!["no", "yes"])
///     .edge("cloudy", "rain")
///     .edge("rain", "wet grass")
///     .build()?;
///
/// assert_eq!(structure.parents("rain")?, vec!["cloudy"]);
/// assert_eq!(structure.node_index("wet grass")?, 2);
/// # Ok::<(), bnlearn::Error>(())
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStructure<L: Label> {
    variables: Vec<Variable<L>>,
    index: HashMap<String, usize>,
    topological_order: Vec<usize>,
}

impl<L: Label> NetworkStructure<L> {
    /// Start assembling a new structure
    pub fn builder() -> NetworkStructureBuilder<L> {
        NetworkStructureBuilder::new()
    }

    /// Create a structure from named domains and `(parent, child)` edges
    ///
    /// Parents are ordered by the position of their edge in `edges`.
    pub fn from_edges<I: Into<String>>(
        variables: Vec<(I, Vec<L>)>,
        edges: &[(&str, &str)],
    ) -> Result<Self> {
        let builder = variables
            .into_iter()
            .fold(Self::builder(), |builder, (name, domain)| {
                builder.variable(name, domain)
            });

        edges
            .iter()
            .fold(builder, |builder, (from, to)| builder.edge(*from, *to))
            .build()
    }

    pub(crate) fn from_parts(variables: Vec<Variable<L>>, topological_order: Vec<usize>) -> Self {
        let index = variables
            .iter()
            .enumerate()
            .map(|(idx, variable)| (variable.name.clone(), idx))
            .collect();

        NetworkStructure {
            variables,
            index,
            topological_order,
        }
    }

    /// Names of all variables in node order
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables.iter().map(|x| x.name())
    }

    /// Number of variables
    pub fn nnodes(&self) -> usize {
        self.variables.len()
    }

    /// All variables in node order
    pub fn variables(&self) -> &[Variable<L>] {
        &self.variables
    }

    /// Column index of a variable in a dataset row
    pub fn node_index(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownVariable(name.to_string()))
    }

    pub fn variable(&self, name: &str) -> Result<&Variable<L>> {
        self.node_index(name).map(|idx| &self.variables[idx])
    }

    pub fn domain(&self, name: &str) -> Result<&[L]> {
        self.variable(name).map(|x| x.domain())
    }

    pub fn cardinality(&self, name: &str) -> Result<usize> {
        self.variable(name).map(|x| x.cardinality())
    }

    /// Names of the parents of a variable, in table layout order
    pub fn parents(&self, name: &str) -> Result<Vec<&str>> {
        self.variable(name).map(|x| self.names(x.parents()))
    }

    pub fn children(&self, name: &str) -> Result<Vec<&str>> {
        self.variable(name).map(|x| self.names(x.children()))
    }

    /// Value index of `value` in the domain of a variable, `None` if it is not part of the domain
    pub fn value_index(&self, name: &str, value: &L) -> Result<Option<usize>> {
        self.variable(name).map(|x| x.value_index(value))
    }

    /// Domain sizes of the parents of a node, in table layout order
    pub fn parent_cardinalities(&self, node: usize) -> Vec<usize> {
        self.variables[node]
            .parents()
            .iter()
            .map(|&parent| self.variables[parent].cardinality())
            .collect()
    }

    /// Variables ordered such that every parent precedes its children
    pub fn topological_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.topological_order
            .iter()
            .map(move |&idx| self.variables[idx].name())
    }

    /// All `(parent, child)` pairs, grouped by child in node order
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.variables
            .iter()
            .flat_map(|child| {
                child
                    .parents()
                    .iter()
                    .map(move |&parent| (self.variables[parent].name(), child.name()))
            })
            .collect()
    }

    fn names(&self, nodes: &[usize]) -> Vec<&str> {
        nodes.iter().map(|&idx| self.variables[idx].name()).collect()
    }
}

impl<L: Label> Variable<L> {
    pub(crate) fn new(name: String, domain: Vec<L>, categories: HashMap<L, usize>) -> Self {
        Variable {
            name,
            domain,
            categories,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn connect(&mut self, parents: Vec<usize>) {
        self.parents = parents;
    }

    pub(crate) fn add_child(&mut self, child: usize) {
        self.children.push(child);
    }
}
