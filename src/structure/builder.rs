use std::collections::{HashMap, HashSet, VecDeque};

use super::{NetworkStructure, Variable};
use crate::dataset::{DatasetBase, Label};
use crate::error::{Error, Result};
use ndarray::{ArrayBase, Data, Ix2};
use tracing::debug;

/// Builder of a [`NetworkStructure`]
///
/// Variables keep the order in which they are declared. Parents may be declared before or after
/// the variables they refer to; every check happens in [`build`](Self::build).
///
/// # Errors
///
/// `build` fails with
/// * [`Parameters`](Error::Parameters) if no variable was declared
/// * [`DuplicateVariable`](Error::DuplicateVariable) if a name is declared twice
/// * [`EmptyDomain`](Error::EmptyDomain) or [`DuplicateCategory`](Error::DuplicateCategory) for
///   malformed domains
/// * [`UnknownVariable`](Error::UnknownVariable) if an edge refers to an undeclared variable
/// * [`SelfLoop`](Error::SelfLoop), [`DuplicateParent`](Error::DuplicateParent) or
///   [`Cycle`](Error::Cycle) if the parent relation is not a DAG
#[derive(Debug, Clone)]
pub struct NetworkStructureBuilder<L: Label> {
    variables: Vec<(String, Vec<L>)>,
    parents: Vec<(String, Vec<String>)>,
}

impl<L: Label> Default for NetworkStructureBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> NetworkStructureBuilder<L> {
    pub fn new() -> Self {
        NetworkStructureBuilder {
            variables: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Declare a variable with its ordered domain
    pub fn variable<I: Into<String>>(mut self, name: I, domain: Vec<L>) -> Self {
        self.variables.push((name.into(), domain));
        self
    }

    /// Declare one variable per named column of a dataset, using the sorted distinct values of
    /// the column as domain
    pub fn domains_from<S: Data<Elem = L>>(self, dataset: &DatasetBase<ArrayBase<S, Ix2>>) -> Self
    where
        L: Ord,
    {
        dataset
            .feature_names()
            .into_iter()
            .zip(dataset.categories())
            .fold(self, |builder, (name, domain)| builder.variable(name, domain))
    }

    /// Set the ordered parents of a variable, replacing earlier declarations
    pub fn parents<I, P, J>(mut self, name: I, parents: J) -> Self
    where
        I: Into<String>,
        P: Into<String>,
        J: IntoIterator<Item = P>,
    {
        let name = name.into();
        let parents = parents.into_iter().map(|x| x.into()).collect();

        match self.parents.iter_mut().find(|(child, _)| *child == name) {
            Some(entry) => entry.1 = parents,
            None => self.parents.push((name, parents)),
        }

        self
    }

    /// Append `from` to the parents of `to`
    pub fn edge<I: Into<String>, J: Into<String>>(mut self, from: I, to: J) -> Self {
        let (from, to) = (from.into(), to.into());

        match self.parents.iter_mut().find(|(child, _)| *child == to) {
            Some(entry) => entry.1.push(from),
            None => self.parents.push((to, vec![from])),
        }

        self
    }

    /// Validate the declarations and create the structure
    pub fn build(self) -> Result<NetworkStructure<L>> {
        if self.variables.is_empty() {
            return Err(Error::Parameters(
                "a network needs at least one variable".to_string(),
            ));
        }

        let mut index = HashMap::new();
        let mut variables = Vec::with_capacity(self.variables.len());
        for (name, domain) in self.variables {
            if index.insert(name.clone(), variables.len()).is_some() {
                return Err(Error::DuplicateVariable(name));
            }
            if domain.is_empty() {
                return Err(Error::EmptyDomain(name));
            }

            let mut categories = HashMap::with_capacity(domain.len());
            for (idx, value) in domain.iter().enumerate() {
                if categories.insert(value.clone(), idx).is_some() {
                    return Err(Error::DuplicateCategory {
                        variable: name,
                        value: format!("{:?}", value),
                    });
                }
            }

            variables.push(Variable::new(name, domain, categories));
        }

        let lookup = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| Error::UnknownVariable(name.to_string()))
        };

        for (child, parents) in &self.parents {
            let node = lookup(child.as_str())?;

            let mut seen = HashSet::new();
            let mut resolved = Vec::with_capacity(parents.len());
            for parent in parents {
                let parent_node = lookup(parent.as_str())?;
                if parent_node == node {
                    return Err(Error::SelfLoop(child.clone()));
                }
                if !seen.insert(parent_node) {
                    return Err(Error::DuplicateParent {
                        variable: child.clone(),
                        parent: parent.clone(),
                    });
                }
                resolved.push(parent_node);
            }

            variables[node].connect(resolved);
        }

        for node in 0..variables.len() {
            for parent in variables[node].parents().to_vec() {
                variables[parent].add_child(node);
            }
        }

        let order = topological_sort(&variables)?;
        debug!(
            nodes = variables.len(),
            edges = variables.iter().map(|x| x.parents().len()).sum::<usize>(),
            "built network structure"
        );

        Ok(NetworkStructure::from_parts(variables, order))
    }
}

/// Kahn's algorithm, ties resolved in node order
fn topological_sort<L: Label>(variables: &[Variable<L>]) -> Result<Vec<usize>> {
    let mut in_degree = variables
        .iter()
        .map(|x| x.parents().len())
        .collect::<Vec<_>>();

    let mut queue = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(idx, _)| idx)
        .collect::<VecDeque<_>>();

    let mut order = Vec::with_capacity(variables.len());
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &child in variables[node].children() {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    if order.len() < variables.len() {
        let start = in_degree.iter().position(|&degree| degree > 0).unwrap_or(0);
        let node = on_cycle(variables, &in_degree, start);
        return Err(Error::Cycle(variables[node].name().to_string()));
    }

    Ok(order)
}

/// Follow unsorted parents from `node` until a variable repeats
///
/// Every variable left over by the sort still has an unsorted parent, so the walk ends on a
/// variable which is part of a cycle.
fn on_cycle<L: Label>(variables: &[Variable<L>], in_degree: &[usize], mut node: usize) -> usize {
    let mut visited = vec![false; variables.len()];
    while !visited[node] {
        visited[node] = true;
        match variables[node]
            .parents()
            .iter()
            .find(|&&parent| in_degree[parent] > 0)
        {
            Some(&parent) => node = parent,
            None => break,
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use super::super::NetworkStructure;
    use crate::{Dataset, Error};
    use ndarray::array;

    #[test]
    fn parents_and_edges_are_ordered() {
        let structure = NetworkStructure::builder()
            .variable("A", vec![0, 1])
            .variable("B", vec![0, 1, 2])
            .variable("C", vec![0, 1])
            .parents("C", vec!["B"])
            .edge("A", "C")
            .build()
            .unwrap();

        assert_eq!(structure.parents("C").unwrap(), vec!["B", "A"]);
        assert_eq!(structure.parent_cardinalities(2), vec![3, 2]);
    }

    #[test]
    fn parents_replace_earlier_declarations() {
        let structure = NetworkStructure::builder()
            .variable("A", vec![0, 1])
            .variable("B", vec![0, 1])
            .variable("C", vec![0, 1])
            .edge("A", "C")
            .parents("C", vec!["B"])
            .build()
            .unwrap();

        assert_eq!(structure.parents("C").unwrap(), vec!["B"]);
        assert!(structure.children("A").unwrap().is_empty());
    }

    #[test]
    fn rejects_cycles() {
        let err = NetworkStructure::builder()
            .variable("A", vec![0, 1])
            .variable("B", vec![0, 1])
            .variable("C", vec![0, 1])
            .edge("A", "B")
            .edge("B", "C")
            .edge("C", "A")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Cycle(_)));
    }

    #[test]
    fn cycle_error_names_a_variable_on_the_cycle() {
        // D depends on the cycle A -> B -> C -> A without being part of it
        let err = NetworkStructure::builder()
            .variable("D", vec![0, 1])
            .variable("A", vec![0, 1])
            .variable("B", vec![0, 1])
            .variable("C", vec![0, 1])
            .edge("C", "D")
            .edge("A", "B")
            .edge("B", "C")
            .edge("C", "A")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Cycle(name) if name == "C"));
    }

    #[test]
    fn rejects_malformed_declarations() {
        let empty = NetworkStructure::<usize>::builder().build();
        assert!(matches!(empty, Err(Error::Parameters(_))));

        let duplicate = NetworkStructure::builder()
            .variable("A", vec![0, 1])
            .variable("A", vec![0, 1])
            .build();
        assert!(matches!(duplicate, Err(Error::DuplicateVariable(name)) if name == "A"));

        let no_domain = NetworkStructure::<usize>::builder()
            .variable("A", vec![])
            .build();
        assert!(matches!(no_domain, Err(Error::EmptyDomain(_))));

        let repeated = NetworkStructure::builder()
            .variable("A", vec!["x", "y", "x"])
            .build();
        assert!(matches!(
            repeated,
            Err(Error::DuplicateCategory { variable, value }) if variable == "A" && value == "\"x\""
        ));

        let unknown = NetworkStructure::builder()
            .variable("A", vec![0, 1])
            .edge("Z", "A")
            .build();
        assert!(matches!(unknown, Err(Error::UnknownVariable(name)) if name == "Z"));

        let self_loop = NetworkStructure::builder()
            .variable("A", vec![0, 1])
            .edge("A", "A")
            .build();
        assert!(matches!(self_loop, Err(Error::SelfLoop(_))));

        let twice = NetworkStructure::builder()
            .variable("A", vec![0, 1])
            .variable("B", vec![0, 1])
            .parents("B", vec!["A", "A"])
            .build();
        assert!(matches!(twice, Err(Error::DuplicateParent { .. })));
    }

    #[test]
    fn domains_from_dataset() {
        let ds = Dataset::new(array![["b", "x"], ["a", "y"], ["b", "y"]])
            .with_feature_names(vec!["first", "second"]);

        let structure = NetworkStructure::builder()
            .domains_from(&ds)
            .edge("first", "second")
            .build()
            .unwrap();

        assert_eq!(structure.domain("first").unwrap(), &["a", "b"]);
        assert_eq!(structure.domain("second").unwrap(), &["x", "y"]);
        assert_eq!(structure.parents("second").unwrap(), vec!["first"]);
    }
}
