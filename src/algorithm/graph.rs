// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Explicit algorithm dependency graph and its integrity checks.
//!
//! Within one registry a cycle cannot be built because producers must be
//! registered before anything depends on them. Once registrations from several
//! processors are merged that guarantee is gone, so the merged graph is checked
//! here:
//!
//! 1. **Uniqueness**: no two registrations claim the same `name_version`
//! 2. **Reference validation**: every dependency names a known algorithm
//! 3. **Cycle detection**: DFS with a recursion stack, reporting the cycle path
//!
//! Cycle detection only runs when references resolve, since it needs a
//! structurally valid graph.

use std::collections::{HashMap, HashSet};

use crate::algorithm::AlgorithmRef;
use crate::errors::GraphError;
use crate::observability::messages::registry::CyclicDependencyDetected;
use crate::observability::messages::StructuredLog;
use crate::proto::orca_v1::ProcessorRegistration;

/// Adjacency list keyed by `full_name`: algorithm -> the algorithms it consumes.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph(pub HashMap<String, Vec<String>>);

impl DependencyGraph {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Ensure a node exists, even with no dependencies.
    pub fn add_algorithm(&mut self, full_name: String) {
        self.0.entry(full_name).or_default();
    }

    pub fn add_dependency(&mut self, consumer: String, producer: String) {
        self.0.entry(consumer).or_default().push(producer);
    }

    pub fn dependencies_of(&self, full_name: &str) -> Option<&Vec<String>> {
        self.0.get(full_name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge the registration payloads of several processors into one graph.
    ///
    /// Fails when two payloads register the same `name_version`.
    pub fn from_registrations(
        registrations: &[ProcessorRegistration],
    ) -> Result<Self, Vec<GraphError>> {
        let mut graph = Self::new();
        let mut owners: HashMap<String, Vec<String>> = HashMap::new();

        for registration in registrations {
            for algorithm in &registration.supported_algorithms {
                let full_name = AlgorithmRef::from(algorithm).full_name();
                owners
                    .entry(full_name.clone())
                    .or_default()
                    .push(registration.name.clone());

                graph.add_algorithm(full_name.clone());
                for dependency in &algorithm.dependencies {
                    let producer =
                        AlgorithmRef::new(dependency.name.clone(), dependency.version.clone());
                    graph.add_dependency(full_name.clone(), producer.full_name());
                }
            }
        }

        let mut errors: Vec<GraphError> = owners
            .into_iter()
            .filter(|(_, processors)| processors.len() > 1)
            .map(|(full_name, processors)| GraphError::DuplicateAlgorithm {
                full_name,
                processors,
            })
            .collect();

        if errors.is_empty() {
            Ok(graph)
        } else {
            errors.sort_by_key(|e| e.to_string());
            Err(errors)
        }
    }

    /// Check references and acyclicity, accumulating reference errors.
    pub fn validate_acyclic(&self) -> Result<(), Vec<GraphError>> {
        let mut errors = self.unresolved_dependencies();

        if errors.is_empty() {
            if let Some(cycle) = self.find_cycle() {
                let names: Vec<&str> = cycle.iter().map(String::as_str).collect();
                CyclicDependencyDetected { cycle: &names }.log();
                errors.push(GraphError::CyclicDependency { cycle });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn unresolved_dependencies(&self) -> Vec<GraphError> {
        let mut errors = Vec::new();
        let mut consumers: Vec<&String> = self.0.keys().collect();
        consumers.sort();

        for consumer in consumers {
            for dependency in &self.0[consumer] {
                if !self.0.contains_key(dependency) {
                    errors.push(GraphError::UnresolvedDependency {
                        algorithm: consumer.clone(),
                        missing_dependency: dependency.clone(),
                    });
                }
            }
        }
        errors
    }

    /// First cycle found, as a path whose first and last entries match.
    ///
    /// Nodes are visited in sorted order so the reported cycle is stable.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        let mut nodes: Vec<&String> = self.0.keys().collect();
        nodes.sort();

        for node in nodes {
            if !visited.contains(node.as_str()) {
                if let Some(cycle) =
                    self.dfs_cycle_detection(node, &mut visited, &mut rec_stack, &mut path)
                {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn dfs_cycle_detection(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        rec_stack: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        visited.insert(node.to_string());
        rec_stack.insert(node.to_string());
        path.push(node.to_string());

        if let Some(neighbors) = self.0.get(node) {
            for neighbor in neighbors {
                if !visited.contains(neighbor) {
                    if let Some(cycle) = self.dfs_cycle_detection(neighbor, visited, rec_stack, path)
                    {
                        return Some(cycle);
                    }
                } else if rec_stack.contains(neighbor) {
                    // Back edge: the cycle runs from the neighbor's position to here
                    let cycle_start = path.iter().position(|x| x == neighbor)?;
                    let mut cycle = path[cycle_start..].to_vec();
                    cycle.push(neighbor.clone());
                    return Some(cycle);
                }
            }
        }

        rec_stack.remove(node);
        path.pop();
        None
    }
}

impl From<HashMap<String, Vec<String>>> for DependencyGraph {
    fn from(graph: HashMap<String, Vec<String>>) -> Self {
        Self(graph)
    }
}

impl From<DependencyGraph> for HashMap<String, Vec<String>> {
    fn from(graph: DependencyGraph) -> Self {
        graph.0
    }
}

/// Merge registrations from several processors and validate the result.
pub fn validate_registrations(
    registrations: &[ProcessorRegistration],
) -> Result<DependencyGraph, Vec<GraphError>> {
    let graph = DependencyGraph::from_registrations(registrations)?;
    graph.validate_acyclic()?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::orca_v1::{Algorithm, AlgorithmDependency, WindowType};

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (node, deps) in edges {
            graph.add_algorithm(node.to_string());
            for dep in *deps {
                graph.add_dependency(node.to_string(), dep.to_string());
            }
        }
        graph
    }

    fn algorithm(name: &str, deps: &[(&str, &str)]) -> Algorithm {
        Algorithm {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            window_type: Some(WindowType {
                name: "WindowA".to_string(),
                version: "1.0.0".to_string(),
            }),
            dependencies: deps
                .iter()
                .map(|(dep, processor)| AlgorithmDependency {
                    name: dep.to_string(),
                    version: "1.0.0".to_string(),
                    processor_name: processor.to_string(),
                    processor_runtime: "rustc".to_string(),
                })
                .collect(),
        }
    }

    fn registration(name: &str, algorithms: Vec<Algorithm>) -> ProcessorRegistration {
        ProcessorRegistration {
            name: name.to_string(),
            runtime: "rustc".to_string(),
            connection_str: "localhost:5377".to_string(),
            supported_algorithms: algorithms,
        }
    }

    #[test]
    fn test_valid_shapes() {
        let empty = DependencyGraph::new();
        assert!(empty.validate_acyclic().is_ok());

        let chain = graph(&[("a", &[]), ("b", &["a"]), ("c", &["b"])]);
        assert!(chain.validate_acyclic().is_ok());

        let diamond = graph(&[("a", &[]), ("b", &["a"]), ("c", &["a"]), ("d", &["b", "c"])]);
        assert!(diamond.validate_acyclic().is_ok());
    }

    #[test]
    fn test_self_dependency_cycle() {
        let g = graph(&[("a", &["a"])]);
        assert_eq!(g.find_cycle(), Some(vec!["a".to_string(), "a".to_string()]));
    }

    #[test]
    fn test_complex_cycle_path() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"]), ("d", &["b"])]);
        let cycle = g.find_cycle().unwrap();

        assert_eq!(cycle, vec!["b", "c", "d", "b"]);
        match g.validate_acyclic().unwrap_err().as_slice() {
            [GraphError::CyclicDependency { cycle }] => assert_eq!(cycle.len(), 4),
            other => panic!("expected a single cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_dependencies_skip_cycle_check() {
        let g = graph(&[("a", &["missing", "b"]), ("b", &["a"])]);
        let errors = g.validate_acyclic().unwrap_err();

        assert_eq!(
            errors,
            vec![GraphError::UnresolvedDependency {
                algorithm: "a".to_string(),
                missing_dependency: "missing".to_string(),
            }]
        );
    }

    #[test]
    fn test_cross_process_cycle_is_detected() {
        // Each processor is acyclic on its own; together they loop
        let registrations = vec![
            registration("proc_a", vec![algorithm("Alpha", &[("Beta", "proc_b")])]),
            registration("proc_b", vec![algorithm("Beta", &[("Alpha", "proc_a")])]),
        ];

        let errors = validate_registrations(&registrations).unwrap_err();
        assert!(matches!(errors.as_slice(), [GraphError::CyclicDependency { .. }]));
        assert!(errors[0].to_string().starts_with("Cyclic dependency detected"));
    }

    #[test]
    fn test_cross_process_duplicate_registration() {
        let registrations = vec![
            registration("proc_a", vec![algorithm("Alpha", &[])]),
            registration("proc_b", vec![algorithm("Alpha", &[])]),
        ];

        let errors = DependencyGraph::from_registrations(&registrations).unwrap_err();
        assert_eq!(
            errors,
            vec![GraphError::DuplicateAlgorithm {
                full_name: "Alpha_1.0.0".to_string(),
                processors: vec!["proc_a".to_string(), "proc_b".to_string()],
            }]
        );
    }

    #[test]
    fn test_cross_process_valid_merge() {
        let registrations = vec![
            registration("proc_a", vec![algorithm("Loader", &[])]),
            registration(
                "proc_b",
                vec![
                    algorithm("Features", &[("Loader", "proc_a")]),
                    algorithm("Model", &[("Features", "proc_b"), ("Loader", "proc_a")]),
                ],
            ),
        ];

        let merged = validate_registrations(&registrations).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged.dependencies_of("Model_1.0.0").unwrap(),
            &vec!["Features_1.0.0".to_string(), "Loader_1.0.0".to_string()]
        );
    }
}
