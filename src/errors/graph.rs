// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors found while checking an assembled algorithm dependency graph.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A circular dependency was detected between algorithms
    CyclicDependency {
        /// The cycle path, first and last entries are the same algorithm
        cycle: Vec<String>,
    },
    /// An algorithm depends on an algorithm that no registration provides
    UnresolvedDependency {
        algorithm: String,
        missing_dependency: String,
    },
    /// Two registrations both claim the same `name_version` key
    DuplicateAlgorithm {
        full_name: String,
        processors: Vec<String>,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::CyclicDependency { cycle } => {
                write!(f, "Cyclic dependency detected: {}", cycle.join(" -> "))
            }
            GraphError::UnresolvedDependency {
                algorithm,
                missing_dependency,
            } => {
                write!(
                    f,
                    "Algorithm '{}' depends on '{}' which does not exist",
                    algorithm, missing_dependency
                )
            }
            GraphError::DuplicateAlgorithm {
                full_name,
                processors,
            } => {
                write!(
                    f,
                    "Algorithm '{}' is registered by more than one processor: {}",
                    full_name,
                    processors.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for GraphError {}
