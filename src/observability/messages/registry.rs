// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for algorithm registration.
//!
//! This module contains message types for logging events related to:
//! * Algorithms accepted or rejected by the registry
//! * Dependency declarations between registered algorithms
//! * Dependency graph integrity failures

use crate::errors::RegistrationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Algorithm accepted into the registry.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use orca_processor::observability::messages::registry::AlgorithmRegistered;
///
/// let msg = AlgorithmRegistered {
///     full_name: "DataLoader_1.0.0",
///     full_window_name: "WindowA_1.0.0",
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Registered algorithm 'DataLoader_1.0.0' triggered by window 'WindowA_1.0.0'"
/// );
/// ```
pub struct AlgorithmRegistered<'a> {
    pub full_name: &'a str,
    pub full_window_name: &'a str,
}

impl Display for AlgorithmRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered algorithm '{}' triggered by window '{}'",
            self.full_name, self.full_window_name
        )
    }
}

impl StructuredLog for AlgorithmRegistered<'_> {
    fn log(&self) {
        tracing::info!(
            algorithm = self.full_name,
            window = self.full_window_name,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "algorithm_registered",
            span_name = name,
            algorithm = self.full_name,
            window = self.full_window_name,
        )
    }
}

/// Algorithm refused by the registry.
///
/// # Log Level
/// `error!` - Registration is a startup concern; the caller decides whether to abort
pub struct AlgorithmRejected<'a> {
    pub full_name: &'a str,
    pub error: &'a RegistrationError,
}

impl Display for AlgorithmRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rejected algorithm '{}': {}",
            self.full_name, self.error
        )
    }
}

impl StructuredLog for AlgorithmRejected<'_> {
    fn log(&self) {
        tracing::error!(
            algorithm = self.full_name,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "algorithm_rejected",
            span_name = name,
            algorithm = self.full_name,
        )
    }
}

/// Consumer declared a dependency on a producer.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct DependencyDeclared<'a> {
    pub consumer: &'a str,
    pub producer: &'a str,
}

impl Display for DependencyDeclared<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "'{}' depends on '{}'", self.consumer, self.producer)
    }
}

impl StructuredLog for DependencyDeclared<'_> {
    fn log(&self) {
        tracing::debug!(
            consumer = self.consumer,
            producer = self.producer,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "dependency_declared",
            span_name = name,
            consumer = self.consumer,
            producer = self.producer,
        )
    }
}

/// Registry emptied.
pub struct RegistryFlushed {
    pub algorithm_count: usize,
}

impl Display for RegistryFlushed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Registry flushed, {} algorithms removed", self.algorithm_count)
    }
}

impl StructuredLog for RegistryFlushed {
    fn log(&self) {
        tracing::debug!(algorithm_count = self.algorithm_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "registry_flushed",
            span_name = name,
            algorithm_count = self.algorithm_count,
        )
    }
}

/// Cycle found while validating a merged dependency graph.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use orca_processor::observability::messages::registry::CyclicDependencyDetected;
///
/// let cycle = ["Alpha_1.0.0", "Beta_1.0.0", "Alpha_1.0.0"];
/// let msg = CyclicDependencyDetected { cycle: &cycle };
///
/// assert_eq!(
///     msg.to_string(),
///     "Cyclic dependency detected: Alpha_1.0.0 -> Beta_1.0.0 -> Alpha_1.0.0"
/// );
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(cycle_length = self.cycle.len(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "cyclic_dependency",
            span_name = name,
            cycle_length = self.cycle.len(),
        )
    }
}
