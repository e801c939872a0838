// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::algorithm::{validate_spec, AlgorithmDescriptor, AlgorithmHandle, DependencyGraph};
use crate::errors::RegistrationError;
use crate::observability::messages::registry::{
    AlgorithmRegistered, AlgorithmRejected, DependencyDeclared, RegistryFlushed,
};
use crate::observability::messages::StructuredLog;

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Registered algorithms, their declared dependencies and window triggers.
///
/// A registry is populated during startup and then frozen behind an `Arc` for
/// the executor; there is no deregistration path. Each instance gets its own
/// identity so handles from one registry never resolve in another.
pub struct Registry {
    id: u64,
    algorithms: HashMap<String, Arc<AlgorithmDescriptor>>,
    /// Registration order, used for the registration payload
    order: Vec<String>,
    dependencies: HashMap<String, Vec<Arc<AlgorithmDescriptor>>>,
    window_triggers: HashMap<String, Vec<Arc<AlgorithmDescriptor>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            algorithms: HashMap::new(),
            order: Vec::new(),
            dependencies: HashMap::new(),
            window_triggers: HashMap::new(),
        }
    }

    /// Validate and insert a descriptor.
    ///
    /// Fails without touching the registry when a naming rule is violated or
    /// the `name_version` key is already taken.
    pub fn register(
        &mut self,
        descriptor: AlgorithmDescriptor,
    ) -> Result<AlgorithmHandle, RegistrationError> {
        let full_name = descriptor.full_name();

        if let Err(error) = validate_spec(&descriptor.spec()) {
            let error = RegistrationError::from(error);
            AlgorithmRejected {
                full_name: &full_name,
                error: &error,
            }
            .log();
            return Err(error);
        }

        if self.algorithms.contains_key(&full_name) {
            let error = RegistrationError::DuplicateName {
                full_name: full_name.clone(),
            };
            AlgorithmRejected {
                full_name: &full_name,
                error: &error,
            }
            .log();
            return Err(error);
        }

        AlgorithmRegistered {
            full_name: &full_name,
            full_window_name: &descriptor.full_window_name(),
        }
        .log();

        self.algorithms
            .insert(full_name.clone(), Arc::new(descriptor));
        self.order.push(full_name.clone());

        Ok(AlgorithmHandle {
            full_name,
            registry_id: self.id,
        })
    }

    /// Record that `consumer` reads the output of `producer`.
    ///
    /// The producer must already be registered here; declarations are
    /// order-sensitive and forward-only. Declaration order is preserved.
    pub fn declare_dependency(
        &mut self,
        consumer: &AlgorithmHandle,
        producer: &AlgorithmHandle,
    ) -> Result<(), RegistrationError> {
        if !self.has_execution_unit(consumer) {
            return Err(RegistrationError::NotFound {
                full_name: consumer.full_name.clone(),
            });
        }

        let producer_descriptor = match self.resolve(producer) {
            Some(descriptor) => descriptor,
            None => {
                let error = RegistrationError::UnknownDependency {
                    consumer: consumer.full_name.clone(),
                    dependency: producer.full_name.clone(),
                };
                AlgorithmRejected {
                    full_name: &consumer.full_name,
                    error: &error,
                }
                .log();
                return Err(error);
            }
        };

        DependencyDeclared {
            consumer: &consumer.full_name,
            producer: &producer.full_name,
        }
        .log();

        self.dependencies
            .entry(consumer.full_name.clone())
            .or_default()
            .push(producer_descriptor);
        Ok(())
    }

    /// Add the algorithm to the trigger set of `full_window_name`.
    ///
    /// Many algorithms may share one window; nothing is deduplicated.
    pub fn associate_window(
        &mut self,
        full_window_name: impl Into<String>,
        algorithm: &AlgorithmHandle,
    ) -> Result<(), RegistrationError> {
        let descriptor = self.resolve(algorithm).ok_or_else(|| RegistrationError::NotFound {
            full_name: algorithm.full_name.clone(),
        })?;

        self.window_triggers
            .entry(full_window_name.into())
            .or_default()
            .push(descriptor);
        Ok(())
    }

    pub fn lookup(&self, full_name: &str) -> Result<Arc<AlgorithmDescriptor>, RegistrationError> {
        self.algorithms
            .get(full_name)
            .cloned()
            .ok_or_else(|| RegistrationError::NotFound {
                full_name: full_name.to_string(),
            })
    }

    /// Descriptors in registration order.
    pub fn all_descriptors(&self) -> impl Iterator<Item = &Arc<AlgorithmDescriptor>> {
        self.order
            .iter()
            .filter_map(move |full_name| self.algorithms.get(full_name))
    }

    /// Declared producers of `full_name`, in declaration order.
    pub fn dependencies_of(&self, full_name: &str) -> &[Arc<AlgorithmDescriptor>] {
        self.dependencies
            .get(full_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Algorithms triggered by `full_window_name`.
    pub fn window_triggers(&self, full_window_name: &str) -> &[Arc<AlgorithmDescriptor>] {
        self.window_triggers
            .get(full_window_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn window_names(&self) -> impl Iterator<Item = &String> {
        self.window_triggers.keys()
    }

    /// True when `handle` was minted by this registry for a registered algorithm.
    pub fn has_execution_unit(&self, handle: &AlgorithmHandle) -> bool {
        self.resolve(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Local dependency graph keyed by `full_name`.
    pub fn dependency_graph(&self) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for full_name in &self.order {
            graph.add_algorithm(full_name.clone());
            for producer in self.dependencies_of(full_name) {
                graph.add_dependency(full_name.clone(), producer.full_name());
            }
        }
        graph
    }

    /// Drop every registration. Intended for test isolation only.
    pub fn reset(&mut self) {
        RegistryFlushed {
            algorithm_count: self.algorithms.len(),
        }
        .log();
        self.algorithms.clear();
        self.order.clear();
        self.dependencies.clear();
        self.window_triggers.clear();
    }

    fn resolve(&self, handle: &AlgorithmHandle) -> Option<Arc<AlgorithmDescriptor>> {
        if handle.registry_id != self.id {
            return None;
        }
        self.algorithms.get(&handle.full_name).cloned()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("algorithm_count", &self.algorithms.len())
            .field("algorithms", &self.order)
            .field("window_count", &self.window_triggers.len())
            .finish()
    }
}
