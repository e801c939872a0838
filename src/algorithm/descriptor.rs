// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::proto::orca_v1;
use crate::traits::ExecutionUnit;

/// `name` + `version` pair identifying an algorithm on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgorithmRef {
    pub name: String,
    pub version: String,
}

impl AlgorithmRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Registry key, `name_version`.
    pub fn full_name(&self) -> String {
        format!("{}_{}", self.name, self.version)
    }
}

impl fmt::Display for AlgorithmRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.version)
    }
}

impl From<&orca_v1::Algorithm> for AlgorithmRef {
    fn from(algorithm: &orca_v1::Algorithm) -> Self {
        Self::new(algorithm.name.clone(), algorithm.version.clone())
    }
}

/// The data-window type that triggers an algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowType {
    pub name: String,
    pub version: String,
}

impl WindowType {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Trigger key, `window_name_window_version`.
    pub fn full_window_name(&self) -> String {
        format!("{}_{}", self.name, self.version)
    }
}

/// The user-supplied fields of an algorithm, checked by
/// [`validate_spec`](crate::algorithm::validate_spec) before registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmSpec {
    pub name: String,
    pub version: String,
    pub window_name: String,
    pub window_version: String,
}

impl AlgorithmSpec {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        window_name: impl Into<String>,
        window_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            window_name: window_name.into(),
            window_version: window_version.into(),
        }
    }
}

/// Immutable metadata and business logic of one registered algorithm.
#[derive(Clone)]
pub struct AlgorithmDescriptor {
    algorithm: AlgorithmRef,
    window: WindowType,
    unit: Arc<dyn ExecutionUnit>,
    owner_process: String,
    owner_runtime: String,
}

impl AlgorithmDescriptor {
    pub fn new(
        spec: AlgorithmSpec,
        unit: Arc<dyn ExecutionUnit>,
        owner_process: impl Into<String>,
        owner_runtime: impl Into<String>,
    ) -> Self {
        Self {
            algorithm: AlgorithmRef::new(spec.name, spec.version),
            window: WindowType::new(spec.window_name, spec.window_version),
            unit,
            owner_process: owner_process.into(),
            owner_runtime: owner_runtime.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.algorithm.name
    }

    pub fn version(&self) -> &str {
        &self.algorithm.version
    }

    pub fn algorithm_ref(&self) -> &AlgorithmRef {
        &self.algorithm
    }

    pub fn window(&self) -> &WindowType {
        &self.window
    }

    pub fn full_name(&self) -> String {
        self.algorithm.full_name()
    }

    pub fn full_window_name(&self) -> String {
        self.window.full_window_name()
    }

    pub fn owner_process(&self) -> &str {
        &self.owner_process
    }

    pub fn owner_runtime(&self) -> &str {
        &self.owner_runtime
    }

    pub fn unit(&self) -> Arc<dyn ExecutionUnit> {
        Arc::clone(&self.unit)
    }

    /// The registration fields this descriptor was built from.
    pub fn spec(&self) -> AlgorithmSpec {
        AlgorithmSpec::new(
            self.algorithm.name.clone(),
            self.algorithm.version.clone(),
            self.window.name.clone(),
            self.window.version.clone(),
        )
    }

    /// Wire form without dependencies; see `service::build_registration`.
    pub fn to_proto(&self) -> orca_v1::Algorithm {
        orca_v1::Algorithm {
            name: self.algorithm.name.clone(),
            version: self.algorithm.version.clone(),
            window_type: Some(orca_v1::WindowType {
                name: self.window.name.clone(),
                version: self.window.version.clone(),
            }),
            dependencies: Vec::new(),
        }
    }

    /// How this descriptor appears in another algorithm's dependency list.
    pub fn to_dependency_proto(&self) -> orca_v1::AlgorithmDependency {
        orca_v1::AlgorithmDependency {
            name: self.algorithm.name.clone(),
            version: self.algorithm.version.clone(),
            processor_name: self.owner_process.clone(),
            processor_runtime: self.owner_runtime.clone(),
        }
    }
}

impl fmt::Debug for AlgorithmDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmDescriptor")
            .field("full_name", &self.full_name())
            .field("full_window_name", &self.full_window_name())
            .field("owner_process", &self.owner_process)
            .field("owner_runtime", &self.owner_runtime)
            .finish()
    }
}

/// Token returned by [`Registry::register`](crate::algorithm::Registry::register).
///
/// Dependencies are declared by handle rather than by comparing execution
/// units. A handle only resolves in the registry that minted it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgorithmHandle {
    pub(crate) full_name: String,
    pub(crate) registry_id: u64,
}

impl AlgorithmHandle {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl fmt::Display for AlgorithmHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::AlgorithmOutput;
    use crate::traits::unit_fn;

    #[test]
    fn test_derived_keys() {
        let descriptor = AlgorithmDescriptor::new(
            AlgorithmSpec::new("MovingAverage", "1.2.0", "MarketTick", "2.0.0"),
            unit_fn(|_| Ok(AlgorithmOutput::Scalar(1.0))),
            "ml_v2",
            "rustc",
        );

        assert_eq!(descriptor.full_name(), "MovingAverage_1.2.0");
        assert_eq!(descriptor.full_window_name(), "MarketTick_2.0.0");
        assert_eq!(descriptor.algorithm_ref().to_string(), "MovingAverage_1.2.0");
    }

    #[test]
    fn test_dependency_proto_carries_provenance() {
        let descriptor = AlgorithmDescriptor::new(
            AlgorithmSpec::new("DataLoader", "1.0.0", "WindowA", "1.0.0"),
            unit_fn(|_| Ok(AlgorithmOutput::Scalar(1.0))),
            "ml_v2",
            "rustc 1.80",
        );

        let dependency = descriptor.to_dependency_proto();
        assert_eq!(dependency.name, "DataLoader");
        assert_eq!(dependency.processor_name, "ml_v2");
        assert_eq!(dependency.processor_runtime, "rustc 1.80");

        let algorithm = descriptor.to_proto();
        let window = algorithm.window_type.expect("window type is always set");
        assert_eq!(window.name, "WindowA");
        assert!(algorithm.dependencies.is_empty());
    }
}
