// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registered algorithms and the rules that govern them.
//!
//! * `descriptor` - immutable metadata for one algorithm
//! * `validation` - naming and versioning rules applied before registration
//! * `registry` - descriptors, their declared dependencies and window triggers
//! * `graph` - explicit dependency graph with cycle detection, used when
//!   registrations from several processors are merged

mod descriptor;
mod graph;
mod registry;
mod validation;

pub use descriptor::{AlgorithmDescriptor, AlgorithmHandle, AlgorithmRef, AlgorithmSpec, WindowType};
pub use graph::{validate_registrations, DependencyGraph};
pub use registry::Registry;
pub use validation::{is_basic_semver, is_pascal_case, validate_spec};
