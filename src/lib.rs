// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod algorithm;  // descriptors, registry, registration rules
pub mod config;     // processor settings
pub mod engine;     // partial-DAG executor
pub mod errors;     // error handling
pub mod marshal;    // wire result marshalling
pub mod observability;
pub mod proto;      // generated protobufs live here
pub mod service;    // gRPC facade
pub mod traits;     // unified abstractions

pub use algorithm::{AlgorithmDescriptor, AlgorithmHandle, AlgorithmRef, AlgorithmSpec, Registry};
pub use engine::PartialDagExecutor;
pub use marshal::{AlgorithmOutput, DependencyValue, DependencyValues};
pub use service::Processor;
