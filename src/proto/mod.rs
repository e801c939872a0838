// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

// Module declaration for generated protobuf code
pub mod orca_v1 {
    tonic::include_proto!("orca.v1");
}

// Re-export the types for easier access
pub use orca_v1::{
    AlgorithmResult, ExecutionRequest, ExecutionResult, ProcessorRegistration, Result as WireResult,
    ResultStatus,
};
