// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod graph;
mod registration;
mod service;

pub use config::ConfigError;
pub use execution::ExecutionError;
pub use graph::GraphError;
pub use registration::{DescriptorField, RegistrationError, ValidationError, ValidationRule};
pub use service::ServiceError;
