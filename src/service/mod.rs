// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! gRPC surface of the processor and its calls into the orchestration core.

pub mod client;
pub mod processor;
pub mod processor_service;
pub mod registration;
pub mod window;

pub use client::GrpcCoreClient;
pub use processor::Processor;
pub use processor_service::ProcessorService;
pub use registration::{build_registration, ProcessorIdentity};
pub use window::Window;
