// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! Diagnostic and operational log lines are defined as message structs that
//! implement `Display`, so call sites never carry format strings of their own.
//! Each message also knows its log level and structured fields through
//! [`messages::StructuredLog`].
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::registry` - registration, dependency declaration and graph checks
//! * `messages::engine` - batch execution and per-algorithm outcomes
//! * `messages::service` - gRPC server lifecycle and calls to the core
//!
//! # Usage
//!
//! ```rust
//! use orca_processor::observability::messages::engine::AlgorithmCompleted;
//! use orca_processor::observability::messages::StructuredLog;
//! use std::time::Duration;
//!
//! AlgorithmCompleted {
//!     exec_id: "exec-1",
//!     full_name: "DataLoader_1.0.0",
//!     duration: Duration::from_millis(12),
//! }
//! .log();
//! ```

pub mod messages;
