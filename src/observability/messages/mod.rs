// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `registry` - algorithm registration events
//! * `engine` - batch execution events
//! * `service` - server and core-client events

pub mod engine;
pub mod registry;
pub mod service;

use tracing::Span;

/// A log message that emits itself at its own level with structured fields.
pub trait StructuredLog {
    /// Emit the message through `tracing`.
    fn log(&self);

    /// A span carrying the same fields, for work scoped to this event.
    fn span(&self, name: &str) -> Span;
}
