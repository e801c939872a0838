// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the processor's gRPC surface and its calls to the core.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// gRPC server bound and accepting requests.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use orca_processor::observability::messages::service::ServerStarted;
///
/// let msg = ServerStarted {
///     processor: "ml",
///     address: "0.0.0.0:5377",
///     algorithm_count: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ServerStarted<'a> {
    pub processor: &'a str,
    pub address: &'a str,
    pub algorithm_count: usize,
}

impl Display for ServerStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' serving {} algorithms on {}",
            self.processor, self.algorithm_count, self.address
        )
    }
}

impl StructuredLog for ServerStarted<'_> {
    fn log(&self) {
        tracing::info!(
            processor = self.processor,
            address = self.address,
            algorithm_count = self.algorithm_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "server",
            span_name = name,
            processor = self.processor,
            address = self.address,
        )
    }
}

/// gRPC server drained after shutdown was requested.
pub struct ServerStopped<'a> {
    pub processor: &'a str,
}

impl Display for ServerStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Processor '{}' stopped", self.processor)
    }
}

impl StructuredLog for ServerStopped<'_> {
    fn log(&self) {
        tracing::info!(processor = self.processor, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("server_stopped", span_name = name, processor = self.processor)
    }
}

/// Registration payload accepted by the core.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RegistrationPublished<'a> {
    pub processor: &'a str,
    pub core_address: &'a str,
    pub algorithm_count: usize,
}

impl Display for RegistrationPublished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered processor '{}' with {} algorithms at core {}",
            self.processor, self.algorithm_count, self.core_address
        )
    }
}

impl StructuredLog for RegistrationPublished<'_> {
    fn log(&self) {
        tracing::info!(
            processor = self.processor,
            core_address = self.core_address,
            algorithm_count = self.algorithm_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "registration",
            span_name = name,
            processor = self.processor,
            core_address = self.core_address,
        )
    }
}

/// Window forwarded to the core.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct WindowEmitted<'a> {
    pub full_window_name: &'a str,
    pub time_from: u64,
    pub time_to: u64,
    pub origin: &'a str,
}

impl Display for WindowEmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Emitted window '{}' [{}, {}) from '{}'",
            self.full_window_name, self.time_from, self.time_to, self.origin
        )
    }
}

impl StructuredLog for WindowEmitted<'_> {
    fn log(&self) {
        tracing::debug!(
            window = self.full_window_name,
            time_from = self.time_from,
            time_to = self.time_to,
            origin = self.origin,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "window",
            span_name = name,
            window = self.full_window_name,
        )
    }
}

/// Health check answered.
pub struct HealthCheckServed<'a> {
    pub processor: &'a str,
    pub requested_at: i64,
}

impl Display for HealthCheckServed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Health check for '{}' (requested at {})",
            self.processor, self.requested_at
        )
    }
}

impl StructuredLog for HealthCheckServed<'_> {
    fn log(&self) {
        tracing::trace!(
            processor = self.processor,
            requested_at = self.requested_at,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("health_check", span_name = name, processor = self.processor)
    }
}
