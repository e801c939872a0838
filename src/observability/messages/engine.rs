// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for partial-DAG execution events.
//!
//! This module contains message types for logging events related to:
//! * Batch lifecycle (received, completed, rejected)
//! * Per-algorithm outcomes inside a batch
//! * Result delivery to the caller

use crate::errors::ExecutionError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Batch accepted for execution.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use orca_processor::observability::messages::engine::BatchStarted;
///
/// let msg = BatchStarted {
///     exec_id: "exec-42",
///     algorithm_count: 3,
///     upstream_count: 2,
///     max_workers: 10,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct BatchStarted<'a> {
    pub exec_id: &'a str,
    pub algorithm_count: usize,
    pub upstream_count: usize,
    pub max_workers: usize,
}

impl Display for BatchStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Executing batch '{}': {} algorithms, {} upstream results, max_workers={}",
            self.exec_id, self.algorithm_count, self.upstream_count, self.max_workers
        )
    }
}

impl StructuredLog for BatchStarted<'_> {
    fn log(&self) {
        tracing::info!(
            exec_id = self.exec_id,
            algorithm_count = self.algorithm_count,
            upstream_count = self.upstream_count,
            max_workers = self.max_workers,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "batch",
            span_name = name,
            exec_id = self.exec_id,
            algorithm_count = self.algorithm_count,
        )
    }
}

/// Every algorithm in the batch has produced a result.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BatchCompleted<'a> {
    pub exec_id: &'a str,
    pub algorithm_count: usize,
    pub failed_count: usize,
    pub duration: Duration,
}

impl Display for BatchCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Batch '{}' completed: {} algorithms ({} failed) in {:?}",
            self.exec_id, self.algorithm_count, self.failed_count, self.duration
        )
    }
}

impl StructuredLog for BatchCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            exec_id = self.exec_id,
            algorithm_count = self.algorithm_count,
            failed_count = self.failed_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "batch_completed",
            span_name = name,
            exec_id = self.exec_id,
            duration = ?self.duration,
        )
    }
}

/// Batch refused before any algorithm ran.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use orca_processor::errors::ExecutionError;
/// use orca_processor::observability::messages::engine::BatchRejected;
///
/// let error = ExecutionError::UnknownAlgorithm {
///     exec_id: "exec-7".to_string(),
///     full_name: "Missing_1.0.0".to_string(),
/// };
/// let msg = BatchRejected { exec_id: "exec-7", error: &error };
///
/// assert!(msg.to_string().starts_with("Rejected batch 'exec-7'"));
/// ```
pub struct BatchRejected<'a> {
    pub exec_id: &'a str,
    pub error: &'a ExecutionError,
}

impl Display for BatchRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Rejected batch '{}': {}", self.exec_id, self.error)
    }
}

impl StructuredLog for BatchRejected<'_> {
    fn log(&self) {
        tracing::error!(
            exec_id = self.exec_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("batch_rejected", span_name = name, exec_id = self.exec_id)
    }
}

/// Algorithm picked up by a worker.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct AlgorithmStarted<'a> {
    pub exec_id: &'a str,
    pub full_name: &'a str,
}

impl Display for AlgorithmStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "[{}] running '{}'", self.exec_id, self.full_name)
    }
}

impl StructuredLog for AlgorithmStarted<'_> {
    fn log(&self) {
        tracing::debug!(exec_id = self.exec_id, algorithm = self.full_name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "algorithm",
            span_name = name,
            exec_id = self.exec_id,
            algorithm = self.full_name,
        )
    }
}

/// Algorithm returned and its result was marshalled.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct AlgorithmCompleted<'a> {
    pub exec_id: &'a str,
    pub full_name: &'a str,
    pub duration: Duration,
}

impl Display for AlgorithmCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}] '{}' completed in {:?}",
            self.exec_id, self.full_name, self.duration
        )
    }
}

impl StructuredLog for AlgorithmCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            exec_id = self.exec_id,
            algorithm = self.full_name,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "algorithm_completed",
            span_name = name,
            exec_id = self.exec_id,
            algorithm = self.full_name,
        )
    }
}

/// Algorithm raised an error, panicked or ran out of time.
///
/// # Log Level
/// `warn!` - The batch carries on; the failure is reported in the result
pub struct AlgorithmFailed<'a> {
    pub exec_id: &'a str,
    pub full_name: &'a str,
    pub reason: &'a str,
}

impl Display for AlgorithmFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}] '{}' failed: {}",
            self.exec_id, self.full_name, self.reason
        )
    }
}

impl StructuredLog for AlgorithmFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            exec_id = self.exec_id,
            algorithm = self.full_name,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "algorithm_failed",
            span_name = name,
            exec_id = self.exec_id,
            algorithm = self.full_name,
        )
    }
}

/// The receiving side went away before every result was delivered.
pub struct ResultStreamClosed<'a> {
    pub exec_id: &'a str,
    pub full_name: &'a str,
}

impl Display for ResultStreamClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}] result stream closed, dropping result of '{}'",
            self.exec_id, self.full_name
        )
    }
}

impl StructuredLog for ResultStreamClosed<'_> {
    fn log(&self) {
        tracing::warn!(exec_id = self.exec_id, algorithm = self.full_name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "result_stream_closed",
            span_name = name,
            exec_id = self.exec_id,
        )
    }
}
