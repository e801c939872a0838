// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Request-fatal errors raised by the partial-DAG executor.
///
/// Failures of individual algorithms never surface here; they are reported as
/// failed wire results inside the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The batch names an algorithm that is not registered with this processor.
    #[error("Invalid request for execution '{exec_id}': algorithm {full_name} is not registered")]
    UnknownAlgorithm { exec_id: String, full_name: String },

    /// The request is structurally incomplete.
    #[error("Invalid request for execution '{exec_id}': {reason}")]
    MalformedRequest { exec_id: String, reason: String },

    #[error("Internal execution error: {message}")]
    Internal { message: String },
}

impl ExecutionError {
    /// True when the request itself was at fault rather than the processor.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            ExecutionError::UnknownAlgorithm { .. } | ExecutionError::MalformedRequest { .. }
        )
    }
}
