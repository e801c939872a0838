// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors from the gRPC facade and the orchestration-engine client.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Orchestration engine call failed: {0}")]
    Rpc(#[from] tonic::Status),

    #[error("Orchestration engine rejected the request: {message}")]
    Rejected { message: String },

    #[error("Failed to bind '{address}': {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
}
