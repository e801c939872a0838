// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};

use crate::errors::ServiceError;
use crate::observability::messages::service::{RegistrationPublished, WindowEmitted};
use crate::observability::messages::StructuredLog;
use crate::proto::orca_v1::orca_core_client::OrcaCoreClient;
use crate::proto::orca_v1::{ProcessorRegistration, Status, Window};
use crate::traits::CoreClient;

/// [`CoreClient`] over the generated tonic client.
///
/// The channel connects lazily, so construction never blocks on the core
/// being reachable; the first call surfaces any transport error.
#[derive(Debug, Clone)]
pub struct GrpcCoreClient {
    address: String,
    client: OrcaCoreClient<Channel>,
}

impl GrpcCoreClient {
    pub fn new(address: impl Into<String>) -> Result<Self, ServiceError> {
        let address = address.into();
        let endpoint =
            Endpoint::from_shared(address.clone()).map_err(|e| ServiceError::InvalidAddress {
                address: address.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client: OrcaCoreClient::new(endpoint.connect_lazy()),
            address,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

fn accepted(status: Status) -> Result<(), ServiceError> {
    if status.received {
        Ok(())
    } else {
        Err(ServiceError::Rejected {
            message: status.message,
        })
    }
}

#[async_trait]
impl CoreClient for GrpcCoreClient {
    async fn register_processor(&self, registration: ProcessorRegistration) -> Result<(), ServiceError> {
        let processor = registration.name.clone();
        let algorithm_count = registration.supported_algorithms.len();

        // Generated clients take &mut self; clones share the channel
        let mut client = self.client.clone();
        let response = client.register_processor(registration).await?;
        accepted(response.into_inner())?;

        RegistrationPublished {
            processor: &processor,
            core_address: &self.address,
            algorithm_count,
        }
        .log();
        Ok(())
    }

    async fn emit_window(&self, window: Window) -> Result<(), ServiceError> {
        let full_window_name = format!("{}_{}", window.window_type_name, window.window_type_version);
        let (time_from, time_to) = (window.time_from, window.time_to);
        let origin = window.origin.clone();

        let mut client = self.client.clone();
        let response = client.emit_window(window).await?;
        accepted(response.into_inner())?;

        WindowEmitted {
            full_window_name: &full_window_name,
            time_from,
            time_to,
            origin: &origin,
        }
        .log();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_status_is_error() {
        let error = accepted(Status {
            received: false,
            message: "duplicate processor".to_string(),
        })
        .unwrap_err();

        assert!(matches!(error, ServiceError::Rejected { ref message } if message == "duplicate processor"));
        assert!(accepted(Status {
            received: true,
            message: String::new(),
        })
        .is_ok());
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let error = GrpcCoreClient::new("not a uri").unwrap_err();
        assert!(matches!(error, ServiceError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_core_is_transport_error() {
        // Port 1 is reserved and closed on test hosts
        let client = GrpcCoreClient::new("http://127.0.0.1:1").unwrap();
        let result = client
            .emit_window(Window {
                time_from: 0,
                time_to: 1,
                window_type_name: "WindowA".to_string(),
                window_type_version: "1.0.0".to_string(),
                origin: "test".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ServiceError::Rpc(_))));
    }
}
