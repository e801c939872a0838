// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The processor facade: register algorithms, publish them, serve batches.
//!
//! ```no_run
//! use orca_processor::algorithm::AlgorithmSpec;
//! use orca_processor::config::ProcessorSettings;
//! use orca_processor::marshal::AlgorithmOutput;
//! use orca_processor::traits::unit_fn;
//! use orca_processor::Processor;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut processor = Processor::new(ProcessorSettings::default());
//! let prices = processor.algorithm(
//!     AlgorithmSpec::new("Prices", "1.0.0", "MarketTick", "1.0.0"),
//!     unit_fn(|_| Ok(AlgorithmOutput::Values(vec![101.5, 102.0]))),
//!     &[],
//! )?;
//! processor.algorithm(
//!     AlgorithmSpec::new("MeanPrice", "1.0.0", "MarketTick", "1.0.0"),
//!     unit_fn(|deps| {
//!         let prices = deps.get("Prices_1.0.0").and_then(|v| v.as_values()).unwrap_or(&[]);
//!         Ok(AlgorithmOutput::Scalar(prices.iter().sum::<f64>() / prices.len().max(1) as f64))
//!     }),
//!     &[prices],
//! )?;
//!
//! processor.serve(CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;

use crate::algorithm::{
    validate_spec, AlgorithmDescriptor, AlgorithmHandle, AlgorithmSpec, Registry,
};
use crate::config::ProcessorSettings;
use crate::engine::PartialDagExecutor;
use crate::errors::{RegistrationError, ServiceError};
use crate::observability::messages::registry::AlgorithmRejected;
use crate::observability::messages::service::{ServerStarted, ServerStopped};
use crate::observability::messages::StructuredLog;
use crate::proto::orca_v1::orca_processor_server::OrcaProcessorServer;
use crate::proto::ProcessorRegistration;
use crate::service::{build_registration, ProcessorIdentity, ProcessorService};
use crate::traits::{CoreClient, ExecutionUnit};

/// A processor process: its settings and the algorithms it offers.
pub struct Processor {
    settings: ProcessorSettings,
    registry: Registry,
}

impl Processor {
    pub fn new(settings: ProcessorSettings) -> Self {
        Self {
            settings,
            registry: Registry::new(),
        }
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn identity(&self) -> ProcessorIdentity {
        ProcessorIdentity::from(&self.settings)
    }

    /// Register an algorithm owned by this processor.
    ///
    /// Validates the fields, registers the algorithm, binds it to its window and declares
    /// each dependency. Field rules are checked before the handles in
    /// `depends_on`, and both before the registry is touched, so a failed call
    /// leaves it unchanged.
    pub fn algorithm(
        &mut self,
        spec: AlgorithmSpec,
        unit: Arc<dyn ExecutionUnit>,
        depends_on: &[AlgorithmHandle],
    ) -> Result<AlgorithmHandle, RegistrationError> {
        let descriptor =
            AlgorithmDescriptor::new(spec, unit, &self.settings.name, &self.settings.runtime);

        if let Err(error) = validate_spec(&descriptor.spec()) {
            let error = RegistrationError::from(error);
            AlgorithmRejected {
                full_name: &descriptor.full_name(),
                error: &error,
            }
            .log();
            return Err(error);
        }

        if let Some(unknown) = depends_on
            .iter()
            .find(|handle| !self.registry.has_execution_unit(handle))
        {
            let error = RegistrationError::UnknownDependency {
                consumer: descriptor.full_name(),
                dependency: unknown.full_name().to_string(),
            };
            AlgorithmRejected {
                full_name: &descriptor.full_name(),
                error: &error,
            }
            .log();
            return Err(error);
        }

        let full_window_name = descriptor.full_window_name();
        let handle = self.registry.register(descriptor)?;
        self.registry.associate_window(full_window_name, &handle)?;
        for producer in depends_on {
            self.registry.declare_dependency(&handle, producer)?;
        }
        Ok(handle)
    }

    /// Payload published to the core at startup.
    pub fn registration(&self) -> ProcessorRegistration {
        build_registration(&self.registry, &self.identity())
    }

    pub async fn register_with(&self, client: &dyn CoreClient) -> Result<(), ServiceError> {
        client.register_processor(self.registration()).await
    }

    /// Freeze the registry and build the gRPC service around it.
    pub fn into_service(self) -> ProcessorService {
        let mut executor = PartialDagExecutor::new(Arc::new(self.registry), self.settings.max_workers);
        if let Some(timeout) = self.settings.unit_timeout() {
            executor = executor.with_unit_timeout(timeout);
        }
        ProcessorService::new(self.settings.name, executor)
    }

    /// Bind `bind_host:port` and serve until `shutdown` is cancelled.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<(), ServiceError> {
        let address = self.settings.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServiceError::Bind { address, source })?;
        self.serve_with_listener(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` is cancelled.
    pub async fn serve_with_listener(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<(), ServiceError> {
        let address = listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| self.settings.bind_address());
        let max_message_bytes = self.settings.max_message_bytes;
        let name = self.settings.name.clone();
        let algorithm_count = self.registry.len();

        let service = OrcaProcessorServer::new(self.into_service())
            .max_decoding_message_size(max_message_bytes)
            .max_encoding_message_size(max_message_bytes);

        ServerStarted {
            processor: &name,
            address: &address,
            algorithm_count,
        }
        .log();

        Server::builder()
            .add_service(service)
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown.cancelled())
            .await?;

        ServerStopped { processor: &name }.log();
        Ok(())
    }
}
