// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::pin::Pin;

use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Response, Status};

use crate::algorithm::AlgorithmRef;
use crate::engine::{CompletedAlgorithm, PartialDagExecutor};
use crate::errors::ExecutionError;
use crate::observability::messages::service::HealthCheckServed;
use crate::observability::messages::StructuredLog;
use crate::proto::orca_v1::health_check_response;
use crate::proto::orca_v1::orca_processor_server::OrcaProcessor;
use crate::proto::orca_v1::{
    Algorithm, AlgorithmResult, ExecutionRequest, ExecutionResult, HealthCheckRequest,
    HealthCheckResponse, ProcessorMetrics,
};

type ExecutionResultStream = Pin<Box<dyn Stream<Item = Result<ExecutionResult, Status>> + Send>>;

/// `OrcaProcessor` gRPC service backed by a [`PartialDagExecutor`].
#[derive(Clone)]
pub struct ProcessorService {
    name: String,
    executor: PartialDagExecutor,
}

impl ProcessorService {
    pub fn new(name: impl Into<String>, executor: PartialDagExecutor) -> Self {
        Self {
            name: name.into(),
            executor,
        }
    }

    pub fn executor(&self) -> &PartialDagExecutor {
        &self.executor
    }
}

fn to_status(error: ExecutionError) -> Status {
    if error.is_invalid_request() {
        Status::invalid_argument(error.to_string())
    } else {
        Status::internal(error.to_string())
    }
}

/// Pair each completion with the algorithm message from the request.
fn to_execution_result(
    exec_id: &str,
    requested: &HashMap<String, Algorithm>,
    completed: CompletedAlgorithm,
) -> ExecutionResult {
    let full_name = completed.algorithm.full_name();
    let algorithm = requested.get(&full_name).cloned().unwrap_or_else(|| Algorithm {
        name: completed.algorithm.name.clone(),
        version: completed.algorithm.version.clone(),
        window_type: None,
        dependencies: Vec::new(),
    });

    ExecutionResult {
        exec_id: exec_id.to_string(),
        algorithm_result: Some(AlgorithmResult {
            algorithm: Some(algorithm),
            result: Some(completed.result),
        }),
    }
}

#[tonic::async_trait]
impl OrcaProcessor for ProcessorService {
    type ExecuteDagPartStream = ExecutionResultStream;

    async fn execute_dag_part(
        &self,
        request: Request<ExecutionRequest>,
    ) -> Result<Response<Self::ExecuteDagPartStream>, Status> {
        let ExecutionRequest {
            exec_id,
            algorithm_results,
            algorithms,
        } = request.into_inner();

        let assigned: Vec<AlgorithmRef> = algorithms.iter().map(AlgorithmRef::from).collect();
        let requested: HashMap<String, Algorithm> = algorithms
            .into_iter()
            .map(|algorithm| (AlgorithmRef::from(&algorithm).full_name(), algorithm))
            .collect();

        let completions = self
            .executor
            .execute(exec_id.clone(), assigned, algorithm_results)
            .map_err(to_status)?;

        let stream = completions
            .map(move |completed| Ok::<_, Status>(to_execution_result(&exec_id, &requested, completed)));

        Ok(Response::new(Box::pin(stream) as Self::ExecuteDagPartStream))
    }

    async fn health_check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        HealthCheckServed {
            processor: &self.name,
            requested_at: request.get_ref().timestamp,
        }
        .log();

        Ok(Response::new(HealthCheckResponse {
            status: health_check_response::Status::Serving as i32,
            message: "Processor is healthy".to_string(),
            metrics: Some(ProcessorMetrics {
                active_tasks: 0,
                memory_bytes: 0,
                cpu_percent: 0.0,
                uptime_seconds: 0,
            }),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::algorithm::{AlgorithmDescriptor, AlgorithmSpec, Registry};
    use crate::marshal::AlgorithmOutput;
    use crate::proto::orca_v1::WindowType;
    use crate::proto::ResultStatus;
    use crate::traits::unit_fn;

    fn service() -> ProcessorService {
        let mut registry = Registry::new();
        registry
            .register(AlgorithmDescriptor::new(
                AlgorithmSpec::new("Signal", "2.0.0", "WindowA", "1.0.0"),
                unit_fn(|_| Ok(AlgorithmOutput::Values(vec![1.0, -1.0]))),
                "signals",
                "rust/test",
            ))
            .unwrap();
        ProcessorService::new("signals", PartialDagExecutor::new(Arc::new(registry), 2))
    }

    fn request_algorithm(name: &str) -> Algorithm {
        Algorithm {
            name: name.to_string(),
            version: "2.0.0".to_string(),
            window_type: Some(WindowType {
                name: "WindowA".to_string(),
                version: "1.0.0".to_string(),
            }),
            dependencies: vec![],
        }
    }

    #[tokio::test]
    async fn test_execute_dag_part_echoes_request_algorithm() {
        let request = Request::new(ExecutionRequest {
            exec_id: "exec-1".to_string(),
            algorithm_results: vec![],
            algorithms: vec![request_algorithm("Signal")],
        });

        let stream = service().execute_dag_part(request).await.unwrap().into_inner();
        let results: Vec<ExecutionResult> = stream.map(|r| r.unwrap()).collect().await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].exec_id, "exec-1");
        let algorithm_result = results[0].algorithm_result.as_ref().unwrap();
        assert_eq!(algorithm_result.algorithm, Some(request_algorithm("Signal")));
        assert_eq!(
            algorithm_result.result.as_ref().unwrap().status,
            ResultStatus::Succeeded as i32
        );
    }

    #[tokio::test]
    async fn test_unknown_algorithm_is_invalid_argument() {
        let request = Request::new(ExecutionRequest {
            exec_id: "exec-2".to_string(),
            algorithm_results: vec![],
            algorithms: vec![request_algorithm("Signal"), request_algorithm("Ghost")],
        });

        let status = match service().execute_dag_part(request).await {
            Ok(_) => panic!("Expected the request to be rejected"),
            Err(status) => status,
        };

        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("Ghost_2.0.0"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = service()
            .health_check(Request::new(HealthCheckRequest { timestamp: 1 }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.status, health_check_response::Status::Serving as i32);
        assert_eq!(response.message, "Processor is healthy");
        assert_eq!(response.metrics.unwrap().active_tasks, 0);
    }
}
