// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Partial-DAG executor.
//!
//! A batch is one wave of a larger graph whose upstream work has already been
//! done elsewhere, so the executor performs no ordering of its own: every
//! assigned algorithm starts as soon as a worker is free and results are
//! streamed in the order they finish.
//!
//! ## Batch lifecycle
//!
//! 1. Upstream wire results are decoded once into a [`DependencyValues`] map
//!    shared read-only by every algorithm in the batch
//! 2. Every assigned algorithm is resolved against the registry; one unknown
//!    name rejects the whole batch before anything runs
//! 3. Each algorithm runs on the blocking pool, gated by a semaphore shared
//!    across all batches of this executor
//! 4. A coordinator task forwards results to the caller as tasks complete
//!
//! ## Failure containment
//!
//! An error returned by a unit, a panic inside it, or an expired deadline all
//! become an unhandled-failure result for that algorithm only. The stream
//! still ends normally once every algorithm has reported.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use crate::algorithm::{AlgorithmDescriptor, AlgorithmRef, Registry};
use crate::config::DEFAULT_MAX_WORKERS;
use crate::errors::ExecutionError;
use crate::marshal::{
    decode, marshal, unhandled_failure, unix_timestamp, DependencyValue, DependencyValues,
    FailureDetail,
};
use crate::observability::messages::engine::{
    AlgorithmCompleted, AlgorithmFailed, AlgorithmStarted, BatchCompleted, BatchRejected,
    BatchStarted, ResultStreamClosed,
};
use crate::observability::messages::StructuredLog;
use crate::proto::orca_v1::result::ResultData;
use crate::proto::orca_v1::AlgorithmResult;
use crate::proto::{ResultStatus, WireResult};

/// One finished algorithm of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedAlgorithm {
    pub algorithm: AlgorithmRef,
    pub result: WireResult,
}

impl CompletedAlgorithm {
    pub fn succeeded(&self) -> bool {
        self.result.status == ResultStatus::Succeeded as i32
    }
}

/// Runs assigned batches against a frozen registry.
///
/// Cloning is cheap and clones share the worker pool.
#[derive(Clone)]
pub struct PartialDagExecutor {
    registry: Arc<Registry>,
    workers: Arc<Semaphore>,
    max_workers: usize,
    unit_timeout: Option<Duration>,
}

impl PartialDagExecutor {
    pub fn new(registry: Arc<Registry>, max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            registry,
            workers: Arc::new(Semaphore::new(max_workers)),
            max_workers,
            unit_timeout: None,
        }
    }

    /// Fail any algorithm that runs longer than `timeout`.
    ///
    /// The blocking thread cannot be interrupted, so a timed-out unit keeps
    /// its worker slot until it actually returns.
    pub fn with_unit_timeout(mut self, timeout: Duration) -> Self {
        self.unit_timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn unit_timeout(&self) -> Option<Duration> {
        self.unit_timeout
    }

    /// Start a batch and return the stream of its results.
    ///
    /// Must be called from within a Tokio runtime. The only error is a
    /// request-level one; per-algorithm failures arrive inside the stream.
    pub fn execute(
        &self,
        exec_id: impl Into<String>,
        assigned: Vec<AlgorithmRef>,
        upstream: Vec<AlgorithmResult>,
    ) -> Result<ReceiverStream<CompletedAlgorithm>, ExecutionError> {
        let exec_id: Arc<str> = Arc::from(exec_id.into());

        let prepared = decode_upstream(&exec_id, &upstream)
            .and_then(|dependencies| Ok((dependencies, self.resolve(&exec_id, &assigned)?)));
        let (dependencies, descriptors) = match prepared {
            Ok(prepared) => prepared,
            Err(error) => {
                BatchRejected {
                    exec_id: &exec_id,
                    error: &error,
                }
                .log();
                return Err(error);
            }
        };

        let batch = BatchStarted {
            exec_id: &exec_id,
            algorithm_count: descriptors.len(),
            upstream_count: dependencies.len(),
            max_workers: self.max_workers,
        };
        batch.log();
        let batch_span = batch.span("execute_dag_part");

        let dependencies = Arc::new(dependencies);
        let (tx, rx) = mpsc::channel(descriptors.len().max(1));
        let mut tasks = JoinSet::new();

        for descriptor in descriptors {
            let run = run_algorithm(
                exec_id.clone(),
                descriptor,
                dependencies.clone(),
                self.workers.clone(),
                self.unit_timeout,
            );
            tasks.spawn(run.instrument(batch_span.clone()));
        }

        tokio::spawn(
            forward_results(exec_id, tasks, tx).instrument(batch_span),
        );

        Ok(ReceiverStream::new(rx))
    }

    fn resolve(
        &self,
        exec_id: &str,
        assigned: &[AlgorithmRef],
    ) -> Result<Vec<Arc<AlgorithmDescriptor>>, ExecutionError> {
        assigned
            .iter()
            .map(|algorithm| {
                let full_name = algorithm.full_name();
                self.registry
                    .lookup(&full_name)
                    .map_err(|_| ExecutionError::UnknownAlgorithm {
                        exec_id: exec_id.to_string(),
                        full_name,
                    })
            })
            .collect()
    }
}

/// Index upstream results by producer `full_name`.
fn decode_upstream(
    exec_id: &str,
    upstream: &[AlgorithmResult],
) -> Result<DependencyValues, ExecutionError> {
    let mut values = DependencyValues::new();

    for entry in upstream {
        let producer = entry
            .algorithm
            .as_ref()
            .ok_or_else(|| ExecutionError::MalformedRequest {
                exec_id: exec_id.to_string(),
                reason: "upstream result without a producing algorithm".to_string(),
            })?;
        let value = entry
            .result
            .as_ref()
            .map(decode)
            .unwrap_or(DependencyValue::Empty);

        values.insert(AlgorithmRef::from(producer).full_name(), value);
    }

    Ok(values)
}

/// Drain the task set in completion order, handing each result to the caller.
async fn forward_results(
    exec_id: Arc<str>,
    mut tasks: JoinSet<CompletedAlgorithm>,
    tx: mpsc::Sender<CompletedAlgorithm>,
) {
    let started = Instant::now();
    let algorithm_count = tasks.len();
    let mut failed_count = 0;

    while let Some(joined) = tasks.join_next().await {
        let completed = match joined {
            Ok(completed) => completed,
            Err(e) => {
                // run_algorithm contains unit panics itself, so this is the task being torn down
                failed_count += 1;
                tracing::error!(exec_id = %exec_id, error = %e, "Algorithm task ended abnormally");
                continue;
            }
        };

        if !completed.succeeded() {
            failed_count += 1;
        }

        let full_name = completed.algorithm.full_name();
        if tx.send(completed).await.is_err() {
            ResultStreamClosed {
                exec_id: &exec_id,
                full_name: &full_name,
            }
            .log();
        }
    }

    BatchCompleted {
        exec_id: &exec_id,
        algorithm_count,
        failed_count,
        duration: started.elapsed(),
    }
    .log();
}

async fn run_algorithm(
    exec_id: Arc<str>,
    descriptor: Arc<AlgorithmDescriptor>,
    dependencies: Arc<DependencyValues>,
    workers: Arc<Semaphore>,
    unit_timeout: Option<Duration>,
) -> CompletedAlgorithm {
    let full_name = descriptor.full_name();
    let algorithm = descriptor.algorithm_ref().clone();

    let permit = match workers.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            let error = ExecutionError::Internal {
                message: format!("Failed to acquire worker for algorithm '{}': {}", full_name, e),
            };
            let detail = FailureDetail::message(error.to_string());
            return finish(&exec_id, algorithm, unhandled_failure(detail, unix_timestamp()), None);
        }
    };

    AlgorithmStarted {
        exec_id: &exec_id,
        full_name: &full_name,
    }
    .log();
    let started = Instant::now();

    let unit = descriptor.unit();
    let handle = tokio::task::spawn_blocking(move || {
        // Held until the unit returns, even if the caller stopped waiting
        let _permit = permit;
        unit.execute(&dependencies)
    });

    let joined = match unit_timeout {
        Some(limit) => match tokio::time::timeout(limit, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                let detail = FailureDetail::message(format!(
                    "Algorithm '{}' timed out after {:?}",
                    full_name, limit
                ));
                return finish(&exec_id, algorithm, unhandled_failure(detail, unix_timestamp()), None);
            }
        },
        None => handle.await,
    };

    let result = match joined {
        Ok(Ok(output)) => marshal(output),
        Ok(Err(error)) => unhandled_failure(FailureDetail::from_error(&error), unix_timestamp()),
        Err(join_error) => unhandled_failure(panic_detail(&full_name, join_error), unix_timestamp()),
    };

    finish(&exec_id, algorithm, result, Some(started.elapsed()))
}

fn finish(
    exec_id: &str,
    algorithm: AlgorithmRef,
    result: WireResult,
    duration: Option<Duration>,
) -> CompletedAlgorithm {
    let full_name = algorithm.full_name();

    match &result.result_data {
        Some(ResultData::Error(detail)) => AlgorithmFailed {
            exec_id,
            full_name: &full_name,
            reason: &detail.message,
        }
        .log(),
        _ => AlgorithmCompleted {
            exec_id,
            full_name: &full_name,
            duration: duration.unwrap_or_default(),
        }
        .log(),
    }

    CompletedAlgorithm { algorithm, result }
}

fn panic_detail(full_name: &str, error: JoinError) -> FailureDetail {
    if !error.is_panic() {
        return FailureDetail::message(format!("Algorithm '{}' was cancelled", full_name));
    }

    let payload = error.into_panic();
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    FailureDetail {
        message: format!("Algorithm '{}' panicked: {}", full_name, reason),
        trace: String::new(),
    }
}

impl Default for PartialDagExecutor {
    fn default() -> Self {
        Self::new(Arc::new(Registry::new()), DEFAULT_MAX_WORKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmSpec;
    use crate::marshal::{marshal_at, AlgorithmOutput};
    use crate::proto::orca_v1::Algorithm;
    use crate::traits::unit_fn;
    use tokio_stream::StreamExt;

    fn upstream(name: &str, result: Option<WireResult>) -> AlgorithmResult {
        AlgorithmResult {
            algorithm: Some(Algorithm {
                name: name.to_string(),
                version: "1.0.0".to_string(),
                window_type: None,
                dependencies: vec![],
            }),
            result,
        }
    }

    #[test]
    fn test_decode_upstream_indexes_by_full_name() {
        let values = decode_upstream(
            "exec-1",
            &[
                upstream("Loader", Some(marshal_at(AlgorithmOutput::Scalar(2.5), 0))),
                upstream("Features", None),
            ],
        )
        .unwrap();

        assert_eq!(values.get("Loader_1.0.0"), Some(&DependencyValue::Scalar(2.5)));
        assert_eq!(values.get("Features_1.0.0"), Some(&DependencyValue::Empty));
    }

    #[test]
    fn test_decode_upstream_requires_producer() {
        let error = decode_upstream(
            "exec-1",
            &[AlgorithmResult {
                algorithm: None,
                result: None,
            }],
        )
        .unwrap_err();

        assert!(error.is_invalid_request());
    }

    #[test]
    fn test_zero_workers_is_clamped() {
        let executor = PartialDagExecutor::new(Arc::new(Registry::new()), 0);
        assert_eq!(executor.max_workers(), 1);
    }

    #[tokio::test]
    async fn test_panic_payloads_become_messages() {
        let formatted = tokio::task::spawn_blocking(|| panic!("bad input {}", 7))
            .await
            .unwrap_err();
        let detail = panic_detail("Model_1.0.0", formatted);
        assert_eq!(detail.message, "Algorithm 'Model_1.0.0' panicked: bad input 7");

        let literal = tokio::task::spawn_blocking(|| panic!("empty window"))
            .await
            .unwrap_err();
        let detail = panic_detail("Model_1.0.0", literal);
        assert_eq!(detail.message, "Algorithm 'Model_1.0.0' panicked: empty window");
    }

    #[tokio::test]
    async fn test_closed_worker_pool_reports_internal_error() {
        let mut registry = Registry::new();
        registry
            .register(AlgorithmDescriptor::new(
                AlgorithmSpec::new("Known", "1.0.0", "WindowA", "1.0.0"),
                unit_fn(|_| Ok(AlgorithmOutput::Scalar(1.0))),
                "proc",
                "rustc",
            ))
            .unwrap();
        let executor = PartialDagExecutor::new(Arc::new(registry), 2);
        executor.workers.close();

        let results: Vec<_> = executor
            .execute("exec-3", vec![AlgorithmRef::new("Known", "1.0.0")], Vec::new())
            .unwrap()
            .collect()
            .await;

        assert_eq!(results.len(), 1);
        let result = &results[0].result;
        assert_eq!(result.status, ResultStatus::UnhandledFailed as i32);
        match &result.result_data {
            Some(ResultData::Error(detail)) => {
                assert!(detail.message.starts_with("Internal execution error:"), "{}", detail.message);
                assert!(detail.message.contains("Known_1.0.0"));
            }
            other => panic!("Expected error detail, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_rejects_unknown_algorithm() {
        let mut registry = Registry::new();
        registry
            .register(AlgorithmDescriptor::new(
                AlgorithmSpec::new("Known", "1.0.0", "WindowA", "1.0.0"),
                unit_fn(|_| Ok(AlgorithmOutput::Scalar(1.0))),
                "proc",
                "rustc",
            ))
            .unwrap();
        let executor = PartialDagExecutor::new(Arc::new(registry), 2);

        let error = executor
            .resolve(
                "exec-9",
                &[AlgorithmRef::new("Known", "1.0.0"), AlgorithmRef::new("Unknown", "1.0.0")],
            )
            .unwrap_err();

        assert_eq!(
            error,
            ExecutionError::UnknownAlgorithm {
                exec_id: "exec-9".to_string(),
                full_name: "Unknown_1.0.0".to_string(),
            }
        );
    }
}
