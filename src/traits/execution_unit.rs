use crate::marshal::{AlgorithmOutput, DependencyValues};

/// Business logic of one registered algorithm.
///
/// Units are plain synchronous code: the executor runs them on the blocking
/// pool and never expects them to yield. Every unit in a batch receives the
/// same dependency map and reads only the keys it needs.
pub trait ExecutionUnit: Send + Sync {
    fn execute(&self, dependencies: &DependencyValues) -> anyhow::Result<AlgorithmOutput>;
}

impl<F> ExecutionUnit for F
where
    F: Fn(&DependencyValues) -> anyhow::Result<AlgorithmOutput> + Send + Sync,
{
    fn execute(&self, dependencies: &DependencyValues) -> anyhow::Result<AlgorithmOutput> {
        self(dependencies)
    }
}

/// Wrap a closure as a shareable execution unit.
///
/// Passing the closure through this bound lets the compiler infer its
/// argument and return types, so callers can write `unit_fn(|deps| ...)`.
pub fn unit_fn<F>(f: F) -> std::sync::Arc<dyn ExecutionUnit>
where
    F: Fn(&DependencyValues) -> anyhow::Result<AlgorithmOutput> + Send + Sync + 'static,
{
    std::sync::Arc::new(f)
}
