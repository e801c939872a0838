use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::proto::orca_v1::{ProcessorRegistration, Window};

/// Calls this processor makes into the orchestration engine.
#[async_trait]
pub trait CoreClient: Send + Sync {
    /// Publish the processor and its supported algorithms.
    async fn register_processor(&self, registration: ProcessorRegistration) -> Result<(), ServiceError>;

    /// Announce a data window so the engine can trigger the algorithms bound to it.
    async fn emit_window(&self, window: Window) -> Result<(), ServiceError>;
}
