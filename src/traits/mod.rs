pub mod core_client;
pub mod execution_unit;

pub use core_client::CoreClient;
pub use execution_unit::{unit_fn, ExecutionUnit};
