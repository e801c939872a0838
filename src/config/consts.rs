/// Name reported to the core when none is configured
pub const DEFAULT_PROCESSOR_NAME: &str = "rust_processor";
/// Runtime descriptor sent with the registration payload
pub const DEFAULT_RUNTIME: &str = concat!("rust/", env!("CARGO_PKG_VERSION"));
/// Interface the gRPC server binds to (all interfaces)
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
/// Host the core uses to reach this processor
pub const DEFAULT_ADVERTISE_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5377;
pub const DEFAULT_CORE_ADDRESS: &str = "http://localhost:5433";
/// Worker pool size shared by all batches
pub const DEFAULT_MAX_WORKERS: usize = 10;
/// gRPC send and receive limit (50 MiB)
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 50 * 1024 * 1024;

/// Address of the orchestration core
pub const ENV_CORE_ADDRESS: &str = "ORCA_CORE";
/// Port this processor listens on and advertises
pub const ENV_PORT: &str = "PROCESSOR_PORT";
/// Host this processor advertises to the core
pub const ENV_ADVERTISE_HOST: &str = "PROCESSOR_ADDRESS";
