use gridctl_config::ConfigError;
use gridctl_registry::RegistryError;
use thiserror::Error;

/// Fatal errors: nothing was reconciled and no partial report exists.
/// Per-server faults never surface here; they land in the report.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open admin session: {0}")]
    Auth(String),

    #[error("failed to enumerate servers: {0}")]
    Enumerate(#[source] RegistryError),
}
