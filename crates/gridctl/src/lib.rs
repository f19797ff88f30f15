pub mod cli;
mod error;
mod reconciler;
mod report;

pub use error::ReconcileError;
pub use reconciler::Reconciler;
pub use report::{OutcomeRecord, OutcomeStatus, ReconcileReport};

pub use gridctl_config::{ClientConfig, ConfigError, ReconcileRequest, RunTarget};
pub use gridctl_registry::{
    HttpRegistryClient, MockRegistry, RegistryClient, RegistryError, RegistrySession, RunState,
};
