use async_trait::async_trait;

use crate::error::RegistryError;
use crate::state::RunState;

/// An authenticated admin session against a registry.
///
/// The underlying connection is released when the session is dropped;
/// implementations with an explicit server-side session additionally expose
/// their own close call.
#[async_trait]
pub trait RegistrySession: Send + Sync {
    /// Every server id the registry currently knows.
    async fn server_ids(&self) -> Result<Vec<String>, RegistryError>;

    async fn server_state(&self, id: &str) -> Result<RunState, RegistryError>;

    async fn server_enabled(&self, id: &str) -> Result<bool, RegistryError>;

    async fn start_server(&self, id: &str) -> Result<(), RegistryError>;

    async fn stop_server(&self, id: &str) -> Result<(), RegistryError>;

    async fn enable_server(&self, id: &str, enabled: bool) -> Result<(), RegistryError>;
}

/// Entry point to a registry's admin interface.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    type Session: RegistrySession;

    /// Authenticate and open an admin session. A rejected login surfaces as
    /// [`RegistryError::PermissionDenied`].
    async fn create_session(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Self::Session, RegistryError>;
}
