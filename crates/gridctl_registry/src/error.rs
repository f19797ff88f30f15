use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("server {0} does not exist")]
    ServerNotFound(String),

    #[error("node {node} could not be reached: {reason}")]
    NodeUnreachable { node: String, reason: String },

    #[error("deployment error: {0}")]
    Deployment(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("call timed out: {0}")]
    Timeout(String),
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::ServerNotFound(_))
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(error: reqwest::Error) -> Self {
        RegistryError::Transport(error.to_string())
    }
}
