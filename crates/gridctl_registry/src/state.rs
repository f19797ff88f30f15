use serde::{Deserialize, Serialize};

/// Run state of a server as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    Inactive,
    Activating,
    ActivationTimedOut,
    Active,
    Deactivating,
    Destroying,
    Destroyed,
    Unknown,
}

impl From<&str> for RunState {
    fn from(state: &str) -> Self {
        match state.to_lowercase().as_str() {
            "inactive" => RunState::Inactive,
            "activating" => RunState::Activating,
            "activation-timed-out" => RunState::ActivationTimedOut,
            "active" => RunState::Active,
            "deactivating" => RunState::Deactivating,
            "destroying" => RunState::Destroying,
            "destroyed" => RunState::Destroyed,
            _ => RunState::Unknown,
        }
    }
}

impl RunState {
    /// States that satisfy a `started` target without any command.
    pub fn is_started(self) -> bool {
        matches!(self, RunState::Active | RunState::Activating)
    }

    /// States that satisfy a `stopped` target without any command.
    pub fn is_stopped(self) -> bool {
        matches!(
            self,
            RunState::Inactive | RunState::Deactivating | RunState::Destroying
        )
    }
}

/// Point-in-time view of one server, as queried before acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSnapshot {
    pub id: String,
    pub state: RunState,
    pub enabled: bool,
}
