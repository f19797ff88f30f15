use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::client::{RegistryClient, RegistrySession};
use crate::error::RegistryError;
use crate::state::{RunState, ServerSnapshot};

/// Fault a [`MockRegistry`] raises for a given server instead of answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFault {
    NodeUnreachable,
    Deployment,
    Transport,
    Timeout,
}

impl MockFault {
    fn to_error(self, id: &str) -> RegistryError {
        match self {
            MockFault::NodeUnreachable => RegistryError::NodeUnreachable {
                node: format!("node-of-{}", id),
                reason: "injected fault".to_string(),
            },
            MockFault::Deployment => {
                RegistryError::Deployment(format!("injected fault for {}", id))
            }
            MockFault::Transport => {
                RegistryError::Transport(format!("injected fault for {}", id))
            }
            MockFault::Timeout => RegistryError::Timeout(format!("injected fault for {}", id)),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    // Server ids in registration order.
    order: Vec<String>,
    servers: HashMap<String, ServerSnapshot>,
    faults: HashMap<String, MockFault>,
}

/// In-memory registry double. Acts as its own session: sessions are cheap
/// clones sharing the same state.
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    state: Arc<RwLock<MockState>>,
    deny_sessions: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(self, id: &str, state: RunState, enabled: bool) -> Self {
        {
            let mut inner = self.state.write().unwrap();
            inner.order.push(id.to_string());
            inner.servers.insert(
                id.to_string(),
                ServerSnapshot {
                    id: id.to_string(),
                    state,
                    enabled,
                },
            );
        }
        self
    }

    pub fn set_state(&self, id: &str, state: RunState) {
        let mut inner = self.state.write().unwrap();
        if let Some(server) = inner.servers.get_mut(id) {
            server.state = state;
        }
    }

    pub fn set_enabled(&self, id: &str, enabled: bool) {
        let mut inner = self.state.write().unwrap();
        if let Some(server) = inner.servers.get_mut(id) {
            server.enabled = enabled;
        }
    }

    /// Make every query and command against `id` raise the given fault.
    pub fn inject_fault(&self, id: &str, fault: MockFault) {
        let mut inner = self.state.write().unwrap();
        inner.faults.insert(id.to_string(), fault);
    }

    /// Reject all subsequent session creations.
    pub fn deny_sessions(&self) {
        self.deny_sessions.store(true, Ordering::SeqCst);
    }

    /// Total admin calls observed, session creations included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self, id: &str) -> Option<ServerSnapshot> {
        let inner = self.state.read().unwrap();
        inner.servers.get(id).cloned()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check_fault(&self, id: &str) -> Result<(), RegistryError> {
        let inner = self.state.read().unwrap();
        match inner.faults.get(id) {
            Some(fault) => Err(fault.to_error(id)),
            None => Ok(()),
        }
    }

    fn lookup(&self, id: &str) -> Result<ServerSnapshot, RegistryError> {
        self.check_fault(id)?;
        let inner = self.state.read().unwrap();
        inner
            .servers
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::ServerNotFound(id.to_string()))
    }
}

#[async_trait]
impl RegistryClient for MockRegistry {
    type Session = MockRegistry;

    async fn create_session(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<MockRegistry, RegistryError> {
        self.record_call();
        if self.deny_sessions.load(Ordering::SeqCst) {
            return Err(RegistryError::PermissionDenied(
                "Please verify username and password".to_string(),
            ));
        }
        Ok(self.clone())
    }
}

#[async_trait]
impl RegistrySession for MockRegistry {
    async fn server_ids(&self) -> Result<Vec<String>, RegistryError> {
        self.record_call();
        let inner = self.state.read().unwrap();
        Ok(inner.order.clone())
    }

    async fn server_state(&self, id: &str) -> Result<RunState, RegistryError> {
        self.record_call();
        Ok(self.lookup(id)?.state)
    }

    async fn server_enabled(&self, id: &str) -> Result<bool, RegistryError> {
        self.record_call();
        Ok(self.lookup(id)?.enabled)
    }

    async fn start_server(&self, id: &str) -> Result<(), RegistryError> {
        self.record_call();
        self.lookup(id)?;
        self.set_state(id, RunState::Active);
        Ok(())
    }

    async fn stop_server(&self, id: &str) -> Result<(), RegistryError> {
        self.record_call();
        self.lookup(id)?;
        self.set_state(id, RunState::Inactive);
        Ok(())
    }

    async fn enable_server(&self, id: &str, enabled: bool) -> Result<(), RegistryError> {
        self.record_call();
        self.lookup(id)?;
        self.set_enabled(id, enabled);
        Ok(())
    }
}
