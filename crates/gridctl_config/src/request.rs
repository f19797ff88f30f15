use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client_file::ClientConfig;
use crate::error::ConfigError;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Target run state for the servers named by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunTarget {
    Started,
    Stopped,
}

/// A validated, immutable description of the state the caller wants the
/// registry's servers to be in.
///
/// The run-state and enabled-state axes are independent: a request may set
/// either or both, but never neither. A usable locator is guaranteed to be
/// present once a request has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileRequest {
    state: Option<RunTarget>,
    enabled: Option<bool>,
    servers: Vec<String>,
    skip_missing: bool,
    locator: String,
    username: String,
    password: String,
    call_timeout: Duration,
}

impl ReconcileRequest {
    pub fn builder() -> ReconcileRequestBuilder {
        ReconcileRequestBuilder::default()
    }

    pub fn state(&self) -> Option<RunTarget> {
        self.state
    }

    pub fn enabled(&self) -> Option<bool> {
        self.enabled
    }

    /// Explicit target servers. Empty means every server the registry knows.
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    pub fn skip_missing(&self) -> bool {
        self.skip_missing
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileRequestBuilder {
    state: Option<RunTarget>,
    enabled: Option<bool>,
    servers: Vec<String>,
    skip_missing: bool,
    locator: Option<String>,
    config: Option<PathBuf>,
    username: Option<String>,
    password: Option<String>,
    call_timeout: Option<Duration>,
}

impl ReconcileRequestBuilder {
    pub fn state(mut self, state: RunTarget) -> Self {
        self.state = Some(state);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers = servers.into_iter().map(Into::into).collect();
        self
    }

    pub fn skip_missing(mut self, skip: bool) -> Self {
        self.skip_missing = skip;
        self
    }

    pub fn locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    /// Path to a client configuration file supplying the locator and,
    /// optionally, credentials. Explicit builder values win over the file.
    pub fn config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Validates the option set and resolves the locator and credentials,
    /// reading the client configuration file when one was given. All
    /// validation happens here, before any registry contact.
    pub fn build(self) -> Result<ReconcileRequest, ConfigError> {
        if self.state.is_none() && self.enabled.is_none() {
            return Err(ConfigError::MissingAction);
        }

        let file = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };

        let locator = self
            .locator
            .or(file.locator)
            .ok_or(ConfigError::MissingLocator)?;

        let username = self.username.or(file.username);
        let password = self.password.or(file.password);
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) => (u, p),
            _ => return Err(ConfigError::MissingCredentials),
        };

        Ok(ReconcileRequest {
            state: self.state,
            enabled: self.enabled,
            servers: self.servers,
            skip_missing: self.skip_missing,
            locator,
            username,
            password,
            call_timeout: self.call_timeout.unwrap_or(DEFAULT_CALL_TIMEOUT),
        })
    }
}
