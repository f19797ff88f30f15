use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::client::{RegistryClient, RegistrySession};
use crate::error::RegistryError;
use crate::state::RunState;

/// Client for a registry's admin REST gateway. The locator is the gateway
/// base URL.
#[derive(Debug, Clone)]
pub struct HttpRegistryClient {
    client: Client,
    base_url: String,
}

impl HttpRegistryClient {
    pub fn new(locator: &str) -> Self {
        HttpRegistryClient {
            client: Client::new(),
            base_url: locator.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct SessionResponse {
    token: String,
}

#[derive(Deserialize)]
struct ServerResponse {
    #[allow(dead_code)]
    id: String,
    state: String,
    enabled: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    node: Option<String>,
    reason: Option<String>,
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    type Session = HttpRegistrySession;

    async fn create_session(
        &self,
        username: &str,
        password: &str,
    ) -> Result<HttpRegistrySession, RegistryError> {
        let url = format!("{}/admin/sessions", self.base_url);
        debug!("Creating admin session at {}", url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({"username": username, "password": password}))
            .send()
            .await
            .map_err(|e| RegistryError::Transport(format!("Failed to create session: {}", e)))?;

        if response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::FORBIDDEN
        {
            return Err(RegistryError::PermissionDenied(
                "Please verify username and password".to_string(),
            ));
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RegistryError::Transport(format!(
                "Session error ({}): {}",
                status, text
            )));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::Transport(format!("Failed to parse response: {}", e)))?;

        Ok(HttpRegistrySession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: session.token,
        })
    }
}

/// An authenticated session against the admin gateway. The server-side
/// session token expires on its own; `close` releases it eagerly.
#[derive(Debug, Clone)]
pub struct HttpRegistrySession {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpRegistrySession {
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub async fn close(self) -> Result<(), RegistryError> {
        let url = format!("{}/admin/sessions", self.base_url);
        self.client
            .delete(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| RegistryError::Transport(format!("Failed to close session: {}", e)))?;
        Ok(())
    }

    async fn into_registry_error(response: Response, id: &str) -> RegistryError {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return RegistryError::ServerNotFound(id.to_string());
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return RegistryError::PermissionDenied(format!(
                "Session rejected for server {}",
                id
            ));
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => match body.error.as_str() {
                "node-unreachable" => RegistryError::NodeUnreachable {
                    node: body.node.unwrap_or_else(|| "unknown".to_string()),
                    reason: body.reason.unwrap_or_default(),
                },
                "deployment" => RegistryError::Deployment(body.reason.unwrap_or(body.error)),
                _ => RegistryError::Transport(format!("Registry error ({}): {}", status, text)),
            },
            Err(_) => RegistryError::Transport(format!("Registry error ({}): {}", status, text)),
        }
    }

    async fn get(&self, url: &str, id: &str) -> Result<Response, RegistryError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| RegistryError::Transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::into_registry_error(response, id).await);
        }
        Ok(response)
    }

    async fn post(
        &self,
        url: &str,
        id: &str,
        body: Option<serde_json::Value>,
    ) -> Result<(), RegistryError> {
        let mut request = self
            .client
            .post(url)
            .header("Authorization", self.auth_header());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RegistryError::Transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::into_registry_error(response, id).await);
        }
        Ok(())
    }

    async fn server(&self, id: &str) -> Result<ServerResponse, RegistryError> {
        let url = format!("{}/admin/servers/{}", self.base_url, id);
        let response = self.get(&url, id).await?;
        response
            .json()
            .await
            .map_err(|e| RegistryError::Transport(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl RegistrySession for HttpRegistrySession {
    async fn server_ids(&self) -> Result<Vec<String>, RegistryError> {
        let url = format!("{}/admin/servers", self.base_url);
        let response = self.get(&url, "").await?;
        response
            .json()
            .await
            .map_err(|e| RegistryError::Transport(format!("Failed to parse response: {}", e)))
    }

    async fn server_state(&self, id: &str) -> Result<RunState, RegistryError> {
        let server = self.server(id).await?;
        Ok(RunState::from(server.state.as_str()))
    }

    async fn server_enabled(&self, id: &str) -> Result<bool, RegistryError> {
        let server = self.server(id).await?;
        Ok(server.enabled)
    }

    async fn start_server(&self, id: &str) -> Result<(), RegistryError> {
        debug!("Starting server: {}", id);
        let url = format!("{}/admin/servers/{}/start", self.base_url, id);
        self.post(&url, id, None).await
    }

    async fn stop_server(&self, id: &str) -> Result<(), RegistryError> {
        debug!("Stopping server: {}", id);
        let url = format!("{}/admin/servers/{}/stop", self.base_url, id);
        self.post(&url, id, None).await
    }

    async fn enable_server(&self, id: &str, enabled: bool) -> Result<(), RegistryError> {
        debug!("Setting server {} enabled to {}", id, enabled);
        let url = format!("{}/admin/servers/{}/enabled", self.base_url, id);
        self.post(&url, id, Some(serde_json::json!({"enabled": enabled})))
            .await
    }
}
