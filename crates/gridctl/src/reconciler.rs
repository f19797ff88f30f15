use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use gridctl_config::{ReconcileRequest, RunTarget};
use gridctl_registry::{RegistryClient, RegistryError, RegistrySession};
use tracing::{debug, info};

use crate::error::ReconcileError;
use crate::report::{OutcomeRecord, OutcomeStatus, ReconcileReport};

/// Drives the registry's servers toward the state described by a
/// [`ReconcileRequest`]: one admin session, then a sequential
/// enumerate / query / command pass over the targeted servers.
///
/// Reconciliation is best-effort and non-transactional: a failure on one
/// server never rolls back transitions already applied to another, and no
/// retries are attempted.
pub struct Reconciler<C: RegistryClient> {
    client: C,
}

/// Per-server outcome plus which axes actually moved, so the report's
/// per-axis lists stay accurate even when a later command on the same
/// server fails.
struct ServerOutcome {
    status: OutcomeStatus,
    enabled_set_to: Option<bool>,
    state_changed: bool,
}

impl<C: RegistryClient> Reconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Reconcile every targeted server and aggregate the outcomes.
    ///
    /// Fatal errors (configuration, session creation, enumeration) abort
    /// with no partial report. Per-server faults are isolated: they mark
    /// that server's record and set `failed`, and processing continues.
    pub async fn reconcile(
        &self,
        request: &ReconcileRequest,
    ) -> Result<ReconcileReport, ReconcileError> {
        let timeout = request.call_timeout();

        let session = bounded(
            timeout,
            self.client.create_session(request.username(), request.password()),
        )
        .await
        .map_err(|e| ReconcileError::Auth(e.to_string()))?;

        let known = bounded(timeout, session.server_ids())
            .await
            .map_err(ReconcileError::Enumerate)?;
        let known_set: HashSet<&str> = known.iter().map(String::as_str).collect();

        let explicit = !request.servers().is_empty();
        let targets: Vec<String> = if explicit {
            request.servers().to_vec()
        } else {
            known.clone()
        };
        debug!(
            targets = targets.len(),
            known = known.len(),
            "resolved reconcile targets"
        );

        let mut report = ReconcileReport::default();

        for id in &targets {
            if explicit && !known_set.contains(id.as_str()) {
                if request.skip_missing() {
                    debug!("server {} not in registry, skipping", id);
                    report
                        .results
                        .push(OutcomeRecord::new(id, OutcomeStatus::Skipped));
                } else {
                    report.failed = true;
                    report.results.push(OutcomeRecord::new(
                        id,
                        OutcomeStatus::Failed {
                            reason: format!("server {} does not exist", id),
                        },
                    ));
                }
                continue;
            }

            report.servers.push(id.clone());
            let outcome = reconcile_one(&session, request, id).await;

            if let Some(enabled) = outcome.enabled_set_to {
                if enabled {
                    report.enabled.push(id.clone());
                } else {
                    report.disabled.push(id.clone());
                }
            }
            if outcome.state_changed {
                report.state_changed.push(id.clone());
            }
            if outcome.enabled_set_to.is_some() || outcome.state_changed {
                report.changed = true;
            }
            if matches!(outcome.status, OutcomeStatus::Failed { .. }) {
                report.failed = true;
            }

            report.results.push(OutcomeRecord::new(id, outcome.status));
        }

        info!(
            changed = report.changed,
            failed = report.failed,
            servers = report.servers.len(),
            "reconcile finished"
        );
        Ok(report)
    }
}

async fn reconcile_one<S: RegistrySession>(
    session: &S,
    request: &ReconcileRequest,
    id: &str,
) -> ServerOutcome {
    let timeout = request.call_timeout();
    let mut enabled_set_to = None;
    let mut state_changed = false;

    // Enabled axis first, then run state, matching registry admin
    // conventions. Each axis acts only when the snapshot differs from the
    // target.
    if let Some(want) = request.enabled() {
        match bounded(timeout, session.server_enabled(id)).await {
            Ok(current) if current == want => {}
            Ok(_) => match bounded(timeout, session.enable_server(id, want)).await {
                Ok(()) => enabled_set_to = Some(want),
                Err(e) => return faulted(request, id, e, enabled_set_to, state_changed),
            },
            Err(e) => return faulted(request, id, e, enabled_set_to, state_changed),
        }
    }

    if let Some(target) = request.state() {
        let current = match bounded(timeout, session.server_state(id)).await {
            Ok(state) => state,
            Err(e) => return faulted(request, id, e, enabled_set_to, state_changed),
        };
        let satisfied = match target {
            RunTarget::Started => current.is_started(),
            RunTarget::Stopped => current.is_stopped(),
        };
        if !satisfied {
            let command = match target {
                RunTarget::Started => bounded(timeout, session.start_server(id)).await,
                RunTarget::Stopped => bounded(timeout, session.stop_server(id)).await,
            };
            match command {
                Ok(()) => state_changed = true,
                Err(e) => return faulted(request, id, e, enabled_set_to, state_changed),
            }
        }
    }

    let status = if enabled_set_to.is_some() || state_changed {
        OutcomeStatus::Transitioned
    } else {
        OutcomeStatus::Unchanged
    };
    ServerOutcome {
        status,
        enabled_set_to,
        state_changed,
    }
}

/// Classify a per-server fault. `skip_missing` only ever demotes a
/// missing-server error; every other fault stays a failure.
fn faulted(
    request: &ReconcileRequest,
    id: &str,
    error: RegistryError,
    enabled_set_to: Option<bool>,
    state_changed: bool,
) -> ServerOutcome {
    let status = if error.is_not_found() && request.skip_missing() {
        debug!("server {} vanished from registry, skipping", id);
        OutcomeStatus::Skipped
    } else {
        OutcomeStatus::Failed {
            reason: error.to_string(),
        }
    };
    ServerOutcome {
        status,
        enabled_set_to,
        state_changed,
    }
}

async fn bounded<T, F>(limit: Duration, future: F) -> Result<T, RegistryError>
where
    F: Future<Output = Result<T, RegistryError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(RegistryError::Timeout(format!(
            "no reply within {}s",
            limit.as_secs()
        ))),
    }
}
