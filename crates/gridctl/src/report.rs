use serde::Serialize;

/// What happened to one targeted server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Already in the desired state on every requested axis.
    Unchanged,
    /// At least one lifecycle command was issued and succeeded.
    Transitioned,
    /// Not known to the registry, demoted to a no-op by `skip`.
    Skipped,
    /// A command or query failed; `reason` carries the registry's message.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeRecord {
    pub server: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl OutcomeRecord {
    pub(crate) fn new(server: impl Into<String>, status: OutcomeStatus) -> Self {
        OutcomeRecord {
            server: server.into(),
            status,
        }
    }
}

/// Aggregate result of one reconcile invocation. Immutable once returned.
///
/// `servers` lists the servers actually acted on; `enabled`, `disabled` and
/// `state_changed` list the servers whose respective axis was transitioned
/// during this invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub changed: bool,
    pub failed: bool,
    pub results: Vec<OutcomeRecord>,
    pub servers: Vec<String>,
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
    pub state_changed: Vec<String>,
}

impl ReconcileReport {
    pub fn record_for(&self, server: &str) -> Option<&OutcomeRecord> {
        self.results.iter().find(|r| r.server == server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_serialize_flat() {
        let record = OutcomeRecord::new("s1", OutcomeStatus::Transitioned);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"server": "s1", "status": "transitioned"})
        );
    }

    #[test]
    fn failed_records_carry_the_reason() {
        let record = OutcomeRecord::new(
            "s1",
            OutcomeStatus::Failed {
                reason: "node down".to_string(),
            },
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"server": "s1", "status": "failed", "reason": "node down"})
        );
    }
}
