use gridctl::{
    ConfigError, MockRegistry, OutcomeStatus, ReconcileError, ReconcileRequest, Reconciler,
    RunState, RunTarget,
};
use gridctl_registry::MockFault;

fn request() -> gridctl_config::ReconcileRequestBuilder {
    ReconcileRequest::builder()
        .locator("https://grid.example:4061")
        .username("admin")
        .password("hunter2")
}

fn grid() -> MockRegistry {
    MockRegistry::new()
        .with_server("SimpleServer", RunState::Active, true)
        .with_server("IceBox", RunState::Inactive, true)
        .with_server("Glacier", RunState::Inactive, false)
}

#[tokio::test]
async fn empty_server_list_targets_the_whole_enumeration() {
    let registry = grid();
    let reconciler = Reconciler::new(registry.clone());

    let req = request().state(RunTarget::Started).build().unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();

    assert_eq!(report.servers, vec!["SimpleServer", "IceBox", "Glacier"]);
    assert_eq!(report.results.len(), 3);
    assert!(report.changed);
    assert!(!report.failed);
    assert_eq!(report.state_changed, vec!["IceBox", "Glacier"]);
    assert_eq!(registry.snapshot("IceBox").unwrap().state, RunState::Active);
}

#[tokio::test]
async fn second_identical_reconcile_reports_no_change() {
    let registry = grid();
    let reconciler = Reconciler::new(registry.clone());
    let req = request().state(RunTarget::Started).build().unwrap();

    let first = reconciler.reconcile(&req).await.unwrap();
    assert!(first.changed);

    let second = reconciler.reconcile(&req).await.unwrap();
    assert!(!second.changed);
    assert!(!second.failed);
    assert!(second
        .results
        .iter()
        .all(|r| r.status == OutcomeStatus::Unchanged));
}

#[tokio::test]
async fn skip_demotes_missing_servers_to_noops() {
    let registry = MockRegistry::new().with_server("SimpleServer", RunState::Active, true);
    let reconciler = Reconciler::new(registry.clone());

    let req = request()
        .state(RunTarget::Stopped)
        .servers(["SimpleServer", "DoesNotExistServer"])
        .skip_missing(true)
        .build()
        .unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();

    assert!(report.changed);
    assert!(!report.failed);
    assert_eq!(report.results.len(), 2);
    assert_eq!(
        report.record_for("SimpleServer").unwrap().status,
        OutcomeStatus::Transitioned
    );
    assert_eq!(
        report.record_for("DoesNotExistServer").unwrap().status,
        OutcomeStatus::Skipped
    );
    assert_eq!(
        registry.snapshot("SimpleServer").unwrap().state,
        RunState::Inactive
    );
}

#[tokio::test]
async fn missing_servers_fail_without_skip() {
    let registry = MockRegistry::new().with_server("SimpleServer", RunState::Active, true);
    let reconciler = Reconciler::new(registry);

    let req = request()
        .state(RunTarget::Stopped)
        .servers(["SimpleServer", "DoesNotExistServer"])
        .build()
        .unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();

    assert!(report.failed);
    assert!(report.changed);
    assert!(matches!(
        report.record_for("DoesNotExistServer").unwrap().status,
        OutcomeStatus::Failed { .. }
    ));
    // The real server is still processed.
    assert_eq!(
        report.record_for("SimpleServer").unwrap().status,
        OutcomeStatus::Transitioned
    );
}

#[tokio::test]
async fn enable_axis_is_idempotent_per_call() {
    let registry = MockRegistry::new().with_server("SimpleServer", RunState::Active, true);
    let reconciler = Reconciler::new(registry.clone());

    let disable = request().enabled(false).build().unwrap();
    let report = reconciler.reconcile(&disable).await.unwrap();
    assert!(report.changed);
    assert_eq!(report.disabled, vec!["SimpleServer"]);
    assert!(!registry.snapshot("SimpleServer").unwrap().enabled);

    let report = reconciler.reconcile(&disable).await.unwrap();
    assert!(!report.changed);
    assert!(report.disabled.is_empty());

    // Starting from disabled, enabling alone is a change.
    let enable = request().enabled(true).build().unwrap();
    let report = reconciler.reconcile(&enable).await.unwrap();
    assert!(report.changed);
    assert_eq!(report.enabled, vec!["SimpleServer"]);
}

#[tokio::test]
async fn both_axes_can_move_in_one_invocation() {
    let registry = MockRegistry::new().with_server("Glacier", RunState::Inactive, false);
    let reconciler = Reconciler::new(registry.clone());

    let req = request()
        .state(RunTarget::Started)
        .enabled(true)
        .build()
        .unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();

    assert!(report.changed);
    assert_eq!(report.enabled, vec!["Glacier"]);
    assert_eq!(report.state_changed, vec!["Glacier"]);
    assert_eq!(
        report.record_for("Glacier").unwrap().status,
        OutcomeStatus::Transitioned
    );
    let snapshot = registry.snapshot("Glacier").unwrap();
    assert_eq!(snapshot.state, RunState::Active);
    assert!(snapshot.enabled);
}

#[tokio::test]
async fn missing_locator_fails_before_any_registry_contact() {
    let registry = MockRegistry::new().with_server("SimpleServer", RunState::Active, true);

    let err = ReconcileRequest::builder()
        .state(RunTarget::Stopped)
        .username("admin")
        .password("hunter2")
        .build()
        .unwrap_err();

    assert!(matches!(err, ConfigError::MissingLocator));
    assert_eq!(registry.call_count(), 0);
}

#[tokio::test]
async fn skip_never_suppresses_other_faults() {
    let registry = grid();
    registry.inject_fault("IceBox", MockFault::NodeUnreachable);
    let reconciler = Reconciler::new(registry);

    let req = request()
        .state(RunTarget::Started)
        .skip_missing(true)
        .build()
        .unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();

    assert!(report.failed);
    match &report.record_for("IceBox").unwrap().status {
        OutcomeStatus::Failed { reason } => assert!(reason.contains("could not be reached")),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn faults_are_isolated_per_server() {
    let registry = grid();
    registry.inject_fault("IceBox", MockFault::Deployment);
    let reconciler = Reconciler::new(registry.clone());

    let req = request().state(RunTarget::Started).build().unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();

    assert!(report.failed);
    // The fault on IceBox does not stop Glacier from being started.
    assert_eq!(
        report.record_for("Glacier").unwrap().status,
        OutcomeStatus::Transitioned
    );
    assert_eq!(registry.snapshot("Glacier").unwrap().state, RunState::Active);
    assert!(report.changed);
}

#[tokio::test]
async fn denied_session_aborts_the_whole_invocation() {
    let registry = grid();
    registry.deny_sessions();
    let reconciler = Reconciler::new(registry.clone());

    let req = request().state(RunTarget::Stopped).build().unwrap();
    let err = reconciler.reconcile(&req).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Auth(_)));
    // Only the session attempt reached the registry.
    assert_eq!(registry.call_count(), 1);
    assert_eq!(
        registry.snapshot("SimpleServer").unwrap().state,
        RunState::Active
    );
}

#[tokio::test]
async fn timeouts_surface_as_failed_outcomes() {
    let registry = grid();
    registry.inject_fault("SimpleServer", MockFault::Timeout);
    let reconciler = Reconciler::new(registry);

    let req = request()
        .state(RunTarget::Stopped)
        .servers(["SimpleServer"])
        .skip_missing(true)
        .build()
        .unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();

    assert!(report.failed);
    assert!(!report.changed);
    assert!(matches!(
        report.record_for("SimpleServer").unwrap().status,
        OutcomeStatus::Failed { .. }
    ));
}

#[tokio::test]
async fn transitional_states_count_as_already_satisfied() {
    let registry = MockRegistry::new()
        .with_server("Warming", RunState::Activating, true)
        .with_server("Cooling", RunState::Deactivating, true);
    let reconciler = Reconciler::new(registry);

    let req = request()
        .state(RunTarget::Started)
        .servers(["Warming"])
        .build()
        .unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();
    assert!(!report.changed);
    assert_eq!(
        report.record_for("Warming").unwrap().status,
        OutcomeStatus::Unchanged
    );

    let req = request()
        .state(RunTarget::Stopped)
        .servers(["Cooling"])
        .build()
        .unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();
    assert!(!report.changed);
    assert_eq!(
        report.record_for("Cooling").unwrap().status,
        OutcomeStatus::Unchanged
    );
}

#[tokio::test]
async fn report_serializes_the_caller_facing_shape() {
    let registry = MockRegistry::new().with_server("SimpleServer", RunState::Active, true);
    let reconciler = Reconciler::new(registry);

    let req = request()
        .state(RunTarget::Stopped)
        .servers(["SimpleServer", "DoesNotExistServer"])
        .skip_missing(true)
        .build()
        .unwrap();
    let report = reconciler.reconcile(&req).await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["changed"], serde_json::json!(true));
    assert_eq!(json["failed"], serde_json::json!(false));
    assert_eq!(
        json["results"],
        serde_json::json!([
            {"server": "SimpleServer", "status": "transitioned"},
            {"server": "DoesNotExistServer", "status": "skipped"}
        ])
    );
    assert_eq!(json["state_changed"], serde_json::json!(["SimpleServer"]));
}
