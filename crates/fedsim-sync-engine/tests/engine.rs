//! End-to-end engine tests against the mock gateway.
//!
//! Each test scripts backend responses per endpoint; the final queued
//! response of an endpoint is sticky, so poll loops keep receiving it.

use std::time::Duration;

use serde_json::json;

use fedsim_sync_engine::{
    ControlState, DatasetPreview, EngineConfig, GatewayError, HistoryRecord, LedgerEntry,
    LinkState, MockGateway, Poller, RunStatus, SyncEngine,
};

fn engine_with(gateway: &MockGateway) -> SyncEngine<MockGateway> {
    SyncEngine::new(gateway.clone(), EngineConfig::default())
}

fn ledger_entry(id: u64, client: &str) -> LedgerEntry {
    LedgerEntry {
        id,
        client: client.to_string(),
        ..Default::default()
    }
}

fn history_record(round_id: u64, accuracy: f64) -> HistoryRecord {
    HistoryRecord {
        round_id,
        accuracy,
        timestamp: String::new(),
    }
}

fn conflict() -> GatewayError {
    GatewayError::Backend {
        status: 400,
        message: "Simulation already running".to_string(),
    }
}

#[tokio::test]
async fn test_poll_tick_reconciles_status_and_ledger() {
    let gateway = MockGateway::new();
    gateway.push_status(Ok(json!({
        "status": "RUNNING",
        "metrics": {"rounds": [1, 2, 3], "loss": [0.9, 0.5, 0.2]},
        "logs": ["round1 done", "round2 done"]
    })));
    gateway.push_ledger(Ok(vec![
        ledger_entry(2, "client_2"),
        ledger_entry(1, "client_1"),
    ]));

    let engine = engine_with(&gateway);
    engine.poll_tick().await;

    let view = engine.snapshot();
    assert_eq!(view.status.status, RunStatus::Running);
    assert_eq!(view.control, ControlState::Running);
    assert_eq!(view.link, LinkState::Connected);

    let chart: Vec<(u64, Option<f64>)> = view.chart.iter().map(|p| (p.round, p.loss)).collect();
    assert_eq!(chart, vec![(1, Some(0.9)), (2, Some(0.5)), (3, Some(0.2))]);

    let displayed: Vec<&str> = view.logs_newest_first().collect();
    assert_eq!(displayed, vec!["round2 done", "round1 done"]);

    assert_eq!(view.ledger.len(), 2);
    assert_eq!(view.ledger[0].id, 2);
}

#[tokio::test]
async fn test_transport_failure_keeps_stale_snapshot() {
    let gateway = MockGateway::new();
    gateway.push_status(Ok(json!({
        "status": "RUNNING",
        "metrics": {"rounds": [1], "loss": [0.9]}
    })));
    gateway.push_status(Err(GatewayError::Transport(
        "connection refused".to_string(),
    )));
    gateway.push_status(Ok(json!({"status": "RUNNING"})));
    gateway.push_ledger(Ok(vec![]));

    let engine = engine_with(&gateway);
    engine.poll_tick().await;
    assert_eq!(engine.snapshot().link, LinkState::Connected);

    // The failed poll retains everything except the link badge.
    engine.poll_tick().await;
    let view = engine.snapshot();
    assert_eq!(view.link, LinkState::Offline);
    assert_eq!(view.status.status, RunStatus::Running);
    assert_eq!(view.chart.len(), 1);

    // The next successful poll recovers the link.
    engine.poll_tick().await;
    assert_eq!(engine.snapshot().link, LinkState::Connected);
}

#[tokio::test]
async fn test_start_conflict_lands_in_running() {
    let gateway = MockGateway::new();
    gateway.push_start(Err(conflict()));
    gateway.push_status(Ok(json!({"status": "RUNNING"})));
    gateway.push_ledger(Ok(vec![]));

    let engine = engine_with(&gateway);
    engine.request_start().await;

    let view = engine.snapshot();
    assert_eq!(view.control, ControlState::Running);
    assert_eq!(view.command_error, None);
    assert_eq!(gateway.start_calls(), 1);
    // The conflict still counts as success, so the refresh happened.
    assert_eq!(gateway.status_calls(), 1);
}

#[tokio::test]
async fn test_start_failure_surfaces_message_and_allows_retry() {
    let gateway = MockGateway::new();
    gateway.push_start(Err(GatewayError::Backend {
        status: 500,
        message: "db password rejected".to_string(),
    }));
    gateway.push_start(Ok(()));
    // The post-command refresh keeps reporting IDLE until the run spins up.
    gateway.push_status(Ok(json!({"status": "IDLE"})));
    gateway.push_ledger(Ok(vec![]));
    gateway.push_history(Ok(vec![]));

    let engine = engine_with(&gateway);
    engine.request_start().await;

    let view = engine.snapshot();
    assert_eq!(view.control, ControlState::Error);
    assert_eq!(view.command_error.as_deref(), Some("db password rejected"));
    assert!(view.can_start());
    // A failed command changed nothing backend-side: no refresh.
    assert_eq!(gateway.status_calls(), 0);

    // Retrying from Error succeeds and clears the message; the refresh then
    // reconciles to whatever the backend reports.
    engine.request_start().await;
    let view = engine.snapshot();
    assert_eq!(view.command_error, None);
    assert_eq!(view.control, ControlState::Idle);
    assert_eq!(gateway.start_calls(), 2);
}

#[tokio::test]
async fn test_failed_stop_then_authoritative_idle_poll() {
    let gateway = MockGateway::new();
    gateway.push_status(Ok(json!({"status": "RUNNING"})));
    gateway.push_status(Ok(json!({"status": "IDLE"})));
    gateway.push_ledger(Ok(vec![]));
    gateway.push_stop(Err(GatewayError::Transport("timeout".to_string())));
    gateway.push_history(Ok(vec![]));

    let engine = engine_with(&gateway);
    engine.poll_tick().await;
    assert_eq!(engine.snapshot().control, ControlState::Running);

    engine.request_stop().await;
    let view = engine.snapshot();
    assert_eq!(view.control, ControlState::Error);
    assert!(view.command_error.clone().unwrap().contains("timeout"));
    assert!(view.can_start());
    assert!(view.can_stop());

    // The backend eventually reports the run gone; the poll wins the state.
    engine.poll_tick().await;
    let view = engine.snapshot();
    assert_eq!(view.control, ControlState::Idle);
    // The failure text stays visible until the operator acts on it.
    assert!(view.command_error.is_some());
}

#[tokio::test]
async fn test_history_fallback_for_idle_sessions() {
    let gateway = MockGateway::new();
    gateway.push_status(Ok(json!({"status": "IDLE"})));
    gateway.push_ledger(Ok(vec![]));
    gateway.push_history(Ok(vec![
        history_record(3, 0.8),
        history_record(2, 0.7),
        history_record(1, 0.5),
    ]));

    let engine = engine_with(&gateway);
    engine.poll_tick().await;

    let view = engine.snapshot();
    let chart: Vec<(u64, Option<f64>)> =
        view.chart.iter().map(|p| (p.round, p.accuracy)).collect();
    assert_eq!(chart, vec![(1, Some(0.5)), (2, Some(0.7)), (3, Some(0.8))]);
    assert!(view.chart.iter().all(|p| p.loss.is_none()));
}

#[tokio::test]
async fn test_history_fetched_once_per_idle_period() {
    let gateway = MockGateway::new();
    gateway.push_status(Ok(json!({"status": "IDLE"})));
    gateway.push_status(Ok(json!({"status": "IDLE"})));
    gateway.push_status(Ok(json!({
        "status": "RUNNING",
        "metrics": {"rounds": [1], "loss": [0.9]}
    })));
    gateway.push_status(Ok(json!({"status": "IDLE"})));
    gateway.push_ledger(Ok(vec![]));
    gateway.push_history(Ok(vec![history_record(1, 0.5)]));

    let engine = engine_with(&gateway);

    engine.poll_tick().await; // idle: fetches history
    assert_eq!(gateway.history_calls(), 1);

    engine.poll_tick().await; // still idle: cached, no second fetch
    assert_eq!(gateway.history_calls(), 1);

    engine.poll_tick().await; // running: cache invalidated, live chart wins
    assert_eq!(engine.snapshot().chart[0].loss, Some(0.9));

    engine.poll_tick().await; // idle re-entry: fetched again
    assert_eq!(gateway.history_calls(), 2);
    let view = engine.snapshot();
    assert_eq!(view.chart.len(), 1);
    assert_eq!(view.chart[0].accuracy, Some(0.5));
}

#[tokio::test]
async fn test_history_fetch_failure_leaves_chart_empty() {
    let gateway = MockGateway::new();
    gateway.push_status(Ok(json!({"status": "IDLE"})));
    gateway.push_ledger(Ok(vec![]));
    gateway.push_history(Err(GatewayError::Transport("no route".to_string())));

    let engine = engine_with(&gateway);
    engine.poll_tick().await;
    engine.poll_tick().await;

    let view = engine.snapshot();
    assert!(view.chart.is_empty());
    assert_eq!(view.status.status, RunStatus::Idle);
    // Not retried before the next idle re-entry.
    assert_eq!(gateway.history_calls(), 1);
}

#[tokio::test]
async fn test_empty_ledger_renders_as_empty_not_error() {
    let gateway = MockGateway::new();
    gateway.push_status(Ok(json!({"status": "IDLE"})));
    gateway.push_ledger(Ok(vec![]));
    gateway.push_history(Ok(vec![]));

    let engine = engine_with(&gateway);
    engine.poll_tick().await;

    let view = engine.snapshot();
    assert!(view.ledger.is_empty());
    assert!(view.ledger_preview.is_empty());
}

#[tokio::test]
async fn test_roster_feeds_fail_independently() {
    let gateway = MockGateway::new();
    gateway.push_model(Err(GatewayError::Backend {
        status: 404,
        message: String::new(),
    }));
    gateway.push_clients(Ok(vec![]));
    gateway.push_datasets(Ok(vec![
        "client_1.txt".to_string(),
        "client_2.txt".to_string(),
    ]));

    let engine = engine_with(&gateway);
    engine.poll_roster().await;

    let view = engine.snapshot();
    assert_eq!(view.roster.model, None);
    assert_eq!(view.roster.datasets.len(), 2);
}

#[tokio::test]
async fn test_dataset_preview_loads_on_demand() {
    let gateway = MockGateway::new();
    gateway.push_dataset(Ok(DatasetPreview {
        dataset: "client_1.txt".to_string(),
        total_size: 2048,
        preview: "To be, or not to be".to_string(),
    }));

    let engine = engine_with(&gateway);
    engine.load_dataset_preview("client_1.txt").await.unwrap();

    let preview = engine.snapshot().roster.dataset_preview.unwrap();
    assert_eq!(preview.dataset, "client_1.txt");
    assert_eq!(preview.size_kib(), 2);
}

#[tokio::test]
async fn test_poller_lifecycle() {
    let gateway = MockGateway::new();
    gateway.push_status(Ok(json!({"status": "RUNNING"})));
    gateway.push_ledger(Ok(vec![]));

    let config = EngineConfig {
        status_interval: Duration::from_millis(10),
        roster_interval: Duration::from_millis(10),
        ..Default::default()
    };
    let engine = SyncEngine::new(gateway.clone(), config.clone());

    let mut poller = Poller::default();
    poller.start(&engine, &config);
    assert!(poller.is_running());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(gateway.status_calls() >= 3);
    assert_eq!(engine.snapshot().status.status, RunStatus::Running);

    poller.stop();
    assert!(!poller.is_running());

    // At most one in-flight tick may still land after stop.
    tokio::time::sleep(Duration::from_millis(30)).await;
    let settled = gateway.status_calls();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(gateway.status_calls() <= settled + 1);
}

#[tokio::test]
async fn test_poller_restart_replaces_schedule() {
    let gateway = MockGateway::new();
    gateway.push_status(Ok(json!({"status": "IDLE"})));
    gateway.push_ledger(Ok(vec![]));
    gateway.push_history(Ok(vec![]));

    let config = EngineConfig {
        status_interval: Duration::from_millis(10),
        roster_interval: Duration::from_millis(10),
        ..Default::default()
    };
    let engine = SyncEngine::new(gateway.clone(), config.clone());

    let mut poller = Poller::default();
    poller.start(&engine, &config);
    // Starting again must replace, not stack, the timers.
    poller.start(&engine, &config);
    assert!(poller.is_running());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(gateway.status_calls() >= 2);

    poller.stop();
    assert!(!poller.is_running());
}
