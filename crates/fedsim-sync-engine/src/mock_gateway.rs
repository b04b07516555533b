//! Mock gateway for testing
//!
//! A scriptable fake backend behind the same [`ApiGateway`] trait the HTTP
//! implementation uses, so engine logic is tested without network access.
//!
//! Responses are queued per endpoint with `push_*`. A call pops the front of
//! its queue; the final queued response is sticky, so a poll loop keeps
//! receiving it. An endpoint with nothing queued answers with a transport
//! failure.
//!
//! The mock is cheap to clone; clones share the scripted queues and call
//! counters, so a test can keep a handle while the engine owns its clone.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;
use crate::gateway::ApiGateway;
use crate::history::HistoryRecord;
use crate::ledger::LedgerEntry;
use crate::roster::{ClientInfo, DatasetPreview, ModelInfo};

type Scripted<T> = Mutex<VecDeque<Result<T, GatewayError>>>;

#[derive(Default)]
struct MockInner {
    status: Scripted<Value>,
    ledger: Scripted<Vec<LedgerEntry>>,
    history: Scripted<Vec<HistoryRecord>>,
    start: Scripted<()>,
    stop: Scripted<()>,
    model: Scripted<ModelInfo>,
    clients: Scripted<Vec<ClientInfo>>,
    datasets: Scripted<Vec<String>>,
    dataset: Scripted<DatasetPreview>,

    status_calls: AtomicUsize,
    ledger_calls: AtomicUsize,
    history_calls: AtomicUsize,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct MockGateway {
    inner: Arc<MockInner>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, response: Result<Value, GatewayError>) {
        push(&self.inner.status, response);
    }

    pub fn push_ledger(&self, response: Result<Vec<LedgerEntry>, GatewayError>) {
        push(&self.inner.ledger, response);
    }

    pub fn push_history(&self, response: Result<Vec<HistoryRecord>, GatewayError>) {
        push(&self.inner.history, response);
    }

    pub fn push_start(&self, response: Result<(), GatewayError>) {
        push(&self.inner.start, response);
    }

    pub fn push_stop(&self, response: Result<(), GatewayError>) {
        push(&self.inner.stop, response);
    }

    pub fn push_model(&self, response: Result<ModelInfo, GatewayError>) {
        push(&self.inner.model, response);
    }

    pub fn push_clients(&self, response: Result<Vec<ClientInfo>, GatewayError>) {
        push(&self.inner.clients, response);
    }

    pub fn push_datasets(&self, response: Result<Vec<String>, GatewayError>) {
        push(&self.inner.datasets, response);
    }

    pub fn push_dataset(&self, response: Result<DatasetPreview, GatewayError>) {
        push(&self.inner.dataset, response);
    }

    pub fn status_calls(&self) -> usize {
        self.inner.status_calls.load(Ordering::Relaxed)
    }

    pub fn ledger_calls(&self) -> usize {
        self.inner.ledger_calls.load(Ordering::Relaxed)
    }

    pub fn history_calls(&self) -> usize {
        self.inner.history_calls.load(Ordering::Relaxed)
    }

    pub fn start_calls(&self) -> usize {
        self.inner.start_calls.load(Ordering::Relaxed)
    }

    pub fn stop_calls(&self) -> usize {
        self.inner.stop_calls.load(Ordering::Relaxed)
    }
}

fn push<T>(queue: &Scripted<T>, response: Result<T, GatewayError>) {
    queue.lock().unwrap().push_back(response);
}

fn take<T: Clone>(queue: &Scripted<T>, endpoint: &str) -> Result<T, GatewayError> {
    let mut queue = queue.lock().unwrap();
    match queue.len() {
        0 => Err(GatewayError::Transport(format!(
            "mock: no scripted response for {endpoint}"
        ))),
        // The final response is sticky for poll loops.
        1 => queue.front().cloned().unwrap(),
        _ => queue.pop_front().unwrap(),
    }
}

#[async_trait]
impl ApiGateway for MockGateway {
    async fn fetch_status(&self) -> Result<Value, GatewayError> {
        self.inner.status_calls.fetch_add(1, Ordering::Relaxed);
        take(&self.inner.status, "status")
    }

    async fn fetch_ledger(&self) -> Result<Vec<LedgerEntry>, GatewayError> {
        self.inner.ledger_calls.fetch_add(1, Ordering::Relaxed);
        take(&self.inner.ledger, "ledger")
    }

    async fn post_start(&self, _db_password: &str) -> Result<(), GatewayError> {
        self.inner.start_calls.fetch_add(1, Ordering::Relaxed);
        take(&self.inner.start, "start")
    }

    async fn post_stop(&self) -> Result<(), GatewayError> {
        self.inner.stop_calls.fetch_add(1, Ordering::Relaxed);
        take(&self.inner.stop, "stop")
    }

    async fn fetch_history(&self) -> Result<Vec<HistoryRecord>, GatewayError> {
        self.inner.history_calls.fetch_add(1, Ordering::Relaxed);
        take(&self.inner.history, "history")
    }

    async fn fetch_model(&self) -> Result<ModelInfo, GatewayError> {
        take(&self.inner.model, "model")
    }

    async fn fetch_clients(&self) -> Result<Vec<ClientInfo>, GatewayError> {
        take(&self.inner.clients, "clients")
    }

    async fn fetch_datasets(&self) -> Result<Vec<String>, GatewayError> {
        take(&self.inner.datasets, "datasets")
    }

    async fn fetch_dataset(&self, name: &str) -> Result<DatasetPreview, GatewayError> {
        take(&self.inner.dataset, name)
    }
}
