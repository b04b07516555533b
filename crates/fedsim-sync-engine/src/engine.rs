//! The synchronization engine
//!
//! Ties the gateway, the reconciler, the stores, and the controller together.
//! Every poll step follows the same discipline: take a sequence number,
//! fetch without holding the state lock, then lock and apply. The lock is
//! never held across an await point.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::GatewayError;
use crate::gateway::ApiGateway;
use crate::state::{EngineState, UiSnapshot};
use crate::status::reconcile;

/// Shared handle to the engine. Cheap to clone; all clones drive the same
/// state.
pub struct SyncEngine<G> {
    gateway: Arc<G>,
    config: Arc<EngineConfig>,
    state: Arc<Mutex<EngineState>>,
}

impl<G> Clone for SyncEngine<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
        }
    }
}

impl<G: ApiGateway> SyncEngine<G> {
    pub fn new(gateway: G, config: EngineConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config: Arc::new(config),
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current atomic view for the render layer.
    pub fn snapshot(&self) -> UiSnapshot {
        self.lock_state().snapshot()
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        // A poisoned lock only means a panic elsewhere mid-update of
        // replace-whole-field state; the state itself is still coherent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// One status poll: fetch, reconcile, apply, and chase the history
    /// fallback when the idle-and-empty condition arms it.
    pub async fn poll_status(&self) {
        let seq = self.lock_state().next_seq();
        match self.gateway.fetch_status().await {
            Ok(raw) => {
                let snapshot = reconcile(&raw);
                let fetch_history = {
                    let mut state = self.lock_state();
                    if state.apply_status(seq, snapshot) {
                        let idle = state.status.status == crate::status::RunStatus::Idle;
                        let live_empty = state.status.chart.is_empty();
                        if state.history.should_fetch(idle, live_empty) {
                            state.history.mark_attempted();
                            true
                        } else {
                            false
                        }
                    } else {
                        false
                    }
                };
                if fetch_history {
                    self.fetch_history_once().await;
                }
            }
            Err(err) => {
                warn!(error = %err, "status poll failed, keeping previous snapshot");
                self.lock_state().status_poll_failed();
            }
        }
    }

    async fn fetch_history_once(&self) {
        match self.gateway.fetch_history().await {
            Ok(records) => {
                debug!(records = records.len(), "loaded persisted round history");
                self.lock_state().apply_history(records);
            }
            Err(err) => {
                // Not retried before the next idle re-entry.
                warn!(error = %err, "history fetch failed, chart stays empty");
            }
        }
    }

    /// One ledger poll: the backend re-sends the full feed, the store
    /// replaces its sequence.
    pub async fn poll_ledger(&self) {
        let seq = self.lock_state().next_seq();
        match self.gateway.fetch_ledger().await {
            Ok(feed) => {
                self.lock_state().apply_ledger(seq, feed);
            }
            Err(err) => warn!(error = %err, "ledger poll failed, keeping previous feed"),
        }
    }

    /// One fast-cadence tick: status then ledger.
    pub async fn poll_tick(&self) {
        self.poll_status().await;
        self.poll_ledger().await;
    }

    /// One slow-cadence tick: model, clients, datasets. Each feed fails
    /// independently; a missing roster endpoint never disturbs the rest.
    pub async fn poll_roster(&self) {
        match self.gateway.fetch_model().await {
            Ok(model) => self.lock_state().roster.model = Some(model),
            Err(err) => debug!(error = %err, "model info fetch failed"),
        }
        match self.gateway.fetch_clients().await {
            Ok(clients) => self.lock_state().roster.clients = clients,
            Err(err) => debug!(error = %err, "client list fetch failed"),
        }
        match self.gateway.fetch_datasets().await {
            Ok(datasets) => self.lock_state().roster.datasets = datasets,
            Err(err) => debug!(error = %err, "dataset list fetch failed"),
        }
    }

    /// Load one dataset preview on demand. Returns the failure so the page
    /// can show it inline.
    pub async fn load_dataset_preview(&self, name: &str) -> Result<(), GatewayError> {
        let preview = self.gateway.fetch_dataset(name).await?;
        self.lock_state().roster.dataset_preview = Some(preview);
        Ok(())
    }

    /// Issue the start command: optimistic state first, resolution after.
    /// A command that (effectively) succeeded is followed by an immediate
    /// refresh so the UI does not wait a full poll period; a failed command
    /// changed nothing backend-side, so the error state stays visible until
    /// the next scheduled poll reconciles it.
    pub async fn request_start(&self) {
        if !self.lock_state().controller.begin_start() {
            return;
        }
        info!("issuing start command");
        let result = self.gateway.post_start(&self.config.db_password).await;
        let refresh = matches!(&result, Ok(()))
            || matches!(&result, Err(err) if err.is_start_conflict());
        self.lock_state().controller.complete_start(result);
        if refresh {
            self.poll_tick().await;
        }
    }

    /// Issue the stop command, mirroring [`SyncEngine::request_start`].
    pub async fn request_stop(&self) {
        if !self.lock_state().controller.begin_stop() {
            return;
        }
        info!("issuing stop command");
        let result = self.gateway.post_stop().await;
        let refresh = result.is_ok();
        self.lock_state().controller.complete_stop(result);
        if refresh {
            self.poll_tick().await;
        }
    }
}
