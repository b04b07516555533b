//! Cooperative poll scheduler
//!
//! Fires the fast tick (status + ledger) and the slow tick (roster) on their
//! configured cadences until told to stop. Stopping cancels future fires but
//! not an in-flight tick: a request already dispatched completes and its
//! result is still applied, which is acceptable staleness because the UI is
//! read-only against this state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::SyncEngine;
use crate::gateway::ApiGateway;

/// Owns the polling tasks for one engine.
#[derive(Default)]
pub struct Poller {
    cancel: Option<Arc<AtomicBool>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Poller {
    /// Begin polling. Calling `start` on a live poller replaces the previous
    /// schedule rather than stacking a second set of timers.
    pub fn start<G: ApiGateway + 'static>(&mut self, engine: &SyncEngine<G>, config: &EngineConfig) {
        self.stop();

        let cancel = Arc::new(AtomicBool::new(false));

        let fast = {
            let engine = engine.clone();
            let cancel = Arc::clone(&cancel);
            let period = config.status_interval;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    engine.poll_tick().await;
                }
                debug!("status/ledger poll loop stopped");
            })
        };

        let slow = {
            let engine = engine.clone();
            let cancel = Arc::clone(&cancel);
            let period = config.roster_interval;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    engine.poll_roster().await;
                }
                debug!("roster poll loop stopped");
            })
        };

        self.cancel = Some(cancel);
        self.tasks = vec![fast, slow];
    }

    /// Cancel future fires. In-flight ticks finish and apply their results.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.store(true, Ordering::Relaxed);
        }
        self.tasks.clear();
    }

    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
