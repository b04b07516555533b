//! Engine state
//!
//! One explicitly owned state struct instead of ambient globals. Writers
//! replace whole snapshot fields, never individual ones, so the render layer
//! can never observe a torn update.
//!
//! ## Ordering
//!
//! Polls may overlap (a command triggers an immediate refresh while the
//! regular tick is in flight). Every dispatched fetch takes a monotonically
//! increasing sequence number; a response is applied only if its sequence is
//! newer than the last one applied for that feed, so applied state always
//! reflects the latest dispatched request rather than whichever response
//! happened to land last.

use tracing::debug;

use crate::controller::{ControlState, SimulationController};
use crate::history::HistoryFallback;
use crate::ledger::{LedgerEntry, LedgerStore};
use crate::roster::RosterState;
use crate::status::{ChartPoint, RunStatus, StatusSnapshot};

/// How many ledger entries the compact preview panel shows.
pub const LEDGER_PREVIEW_LEN: usize = 5;

/// Backend reachability, derived from the outcome of the latest status poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkState {
    /// No poll has completed yet.
    #[default]
    Connecting,
    Connected,
    Offline,
}

impl LinkState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "Connecting…",
            Self::Connected => "Backend Connected",
            Self::Offline => "Backend Offline",
        }
    }
}

/// All state the engine accumulates across polls.
#[derive(Debug, Default)]
pub struct EngineState {
    pub(crate) status: StatusSnapshot,
    pub(crate) controller: SimulationController,
    pub(crate) ledger: LedgerStore,
    pub(crate) history: HistoryFallback,
    pub(crate) roster: RosterState,
    pub(crate) link: LinkState,
    dispatch_seq: u64,
    applied_status_seq: u64,
    applied_ledger_seq: u64,
}

impl EngineState {
    /// Take the sequence number for a fetch about to be dispatched.
    pub(crate) fn next_seq(&mut self) -> u64 {
        self.dispatch_seq += 1;
        self.dispatch_seq
    }

    /// Apply a reconciled status snapshot, unless a newer one already landed.
    /// Returns whether the snapshot was applied.
    pub(crate) fn apply_status(&mut self, seq: u64, snapshot: StatusSnapshot) -> bool {
        if seq <= self.applied_status_seq {
            debug!(seq, latest = self.applied_status_seq, "dropping stale status response");
            return false;
        }
        self.applied_status_seq = seq;

        self.controller.reconcile(snapshot.status);

        // Live data or a non-idle run ends the fallback period.
        if snapshot.status != RunStatus::Idle || !snapshot.chart.is_empty() {
            self.history.invalidate();
        }

        self.status = snapshot;
        self.link = LinkState::Connected;
        true
    }

    /// A status poll failed at the transport level: keep the previous
    /// snapshot, flip the link badge.
    pub(crate) fn status_poll_failed(&mut self) {
        self.link = LinkState::Offline;
    }

    /// Apply a ledger feed, unless a newer one already landed.
    pub(crate) fn apply_ledger(&mut self, seq: u64, feed: Vec<LedgerEntry>) -> bool {
        if seq <= self.applied_ledger_seq {
            debug!(seq, latest = self.applied_ledger_seq, "dropping stale ledger response");
            return false;
        }
        self.applied_ledger_seq = seq;
        self.ledger.ingest(feed);
        true
    }

    /// Cache a history feed, but only if the fallback condition still holds;
    /// a run may have started while the fetch was in flight.
    pub(crate) fn apply_history(&mut self, records: Vec<crate::history::HistoryRecord>) {
        if self.status.status == RunStatus::Idle && self.status.chart.is_empty() {
            self.history.store(records);
        }
    }

    /// Chart points for display: live metrics when present, otherwise the
    /// history fallback. Ascending by round either way.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        if self.status.chart.is_empty() {
            self.history.points().to_vec()
        } else {
            self.status.chart.clone()
        }
    }

    /// Clone out the atomic view the render layer consumes.
    pub fn snapshot(&self) -> UiSnapshot {
        UiSnapshot {
            status: self.status.clone(),
            control: self.controller.state(),
            command_error: self.controller.last_error().map(str::to_string),
            link: self.link,
            chart: self.chart_points(),
            ledger: self.ledger.entries().to_vec(),
            ledger_preview: self.ledger.top_n(LEDGER_PREVIEW_LEN).to_vec(),
            roster: self.roster.clone(),
        }
    }
}

/// Immutable full-snapshot view of the engine, cloned per render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiSnapshot {
    pub status: StatusSnapshot,
    pub control: ControlState,
    /// Failure text from the last command or backend-reported error.
    pub command_error: Option<String>,
    pub link: LinkState,
    /// Live chart or history fallback, ascending by round.
    pub chart: Vec<ChartPoint>,
    /// Full ledger feed, newest first.
    pub ledger: Vec<LedgerEntry>,
    /// First [`LEDGER_PREVIEW_LEN`] entries for the compact panel.
    pub ledger_preview: Vec<LedgerEntry>,
    pub roster: RosterState,
}

impl UiSnapshot {
    /// Log lines for display, newest first. The canonical order stays
    /// backend order; only the view reverses.
    pub fn logs_newest_first(&self) -> impl Iterator<Item = &str> {
        self.status.logs.iter().rev().map(String::as_str)
    }

    pub fn can_start(&self) -> bool {
        matches!(self.control, ControlState::Idle | ControlState::Error)
    }

    pub fn can_stop(&self) -> bool {
        matches!(self.control, ControlState::Running | ControlState::Error)
    }
}
