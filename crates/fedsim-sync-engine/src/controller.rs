//! Start/stop control state machine
//!
//! The controller owns [`ControlState`] exclusively. The backend's polled
//! status is the long-run source of truth; the controller's optimistic
//! states are only a bridge until a poll (or the command's own resolution)
//! confirms reality.
//!
//! The one deliberate twist is the optimistic correction: the backend's only
//! reason to reject a start is that a run is already active, so a conflict
//! answer is treated as success.
//!
//! Command-failure text is the controller's; the backend's own
//! `error_details` lives on the status snapshot and is cleared there on
//! recovery. A command failure stays visible until the operator issues the
//! next command, like the alert it replaces.

use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::status::RunStatus;

/// Control state, distinct from the backend-reported [`RunStatus`]: it also
/// tracks commands in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlState {
    #[default]
    Idle,
    Starting,
    Running,
    Stopping,
    Error,
}

impl ControlState {
    /// Badge label for the control bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Starting => "Starting…",
            Self::Running => "Running",
            Self::Stopping => "Stopping…",
            Self::Error => "Error",
        }
    }
}

/// Drives start/stop commands and reconciles against polled status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationController {
    state: ControlState,
    /// Operator-facing failure text from the last command.
    last_error: Option<String>,
}

impl SimulationController {
    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start is allowed from Idle and from Error (retry after failure).
    pub fn can_start(&self) -> bool {
        matches!(self.state, ControlState::Idle | ControlState::Error)
    }

    /// Stop is allowed while Running, and from Error so the operator can
    /// force the backend down after a failed stop.
    pub fn can_stop(&self) -> bool {
        matches!(self.state, ControlState::Running | ControlState::Error)
    }

    /// A command is awaiting its response; polls must not clobber the state.
    pub fn command_in_flight(&self) -> bool {
        matches!(self.state, ControlState::Starting | ControlState::Stopping)
    }

    /// Enter Starting, clearing prior error text. Returns false when the
    /// transition is not allowed from the current state.
    pub fn begin_start(&mut self) -> bool {
        if !self.can_start() {
            debug!(state = ?self.state, "start request ignored");
            return false;
        }
        self.state = ControlState::Starting;
        self.last_error = None;
        true
    }

    /// Resolve the start command.
    pub fn complete_start(&mut self, result: Result<(), GatewayError>) {
        if self.state != ControlState::Starting {
            return;
        }
        match result {
            Ok(()) => {
                info!("start command accepted");
                self.state = ControlState::Running;
            }
            Err(err) if err.is_start_conflict() => {
                // A rejected start means a run is already active.
                info!(error = %err, "start conflict treated as already running");
                self.state = ControlState::Running;
            }
            Err(err) => {
                warn!(error = %err, "start command failed");
                self.last_error = Some(err.operator_message());
                self.state = ControlState::Error;
            }
        }
    }

    /// Enter Stopping. Returns false when not allowed.
    pub fn begin_stop(&mut self) -> bool {
        if !self.can_stop() {
            debug!(state = ?self.state, "stop request ignored");
            return false;
        }
        self.state = ControlState::Stopping;
        true
    }

    /// Resolve the stop command.
    pub fn complete_stop(&mut self, result: Result<(), GatewayError>) {
        if self.state != ControlState::Stopping {
            return;
        }
        match result {
            Ok(()) => {
                info!("stop command accepted");
                self.state = ControlState::Idle;
                self.last_error = None;
            }
            Err(err) => {
                warn!(error = %err, "stop command failed");
                self.last_error = Some(err.operator_message());
                self.state = ControlState::Error;
            }
        }
    }

    /// Adopt the authoritative polled status.
    ///
    /// No-op while a command is in flight: Starting/Stopping are exited by
    /// the command's own resolution, which the HTTP timeout bounds.
    pub fn reconcile(&mut self, polled: RunStatus) {
        if self.command_in_flight() {
            return;
        }
        let next = match polled {
            RunStatus::Idle => ControlState::Idle,
            RunStatus::Running => ControlState::Running,
            RunStatus::Error => ControlState::Error,
        };
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "reconciled to polled status");
        }
        self.state = next;
    }
}
