//! # FedSim Sync Engine
//!
//! Client-side synchronization engine for the FedSim Console: polls the
//! simulation backend's REST surface, reconciles its heterogeneous payloads
//! into one consistent snapshot, and drives the start/stop control state
//! machine. The backend (simulation, cryptographic ledger, database) is
//! entirely external; this crate only consumes it.
//!
//! ## Key Pieces
//!
//! - [`ApiGateway`]: injectable capability interface to the backend, with
//!   [`HttpGateway`] for production and [`MockGateway`] for tests
//! - [`reconcile`]: raw status payload → canonical [`StatusSnapshot`]
//! - [`LedgerStore`]: replace-on-poll feed of signed model-update records
//! - [`HistoryFallback`]: chart data for idle periods with no live metrics
//! - [`SimulationController`]: the start/stop state machine, including the
//!   optimistic conflict-means-running correction
//! - [`SyncEngine`] + [`Poller`]: the scheduled loops feeding [`UiSnapshot`]
//!
//! The engine holds only in-memory state for the lifetime of the process:
//! no persistence, no signature validation, best-effort commands.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod history;
pub mod ledger;
pub mod mock_gateway;
pub mod poller;
pub mod roster;
pub mod state;
pub mod status;

// Re-export main types
pub use config::EngineConfig;
pub use controller::{ControlState, SimulationController};
pub use engine::SyncEngine;
pub use error::GatewayError;
pub use gateway::{ApiGateway, HttpGateway};
pub use history::{HistoryFallback, HistoryRecord};
pub use ledger::{LedgerEntry, LedgerStore};
pub use mock_gateway::MockGateway;
pub use poller::Poller;
pub use roster::{ClientInfo, DatasetPreview, ModelInfo, RosterState};
pub use state::{LEDGER_PREVIEW_LEN, LinkState, UiSnapshot};
pub use status::{ChartPoint, RunStatus, StatusSnapshot, reconcile};
