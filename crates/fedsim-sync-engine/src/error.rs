//! Error types for the synchronization engine

use thiserror::Error;

/// Failures surfaced by an [`crate::gateway::ApiGateway`] call.
///
/// Every variant resolves to a renderable state: transport failures keep the
/// previous snapshot, decode failures degrade the affected fields, and
/// backend rejections carry the message shown to the operator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Network-level failure: DNS, refused connection, timeout.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// The response body could not be decoded as the expected shape.
    #[error("malformed payload: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether a rejected start command means a run is already active.
    ///
    /// The backend's only rejection of `/api/start` is its conflict answer
    /// (HTTP 400, some deployments use 409), so the controller treats it as
    /// implied success.
    pub fn is_start_conflict(&self) -> bool {
        matches!(self, Self::Backend { status: 400 | 409, .. })
    }

    /// Message shown to the operator: the backend-reported text when present,
    /// otherwise the transport/decode failure text.
    pub fn operator_message(&self) -> String {
        match self {
            Self::Backend { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}
