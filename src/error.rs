//! Error types for capture-route.
//!
//! Errors are split by concern:
//! - **Capture errors** ([`CaptureError`]): misuse of the coordinator is
//!   returned synchronously, hardware failures arrive once through `on_error`
//! - **Routing errors** ([`RoutingError`]): only presentation exclusivity;
//!   an ambiguous or stale route is not an error and falls back to saving locally
//! - **Link distribution errors** ([`ValidationError`], [`DistributionError`])
//!
//! A missing heading is not an error either; it is an absent
//! [`HeadingSample`](crate::HeadingSample).

use crate::distribution::DistributionMode;

/// Errors raised by the capture session coordinator and its hardware backend.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The device cannot run a capture session at all.
    #[error("capture hardware is not supported on this device")]
    CaptureUnsupported,

    /// `build()` was called without a capture backend.
    #[error("no capture backend configured - call backend() before build()")]
    NoBackendConfigured,

    /// The coordinator needs a Tokio runtime to host its session worker.
    #[error("no tokio runtime available to host the capture session")]
    NoRuntime,

    /// `start()` was called more than once on the same session.
    #[error("capture session already started")]
    AlreadyStarted,

    /// The session was dismantled and accepts no further operations.
    #[error("capture session has been torn down")]
    TornDown,

    /// The hardware session failed while running.
    #[error("capture session failed: {reason}")]
    SessionFailed {
        /// Description reported by the hardware.
        reason: String,
    },

    /// An error from the native capture backend itself.
    #[error("capture backend error: {0}")]
    BackendError(String),
}

impl CaptureError {
    /// Creates a session failure with the given reason.
    pub fn session_failed(reason: impl Into<String>) -> Self {
        Self::SessionFailed {
            reason: reason.into(),
        }
    }

    /// Creates a backend error with the given message.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::BackendError(msg.into())
    }
}

/// Errors raised while presenting routing suggestions.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// Another presentation is still waiting for its decision.
    #[error("a routing presentation is already active")]
    PresentationActive,
}

/// Local validation failures for a link draft.
///
/// These block submission before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// Individual and group links need at least one participant.
    #[error("{mode} links need at least one participant")]
    MissingParticipants {
        /// Mode that required the participants.
        mode: DistributionMode,
    },
}

/// Failures of the link distribution workflow.
///
/// The [`Display`](std::fmt::Display) output is meant to be shown to the
/// user as-is. Nothing here is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum DistributionError {
    /// The draft did not pass local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A request from this workflow is still outstanding.
    #[error("a link request is already in progress")]
    InFlight,

    /// The transport failed before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The creation service answered with an error status.
    #[error("server error ({status}): {message}")]
    Server {
        /// Status code reported by the service.
        status: u16,
        /// Message reported by the service.
        message: String,
    },

    /// The request or response body could not be (de)serialized.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The response carried neither a link list nor a single url.
    #[error("the service did not return any link")]
    NoLinkResolved,
}

impl DistributionError {
    /// Creates a network error with the given message.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Creates a server error for the given status and message.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }
}
