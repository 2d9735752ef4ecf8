//! # capture-route
//!
//! **Note:** This crate is under active development. The API may change before 1.0.
//!
//! Sensor capture coordination with routing of the captured result.
//!
//! `capture-route` drives a hardware capture session (such as a room scan)
//! from start to a single completion, attaches the most recent trustworthy
//! compass heading, suggests which registered agent should receive the
//! capture, and creates shareable task links for human follow-up work.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use capture_route::{suggest, CaptureRouting, CaptureSession, RoutingPresenter, SensorType};
//!
//! let mut session = CaptureSession::builder()
//!     .backend(room_scanner)
//!     .heading_provider(compass)
//!     .on_complete(|artifact| store(artifact))
//!     .on_error(|e| tracing::warn!(error = %e, "room scan failed"))
//!     .on_event(|e| tracing::debug!(?e, "capture event"))
//!     .build()?;
//!
//! session.start()?;
//! // ... user taps "Done"
//! session.request_stop()?;
//!
//! // Later, once on_complete has fired
//! let routes = suggest(&CaptureRouting::new(SensorType::Lidar), &agents);
//! let presentation = RoutingPresenter::new().present(routes, &agents)?;
//! let decision = presentation.dismiss();
//!
//! session.dismantle().await;
//! ```
//!
//! ## Architecture
//!
//! The crate maintains a strict serial boundary:
//!
//! - **Hardware callbacks**: arrive on arbitrary threads and only forward
//!   messages through single-capability listeners
//! - **Session worker**: one Tokio task owns the backend, the heading tracker
//!   and the completion callbacks, so each session completes exactly once
//! - **Handle**: [`CaptureCoordinator`] sends requests and reads the atomic
//!   session state without blocking
//!
//! Routing and link distribution sit outside the session: routing is a pure
//! function of its inputs, and [`LinkDistributionWorkflow`] talks to any
//! [`HitCreationService`] with at most one request in flight.

#![warn(missing_docs)]
// unwrap/expect allowed in tests only
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
// These doc lints are too strict for internal implementation details
#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc)]

mod artifact;
mod builder;
mod config;
pub mod distribution;
mod error;
mod event;
pub mod hardware;
mod heading;
mod pipeline;
mod routing;
mod session;

pub use artifact::{CapturedArtifact, CapturedGeometry};
pub use builder::{CaptureSession, CaptureSessionBuilder};
pub use config::{RoutingConfig, SessionConfig};
pub use distribution::{
    parse_participants, CreatedLinks, DistributionMode, HitCreationRequest, HitCreationResponse,
    HitCreationService, HitLink, LinkDistributionWorkflow, LinkDraft,
};
pub use error::{CaptureError, DistributionError, RoutingError, ValidationError};
pub use event::{event_callback, CaptureEvent, EventCallback};
pub use hardware::{
    CapabilityProvider, CaptureBackend, DeviceCapabilities, HeadingListener, HeadingProvider,
    ReviewListener, SessionListener, SessionListeners,
};
pub use heading::{HeadingSample, HeadingTracker};
pub use pipeline::{CompleteCallback, ErrorCallback};
pub use routing::{
    capture_title, suggest, AgentConnection, AgentId, CaptureRouting, ColorHint, RoutingDecision,
    RoutingEngine, RoutingOption, RoutingPresentation, RoutingPresenter, SensorType,
    SuggestedRoute,
};
pub use session::{CaptureCoordinator, SessionPhase};
