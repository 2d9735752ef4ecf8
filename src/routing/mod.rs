//! Routing of completed captures to destination agents.
//!
//! Two steps, both deterministic:
//!
//! ```text
//! CaptureRouting + [AgentConnection] ──RoutingEngine──► [SuggestedRoute]
//! [SuggestedRoute] + user pick ──RoutingPresentation──► RoutingDecision
//! ```
//!
//! An empty suggestion list is not an error; the only decision left is
//! [`RoutingDecision::SaveLocally`].

mod agent;
mod engine;
mod presentation;
mod rules;

pub use agent::{AgentConnection, AgentId};
pub use engine::{
    capture_title, suggest, CaptureRouting, ColorHint, RoutingEngine, SensorType, SuggestedRoute,
};
pub use presentation::{RoutingDecision, RoutingOption, RoutingPresentation, RoutingPresenter};
