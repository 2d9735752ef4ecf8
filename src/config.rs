//! Configuration types for capture sessions and routing.

use std::time::Duration;

/// Configuration for a capture session.
///
/// Use [`SessionConfig::default()`] for sensible defaults, or customize as needed.
///
/// # Example
///
/// ```
/// use capture_route::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig {
///     stop_poll_interval: Duration::from_millis(20),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sample device heading while the session runs.
    ///
    /// Sampling only starts if the device also reports the capability.
    /// Default: true
    pub heading_sampling: bool,

    /// How often the session worker checks for a pending stop request.
    ///
    /// Stop requests also wake the worker directly; the poll is a backstop.
    /// Default: 50ms
    pub stop_poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heading_sampling: true,
            stop_poll_interval: Duration::from_millis(50),
        }
    }
}

/// Configuration for the routing engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Maximum number of suggestions returned for one capture.
    ///
    /// Default: 3
    pub max_suggestions: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { max_suggestions: 3 }
    }
}
