//! Runtime events for observing a capture session.
//!
//! Events are non-fatal notifications about session behavior. They are for
//! logging and diagnostics and never take part in the completion protocol:
//! a session completes through `on_complete` / `on_error` only.

use std::sync::Arc;

/// Runtime events emitted by a capture session.
///
/// # Example
///
/// ```
/// use capture_route::CaptureEvent;
///
/// fn handle_event(event: CaptureEvent) {
///     match event {
///         CaptureEvent::SessionStarted { backend, heading_sampling } => {
///             eprintln!("{backend} running (heading: {heading_sampling})");
///         }
///         CaptureEvent::SessionEnded { error } => {
///             eprintln!("session ended: {error:?}");
///         }
///         other => eprintln!("{other:?}"),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// The native session is running.
    SessionStarted {
        /// Name of the capture backend.
        backend: &'static str,
        /// Whether heading sampling was started alongside the session.
        heading_sampling: bool,
    },

    /// A pending stop request was observed and forwarded to the hardware.
    StopObserved,

    /// The hardware reported that the session ended.
    ///
    /// This is advisory only. The session completes when the result is
    /// ready, not when this event arrives.
    SessionEnded {
        /// Error the hardware attached to the end of the session, if any.
        error: Option<String>,
    },

    /// The hardware asked to present its review UI and was told to proceed.
    ReviewPresented,

    /// A heading update was discarded because its accuracy was invalid.
    HeadingRejected {
        /// The reported accuracy.
        accuracy: f64,
    },

    /// The session completed with an artifact.
    Completed {
        /// Heading attached to the artifact, in degrees.
        heading: Option<f64>,
    },

    /// The session completed with an error.
    Failed {
        /// Description of the failure.
        error: String,
    },

    /// The session released its hardware and is torn down.
    TornDown,
}

/// Callback type for receiving runtime events.
///
/// Register one via [`CaptureSessionBuilder::on_event()`].
///
/// [`CaptureSessionBuilder::on_event()`]: crate::CaptureSessionBuilder::on_event
pub type EventCallback = Arc<dyn Fn(CaptureEvent) + Send + Sync>;

/// Creates an [`EventCallback`] from a closure.
///
/// # Example
///
/// ```
/// use capture_route::{event_callback, CaptureEvent};
///
/// let callback = event_callback(|event| {
///     println!("Got event: {:?}", event);
/// });
/// callback(CaptureEvent::StopObserved);
/// ```
pub fn event_callback<F>(f: F) -> EventCallback
where
    F: Fn(CaptureEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}
