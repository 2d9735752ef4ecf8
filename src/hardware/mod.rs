//! Hardware boundaries consumed by the capture coordinator.
//!
//! The native capture session, the heading provider and the device
//! capability query are each behind a small trait so that platform bindings
//! and test fakes plug in the same way. Hardware callbacks never reach the
//! coordinator directly: backends receive single-capability listeners that
//! forward into the session's serial context.

mod listener;
pub mod mock;

pub use listener::{HeadingListener, ReviewListener, SessionListener, SessionListeners};

use crate::{CaptureError, SessionConfig};

/// A native capture session.
///
/// Implementations wrap the platform scanning API. After a successful
/// [`run`](CaptureBackend::run) they report through the given listeners:
/// [`SessionListener::session_ended`] when the hardware stops (advisory),
/// [`SessionListener::result_ready`] once the artifact or error is final, and
/// [`ReviewListener::should_present`] when the hardware offers its review UI.
///
/// # Example
///
/// ```
/// use capture_route::{CaptureBackend, CaptureError, SessionConfig, SessionListeners};
///
/// struct NullBackend;
///
/// impl CaptureBackend for NullBackend {
///     fn run(
///         &mut self,
///         _config: &SessionConfig,
///         _listeners: SessionListeners,
///     ) -> Result<(), CaptureError> {
///         Ok(())
///     }
///
///     fn stop(&mut self) {}
///
///     fn name(&self) -> &'static str {
///         "null"
///     }
/// }
/// ```
pub trait CaptureBackend: Send {
    /// Opens the native session.
    ///
    /// An error here is a hardware failure and completes the session
    /// through `on_error`.
    fn run(&mut self, config: &SessionConfig, listeners: SessionListeners)
        -> Result<(), CaptureError>;

    /// Stops the native session.
    ///
    /// Must tolerate being called when the session is not running.
    fn stop(&mut self);

    /// Backend name for logging/debugging.
    fn name(&self) -> &'static str;
}

/// A source of device heading updates.
pub trait HeadingProvider: Send {
    /// Begins delivering `(degrees, accuracy)` updates to the listener.
    fn start_updates(&mut self, listener: HeadingListener);

    /// Stops delivering updates.
    ///
    /// Must tolerate being called when updates were never started.
    fn stop_updates(&mut self);
}

/// What the current device can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// The device can run a capture session.
    pub capture: bool,
    /// The device reports heading.
    pub heading: bool,
}

impl DeviceCapabilities {
    /// A device supporting everything.
    pub const fn all() -> Self {
        Self {
            capture: true,
            heading: true,
        }
    }
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// Resolves the device's capabilities.
///
/// Injected into the builder and queried once at
/// [`build()`](crate::CaptureSessionBuilder::build), so tests can substitute
/// fixed capabilities.
pub trait CapabilityProvider: Send + Sync {
    /// Returns the capabilities of the current device.
    fn resolve(&self) -> DeviceCapabilities;
}

impl CapabilityProvider for DeviceCapabilities {
    fn resolve(&self) -> DeviceCapabilities {
        *self
    }
}
