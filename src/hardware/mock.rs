//! Mock hardware for testing without a scanning device.
//!
//! Each mock comes with a control handle that records how the coordinator
//! drove the hardware and lets a test fire hardware callbacks, making the
//! full session lifecycle testable in CI.
//!
//! # Example
//!
//! ```
//! use capture_route::hardware::mock::{MockCaptureBackend, MockHeadingProvider};
//!
//! let (backend, capture) = MockCaptureBackend::new();
//! let (heading, compass) = MockHeadingProvider::new();
//!
//! // Hand `backend` and `heading` to the session builder, then:
//! assert_eq!(capture.run_calls(), 0);
//! assert!(!compass.emit(42.0, 5.0)); // not started yet
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use super::{CaptureBackend, HeadingListener, HeadingProvider, SessionListeners};
use crate::{CaptureError, CapturedGeometry, SessionConfig};

#[derive(Default)]
struct CaptureState {
    listeners: Option<SessionListeners>,
    run_calls: usize,
    stop_calls: usize,
    fail_run: Option<String>,
    complete_on_stop: Option<CapturedGeometry>,
}

/// Mock capture backend.
///
/// By default `run` succeeds and the session waits for the test to fire
/// callbacks through [`MockCaptureControl`].
pub struct MockCaptureBackend {
    state: Arc<Mutex<CaptureState>>,
}

/// Test handle for a [`MockCaptureBackend`].
#[derive(Clone)]
pub struct MockCaptureControl {
    state: Arc<Mutex<CaptureState>>,
}

impl MockCaptureBackend {
    /// Creates a backend whose session runs until the test completes it.
    pub fn new() -> (Self, MockCaptureControl) {
        Self::with_state(CaptureState::default())
    }

    /// Creates a backend whose `run` fails with the given reason.
    pub fn failing(reason: impl Into<String>) -> (Self, MockCaptureControl) {
        Self::with_state(CaptureState {
            fail_run: Some(reason.into()),
            ..CaptureState::default()
        })
    }

    /// Creates a backend that behaves like real hardware on `stop`: it ends
    /// the session and then delivers the given geometry as the result.
    pub fn completing_on_stop(geometry: CapturedGeometry) -> (Self, MockCaptureControl) {
        Self::with_state(CaptureState {
            complete_on_stop: Some(geometry),
            ..CaptureState::default()
        })
    }

    fn with_state(state: CaptureState) -> (Self, MockCaptureControl) {
        let state = Arc::new(Mutex::new(state));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockCaptureControl { state },
        )
    }
}

impl CaptureBackend for MockCaptureBackend {
    fn run(
        &mut self,
        _config: &SessionConfig,
        listeners: SessionListeners,
    ) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        state.run_calls += 1;
        if let Some(reason) = &state.fail_run {
            return Err(CaptureError::backend(reason.clone()));
        }
        state.listeners = Some(listeners);
        Ok(())
    }

    fn stop(&mut self) {
        let (listeners, geometry) = {
            let mut state = self.state.lock();
            state.stop_calls += 1;
            (state.listeners.clone(), state.complete_on_stop.take())
        };

        if let (Some(listeners), Some(geometry)) = (listeners, geometry) {
            listeners.session.session_ended(None);
            listeners.review.should_present(None);
            listeners.session.result_ready(Ok(geometry));
        }
    }

    fn name(&self) -> &'static str {
        "MockCapture"
    }
}

impl MockCaptureControl {
    /// Number of times the coordinator called `run`.
    pub fn run_calls(&self) -> usize {
        self.state.lock().run_calls
    }

    /// Number of times the coordinator called `stop`.
    pub fn stop_calls(&self) -> usize {
        self.state.lock().stop_calls
    }

    /// Returns `true` once the session is running and callbacks can be fired.
    pub fn is_running(&self) -> bool {
        self.state.lock().listeners.is_some()
    }

    /// Fires the advisory session-ended callback.
    pub fn end_session(&self, error: Option<CaptureError>) -> bool {
        self.with_listeners(|l| l.session.session_ended(error))
    }

    /// Fires the review prompt and returns the coordinator's answer.
    pub fn prompt_review(&self) -> Option<bool> {
        let listeners = self.state.lock().listeners.clone();
        listeners.map(|l| l.review.should_present(None))
    }

    /// Delivers a successful result.
    pub fn finish(&self, geometry: CapturedGeometry) -> bool {
        self.with_listeners(|l| l.session.result_ready(Ok(geometry)))
    }

    /// Delivers a failed result.
    pub fn fail(&self, error: CaptureError) -> bool {
        self.with_listeners(|l| l.session.result_ready(Err(error)))
    }

    // Callbacks run outside the lock, as real hardware would call back later.
    fn with_listeners(&self, f: impl FnOnce(&SessionListeners)) -> bool {
        let listeners = self.state.lock().listeners.clone();
        match listeners {
            Some(listeners) => {
                f(&listeners);
                true
            }
            None => false,
        }
    }
}

#[derive(Default)]
struct HeadingState {
    listener: Option<HeadingListener>,
    start_calls: usize,
    stop_calls: usize,
}

/// Mock heading provider.
pub struct MockHeadingProvider {
    state: Arc<Mutex<HeadingState>>,
}

/// Test handle for a [`MockHeadingProvider`].
#[derive(Clone)]
pub struct MockHeadingControl {
    state: Arc<Mutex<HeadingState>>,
}

impl MockHeadingProvider {
    /// Creates a provider and its control handle.
    pub fn new() -> (Self, MockHeadingControl) {
        let state = Arc::new(Mutex::new(HeadingState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockHeadingControl { state },
        )
    }
}

impl HeadingProvider for MockHeadingProvider {
    fn start_updates(&mut self, listener: HeadingListener) {
        let mut state = self.state.lock();
        state.start_calls += 1;
        state.listener = Some(listener);
    }

    fn stop_updates(&mut self) {
        let mut state = self.state.lock();
        state.stop_calls += 1;
        state.listener = None;
    }
}

impl MockHeadingControl {
    /// Number of times updates were started.
    pub fn start_calls(&self) -> usize {
        self.state.lock().start_calls
    }

    /// Number of times updates were stopped.
    pub fn stop_calls(&self) -> usize {
        self.state.lock().stop_calls
    }

    /// Returns `true` while updates are running.
    pub fn is_sampling(&self) -> bool {
        self.state.lock().listener.is_some()
    }

    /// Emits a heading update. Returns `false` if updates are not running.
    pub fn emit(&self, degrees: f64, accuracy: f64) -> bool {
        let listener = self.state.lock().listener.clone();
        match listener {
            Some(listener) => {
                listener.heading_updated(degrees, accuracy);
                true
            }
            None => false,
        }
    }
}
