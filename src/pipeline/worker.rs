//! Session worker task - the serial context for one capture session.
//!
//! The worker owns the native backend and the heading tracker, applies the
//! session state machine, and fires the completion callbacks exactly once.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use crate::event::EventCallback;
use crate::hardware::{CaptureBackend, HeadingListener, SessionListeners};
use crate::heading::HeadingTracker;
use crate::session::{SessionPhase, SessionShared};
use crate::{CaptureError, CaptureEvent, CapturedArtifact, CapturedGeometry, SessionConfig};

/// Lower bound for the stop poll period (`tokio::time::interval` rejects zero).
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Callback invoked with the artifact of a successful session.
pub type CompleteCallback = Box<dyn FnOnce(CapturedArtifact) + Send>;

/// Callback invoked with the error of a failed session.
pub type ErrorCallback = Box<dyn FnOnce(CaptureError) + Send>;

/// Input to the session worker.
#[derive(Debug)]
pub(crate) enum SessionMessage {
    /// Open the native session.
    Start,
    /// A stop request was armed; check the flag now rather than on the next poll.
    StopNudge,
    /// Heading reading from the provider.
    Heading { degrees: f64, accuracy: f64 },
    /// Advisory end of the hardware session.
    SessionEnded(Option<CaptureError>),
    /// Final result from the hardware.
    ResultReady(Result<CapturedGeometry, CaptureError>),
    /// The hardware review UI was allowed to present.
    ReviewPresented,
    /// Release the hardware and exit. The sender, if any, is acked afterwards.
    Dismantle(Option<oneshot::Sender<()>>),
}

/// The two mutually exclusive completion callbacks of a session.
///
/// Consumed as a whole on the first result, so at most one of them ever runs.
pub(crate) struct Completion {
    pub on_complete: Option<CompleteCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl Completion {
    fn succeed(self, artifact: CapturedArtifact) {
        match self.on_complete {
            Some(callback) => callback(artifact),
            None => tracing::debug!("capture completed without an on_complete callback"),
        }
    }

    fn fail(self, error: CaptureError) {
        match self.on_error {
            Some(callback) => callback(error),
            None => tracing::debug!(%error, "capture failed without an on_error callback"),
        }
    }
}

/// Owns everything a running session touches.
pub(crate) struct SessionWorker {
    backend: Box<dyn CaptureBackend>,
    heading: HeadingTracker,
    heading_enabled: bool,
    config: SessionConfig,
    shared: Arc<SessionShared>,
    completion: Option<Completion>,
    event_callback: Option<EventCallback>,
    listeners: SessionListeners,
    heading_listener: HeadingListener,
    /// Set once the hardware was released.
    torn_down: bool,
}

impl SessionWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        backend: Box<dyn CaptureBackend>,
        heading: HeadingTracker,
        heading_enabled: bool,
        config: SessionConfig,
        shared: Arc<SessionShared>,
        completion: Completion,
        event_callback: Option<EventCallback>,
        tx: &mpsc::UnboundedSender<SessionMessage>,
    ) -> Self {
        Self {
            backend,
            heading,
            heading_enabled,
            config,
            shared,
            completion: Some(completion),
            event_callback,
            listeners: SessionListeners::new(tx),
            heading_listener: HeadingListener::new(tx.clone()),
            torn_down: false,
        }
    }

    /// Runs the worker until the session is dismantled.
    ///
    /// This is the main entry point for the worker task.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<SessionMessage>) {
        let mut poll = tokio::time::interval(self.config.stop_poll_interval.max(MIN_POLL_INTERVAL));
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                message = rx.recv() => {
                    // The worker holds senders of its own, so the channel stays open.
                    let Some(message) = message else {
                        return;
                    };
                    if self.handle(message).is_break() {
                        return;
                    }
                }
                _ = poll.tick() => {}
            }
            self.observe_stop();
        }
    }

    fn emit_event(&self, event: CaptureEvent) {
        if let Some(ref callback) = self.event_callback {
            callback(event);
        }
    }

    fn handle(&mut self, message: SessionMessage) -> ControlFlow<()> {
        match message {
            SessionMessage::Start => self.start(),
            SessionMessage::StopNudge => {}
            SessionMessage::Heading { degrees, accuracy } => {
                if !self.heading.record(degrees, accuracy) {
                    tracing::trace!(degrees, accuracy, "heading update rejected");
                    self.emit_event(CaptureEvent::HeadingRejected { accuracy });
                }
            }
            SessionMessage::SessionEnded(error) => {
                tracing::debug!(error = ?error, "capture session ended");
                self.emit_event(CaptureEvent::SessionEnded {
                    error: error.map(|e| e.to_string()),
                });
            }
            SessionMessage::ResultReady(result) => self.complete(result),
            SessionMessage::ReviewPresented => self.emit_event(CaptureEvent::ReviewPresented),
            SessionMessage::Dismantle(ack) => {
                self.teardown();
                if let Some(ack) = ack {
                    let _ = ack.send(());
                }
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn start(&mut self) {
        let phase = self.shared.phase();
        if phase != SessionPhase::Idle {
            tracing::debug!(?phase, "ignoring start outside the idle phase");
            return;
        }

        match self.backend.run(&self.config, self.listeners.clone()) {
            Ok(()) => {
                let heading_sampling =
                    self.heading_enabled && self.heading.start(self.heading_listener.clone());
                self.shared.set_phase(SessionPhase::Running);
                tracing::info!(
                    backend = self.backend.name(),
                    heading_sampling,
                    "capture session running"
                );
                self.emit_event(CaptureEvent::SessionStarted {
                    backend: self.backend.name(),
                    heading_sampling,
                });
            }
            Err(error) => {
                tracing::error!(
                    %error,
                    backend = self.backend.name(),
                    "capture session failed to start"
                );
                self.complete(Err(error));
            }
        }
    }

    /// Consumes a pending stop request.
    ///
    /// The flag is only cleared here. While idle it stays armed so a stop
    /// requested before the session is running still applies once it is.
    fn observe_stop(&mut self) {
        if !self.shared.stop_pending() {
            return;
        }

        match self.shared.phase() {
            SessionPhase::Running => {
                if self.shared.take_stop() {
                    self.shared.set_phase(SessionPhase::StopRequested);
                    self.backend.stop();
                    tracing::debug!("stop request observed");
                    self.emit_event(CaptureEvent::StopObserved);
                }
            }
            SessionPhase::StopRequested | SessionPhase::Stopped => {
                self.shared.take_stop();
            }
            SessionPhase::Idle | SessionPhase::TornDown => {}
        }
    }

    fn complete(&mut self, result: Result<CapturedGeometry, CaptureError>) {
        let Some(completion) = self.completion.take() else {
            tracing::debug!("result after completion ignored");
            return;
        };
        self.shared.set_phase(SessionPhase::Stopped);

        match result {
            Ok(geometry) => {
                let heading = self.heading.latest();
                tracing::info!(
                    bytes = geometry.len(),
                    heading = heading.map(|h| h.degrees()),
                    "capture completed"
                );
                self.emit_event(CaptureEvent::Completed {
                    heading: heading.map(|h| h.degrees()),
                });
                completion.succeed(CapturedArtifact::new(geometry, heading));
            }
            Err(error) => {
                tracing::warn!(%error, "capture failed");
                self.emit_event(CaptureEvent::Failed {
                    error: error.to_string(),
                });
                completion.fail(error);
            }
        }
    }

    /// Releases the hardware regardless of the current phase.
    fn teardown(&mut self) {
        if !self.release_hardware() {
            return;
        }
        tracing::info!(backend = self.backend.name(), "capture session torn down");
        self.emit_event(CaptureEvent::TornDown);
    }

    /// Stops the backend and heading once. Returns `false` if already released.
    fn release_hardware(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        self.backend.stop();
        self.heading.stop();
        if self.completion.take().is_some() {
            tracing::debug!("capture session torn down before completing");
        }
        self.shared.set_phase(SessionPhase::TornDown);
        true
    }
}

impl Drop for SessionWorker {
    fn drop(&mut self) {
        // Only acts if the task ended without a dismantle (a callback panicked or the
        // runtime shut down). No user callbacks here; this may run while unwinding.
        if self.release_hardware() {
            tracing::warn!(
                backend = self.backend.name(),
                "capture session worker exited early; hardware released"
            );
        }
    }
}
