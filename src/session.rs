//! Capture session handle and shared session state.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::pipeline::SessionMessage;
use crate::CaptureError;

/// Lifecycle phase of a capture session.
///
/// ```text
/// Idle ──start──► Running ──stop observed──► StopRequested ──result──► Stopped
///                    └──────────── hardware failure ───────────────────►┘
/// any phase ──dismantle──► TornDown
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionPhase {
    /// Built but not started.
    Idle = 0,
    /// The native session is running.
    Running = 1,
    /// The hardware was told to stop and the result is pending.
    StopRequested = 2,
    /// The session completed, successfully or not.
    Stopped = 3,
    /// The hardware was released. Terminal.
    TornDown = 4,
}

impl SessionPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::StopRequested,
            3 => Self::Stopped,
            _ => Self::TornDown,
        }
    }
}

/// State shared between the [`CaptureCoordinator`] and its worker.
///
/// The worker writes the phase; the handle writes the start, stop and
/// teardown requests. The stop flag is armed by the handle and cleared only
/// by the worker.
pub(crate) struct SessionShared {
    phase: AtomicU8,
    started: AtomicBool,
    stop_pending: AtomicBool,
    teardown_requested: AtomicBool,
}

impl SessionShared {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(SessionPhase::Idle as u8),
            started: AtomicBool::new(false),
            stop_pending: AtomicBool::new(false),
            teardown_requested: AtomicBool::new(false),
        }
    }

    /// Current phase. Reads as `TornDown` as soon as teardown was requested.
    pub fn phase(&self) -> SessionPhase {
        if self.teardown_requested.load(Ordering::SeqCst) {
            return SessionPhase::TornDown;
        }
        SessionPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub fn set_phase(&self, phase: SessionPhase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }

    /// Returns `true` for the first caller only.
    pub fn claim_start(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }

    /// Returns `true` for the first caller only.
    pub fn request_teardown(&self) -> bool {
        !self.teardown_requested.swap(true, Ordering::SeqCst)
    }

    pub fn arm_stop(&self) {
        self.stop_pending.store(true, Ordering::SeqCst);
    }

    pub fn stop_pending(&self) -> bool {
        self.stop_pending.load(Ordering::SeqCst)
    }

    /// Clears the stop flag, returning whether it was armed.
    pub fn take_stop(&self) -> bool {
        self.stop_pending.swap(false, Ordering::SeqCst)
    }
}

/// Handle to a capture session.
///
/// Returned by [`CaptureSessionBuilder::build()`]. The session itself runs
/// on a background worker; this handle only posts requests to it.
///
/// # Lifecycle
///
/// 1. Created by [`CaptureSessionBuilder::build()`] in the `Idle` phase
/// 2. [`start()`](Self::start) opens the native session and heading sampling
/// 3. [`request_stop()`](Self::request_stop) asks the hardware to finish;
///    the result arrives through `on_complete` or `on_error`
/// 4. [`dismantle()`](Self::dismantle) releases the hardware. Dropping the
///    handle does the same in the background (but prefer explicit `dismantle()`)
///
/// # Example
///
/// ```ignore
/// let mut session = CaptureSession::builder()
///     .backend(backend)
///     .on_complete(|artifact| println!("{} bytes", artifact.geometry().len()))
///     .build()?;
///
/// session.start()?;
/// // ... user scans ...
/// session.request_stop()?;
/// // ... later, when the view goes away:
/// session.dismantle().await;
/// ```
///
/// [`CaptureSessionBuilder::build()`]: crate::CaptureSessionBuilder::build
pub struct CaptureCoordinator {
    shared: Arc<SessionShared>,
    tx: mpsc::UnboundedSender<SessionMessage>,
    worker: Option<JoinHandle<()>>,
}

impl CaptureCoordinator {
    pub(crate) fn new(
        shared: Arc<SessionShared>,
        tx: mpsc::UnboundedSender<SessionMessage>,
        worker: JoinHandle<()>,
    ) -> Self {
        Self {
            shared,
            tx,
            worker: Some(worker),
        }
    }

    /// Opens the native session and, if supported, starts heading sampling.
    ///
    /// A failure to open the session is reported through `on_error`, not here.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::AlreadyStarted`] on a second call and
    /// [`CaptureError::TornDown`] after teardown.
    pub fn start(&self) -> Result<(), CaptureError> {
        if self.is_torn_down() {
            return Err(CaptureError::TornDown);
        }
        if !self.shared.claim_start() {
            return Err(CaptureError::AlreadyStarted);
        }
        self.send(SessionMessage::Start)
    }

    /// Asks the session to stop.
    ///
    /// Repeated requests before the worker observes the first one collapse
    /// into a single stop. Requests after the session stopped are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::TornDown`] after teardown.
    pub fn request_stop(&self) -> Result<(), CaptureError> {
        match self.phase() {
            SessionPhase::TornDown => Err(CaptureError::TornDown),
            SessionPhase::StopRequested | SessionPhase::Stopped => {
                tracing::debug!("stop requested after session stopped; ignoring");
                Ok(())
            }
            SessionPhase::Idle | SessionPhase::Running => {
                self.shared.arm_stop();
                self.send(SessionMessage::StopNudge)
            }
        }
    }

    /// Returns `true` while a stop request waits to be observed.
    pub fn stop_pending(&self) -> bool {
        self.shared.stop_pending()
    }

    /// Returns the current session phase.
    pub fn phase(&self) -> SessionPhase {
        self.shared.phase()
    }

    /// Returns `true` once teardown was requested.
    pub fn is_torn_down(&self) -> bool {
        self.phase() == SessionPhase::TornDown
    }

    /// Stops the native session and heading sampling, whatever the phase.
    ///
    /// Resolves once the hardware has been released. Idempotent: later calls
    /// return immediately and never trigger further completion callbacks.
    pub async fn dismantle(&mut self) {
        if self.shared.request_teardown() {
            let (ack_tx, ack_rx) = oneshot::channel();
            if self.tx.send(SessionMessage::Dismantle(Some(ack_tx))).is_ok() {
                let _ = ack_rx.await;
            }
        }

        if let Some(handle) = self.worker.take() {
            let _ = handle.await;
        }
    }

    fn send(&self, message: SessionMessage) -> Result<(), CaptureError> {
        self.tx.send(message).map_err(|_| CaptureError::TornDown)
    }
}

impl Drop for CaptureCoordinator {
    fn drop(&mut self) {
        if self.shared.request_teardown() {
            // Dropped without dismantle() - release the hardware in the background
            let _ = self.tx.send(SessionMessage::Dismantle(None));
        }
    }
}

impl std::fmt::Debug for CaptureCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureCoordinator")
            .field("phase", &self.phase())
            .field("stop_pending", &self.stop_pending())
            .finish_non_exhaustive()
    }
}
