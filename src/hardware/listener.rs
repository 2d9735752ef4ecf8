//! Single-capability listeners handed to hardware backends.
//!
//! Each listener covers exactly one hardware callback surface and forwards
//! into the session's serial context. They are cheap to clone and safe to
//! call from any thread; calls made after teardown are dropped.

use tokio::sync::mpsc;

use crate::pipeline::SessionMessage;
use crate::{CaptureError, CapturedGeometry};

/// Receives session lifecycle callbacks from a [`CaptureBackend`](super::CaptureBackend).
#[derive(Debug, Clone)]
pub struct SessionListener {
    tx: mpsc::UnboundedSender<SessionMessage>,
}

impl SessionListener {
    /// The hardware session ended, optionally with an error.
    ///
    /// Advisory only: this never completes the session.
    pub fn session_ended(&self, error: Option<CaptureError>) {
        forward(&self.tx, SessionMessage::SessionEnded(error));
    }

    /// The final result is ready.
    ///
    /// The first call completes the session; later calls are ignored.
    pub fn result_ready(&self, result: Result<CapturedGeometry, CaptureError>) {
        forward(&self.tx, SessionMessage::ResultReady(result));
    }
}

/// Answers the hardware's request to present its review UI.
#[derive(Debug, Clone)]
pub struct ReviewListener {
    tx: mpsc::UnboundedSender<SessionMessage>,
}

impl ReviewListener {
    /// Returns whether the hardware should present its review UI.
    ///
    /// Always `true`: the review step is part of finishing a capture.
    pub fn should_present(&self, error: Option<&CaptureError>) -> bool {
        if let Some(error) = error {
            tracing::debug!(%error, "presenting capture review after error");
        }
        forward(&self.tx, SessionMessage::ReviewPresented);
        true
    }
}

/// Receives heading updates from a [`HeadingProvider`](super::HeadingProvider).
#[derive(Debug, Clone)]
pub struct HeadingListener {
    tx: mpsc::UnboundedSender<SessionMessage>,
}

impl HeadingListener {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SessionMessage>) -> Self {
        Self { tx }
    }

    /// A new heading reading. Negative accuracy marks the reading invalid.
    pub fn heading_updated(&self, degrees: f64, accuracy: f64) {
        forward(&self.tx, SessionMessage::Heading { degrees, accuracy });
    }

    #[cfg(test)]
    pub(crate) fn detached() -> (Self, mpsc::UnboundedReceiver<SessionMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

/// The listeners a capture backend receives when its session runs.
#[derive(Debug, Clone)]
pub struct SessionListeners {
    /// Session lifecycle callbacks.
    pub session: SessionListener,
    /// Review UI prompt.
    pub review: ReviewListener,
}

impl SessionListeners {
    pub(crate) fn new(tx: &mpsc::UnboundedSender<SessionMessage>) -> Self {
        Self {
            session: SessionListener { tx: tx.clone() },
            review: ReviewListener { tx: tx.clone() },
        }
    }
}

fn forward(tx: &mpsc::UnboundedSender<SessionMessage>, message: SessionMessage) {
    if tx.send(message).is_err() {
        tracing::trace!("hardware callback after teardown dropped");
    }
}
