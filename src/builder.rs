//! Builder pattern for capture sessions.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::hardware::{CapabilityProvider, CaptureBackend, DeviceCapabilities, HeadingProvider};
use crate::heading::HeadingTracker;
use crate::pipeline::{CompleteCallback, Completion, ErrorCallback, SessionWorker};
use crate::session::{CaptureCoordinator, SessionShared};
use crate::{
    event_callback, CaptureError, CaptureEvent, CapturedArtifact, EventCallback, SessionConfig,
};

/// Builder for configuring a capture session.
///
/// Use [`CaptureSession::builder()`] to create a new builder.
///
/// # Example
///
/// ```
/// use capture_route::hardware::mock::{MockCaptureBackend, MockHeadingProvider};
/// use capture_route::{CaptureSession, DeviceCapabilities};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), capture_route::CaptureError> {
/// let (backend, _capture) = MockCaptureBackend::new();
/// let (heading, _compass) = MockHeadingProvider::new();
///
/// let mut session = CaptureSession::builder()
///     .backend(backend)
///     .heading_provider(heading)
///     .capabilities(DeviceCapabilities::all())
///     .on_complete(|artifact| println!("captured {} bytes", artifact.geometry().len()))
///     .on_error(|err| eprintln!("capture failed: {err}"))
///     .build()?;
///
/// session.start()?;
/// session.dismantle().await;
/// # Ok(())
/// # }
/// ```
///
/// [`CaptureSession::builder()`]: crate::CaptureSession::builder
#[must_use]
pub struct CaptureSessionBuilder {
    /// Native capture session.
    backend: Option<Box<dyn CaptureBackend>>,
    /// Heading source, if the platform has one.
    heading: Option<Box<dyn HeadingProvider>>,
    /// Resolved once in `build()`.
    capabilities: Arc<dyn CapabilityProvider>,
    /// Session configuration.
    config: SessionConfig,
    on_complete: Option<CompleteCallback>,
    on_error: Option<ErrorCallback>,
    /// Event callback.
    event_callback: Option<EventCallback>,
}

impl Default for CaptureSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            backend: None,
            heading: None,
            capabilities: Arc::new(DeviceCapabilities::all()),
            config: SessionConfig::default(),
            on_complete: None,
            on_error: None,
            event_callback: None,
        }
    }

    /// Set the native capture backend. Required.
    pub fn backend<B: CaptureBackend + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Set the heading provider.
    ///
    /// Without one, artifacts never carry a heading.
    pub fn heading_provider<H: HeadingProvider + 'static>(mut self, provider: H) -> Self {
        self.heading = Some(Box::new(provider));
        self
    }

    /// Set the capability provider queried at build time.
    ///
    /// Default: [`DeviceCapabilities::all()`]
    pub fn capabilities<P: CapabilityProvider + 'static>(mut self, provider: P) -> Self {
        self.capabilities = Arc::new(provider);
        self
    }

    /// Set custom session configuration.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the callback for a successful capture.
    ///
    /// Runs on the session worker; hand heavy work off to another task.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(CapturedArtifact) + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Set the callback for a failed capture.
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(CaptureError) + Send + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Set a callback to receive runtime events.
    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: Fn(CaptureEvent) + Send + Sync + 'static,
    {
        self.event_callback = Some(event_callback(callback));
        self
    }

    /// Validates the builder configuration and resolves device capabilities.
    fn validate(&self) -> Result<DeviceCapabilities, CaptureError> {
        if self.backend.is_none() {
            return Err(CaptureError::NoBackendConfigured);
        }

        let capabilities = self.capabilities.resolve();
        if !capabilities.capture {
            return Err(CaptureError::CaptureUnsupported);
        }
        Ok(capabilities)
    }

    /// Build the session and spawn its worker on the current Tokio runtime.
    ///
    /// The session starts in the `Idle` phase; call
    /// [`start()`](CaptureCoordinator::start) to open the hardware.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No backend is configured
    /// - The device cannot capture
    /// - There is no Tokio runtime on this thread
    pub fn build(self) -> Result<CaptureCoordinator, CaptureError> {
        let capabilities = self.validate()?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| CaptureError::NoRuntime)?;

        let Self {
            backend,
            heading,
            config,
            on_complete,
            on_error,
            event_callback,
            ..
        } = self;
        let backend = backend.ok_or(CaptureError::NoBackendConfigured)?;

        let heading_enabled = config.heading_sampling && capabilities.heading && heading.is_some();
        if config.heading_sampling && !heading_enabled {
            tracing::debug!(
                device_heading = capabilities.heading,
                "heading sampling unavailable for this session"
            );
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(SessionShared::new());
        let worker = SessionWorker::new(
            backend,
            HeadingTracker::new(heading),
            heading_enabled,
            config,
            Arc::clone(&shared),
            Completion {
                on_complete,
                on_error,
            },
            event_callback,
            &tx,
        );
        let handle = runtime.spawn(worker.run(rx));

        Ok(CaptureCoordinator::new(shared, tx, handle))
    }
}

/// Main entry point for capture sessions.
///
/// Use [`CaptureSession::builder()`] to start configuring a session.
pub struct CaptureSession;

impl CaptureSession {
    /// Creates a new builder for configuring a capture session.
    pub fn builder() -> CaptureSessionBuilder {
        CaptureSessionBuilder::new()
    }
}
