//! Device heading sampling.
//!
//! The tracker keeps only the most recent sample whose reported accuracy is
//! valid. It is owned by the session worker, so updates and the read at
//! completion time happen on the same serial context.

use crate::hardware::{HeadingListener, HeadingProvider};

/// A device heading in degrees from magnetic north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSample {
    degrees: f64,
}

impl HeadingSample {
    /// Creates a sample for the given heading.
    pub fn new(degrees: f64) -> Self {
        Self { degrees }
    }

    /// Returns the heading in degrees.
    pub fn degrees(&self) -> f64 {
        self.degrees
    }
}

/// Tracks the latest valid heading reported by a [`HeadingProvider`].
///
/// Updates with negative (or NaN) accuracy are rejected and leave the last
/// valid sample untouched.
///
/// # Example
///
/// ```
/// use capture_route::HeadingTracker;
///
/// let mut tracker = HeadingTracker::new(None);
/// assert!(tracker.record(12.5, 5.0));
/// assert!(!tracker.record(80.0, -1.0));
/// assert_eq!(tracker.latest().map(|h| h.degrees()), Some(12.5));
/// ```
pub struct HeadingTracker {
    provider: Option<Box<dyn HeadingProvider>>,
    latest: Option<HeadingSample>,
    sampling: bool,
}

impl HeadingTracker {
    /// Creates a tracker over an optional provider.
    ///
    /// Without a provider the tracker never samples, but still accepts
    /// updates recorded directly.
    pub fn new(provider: Option<Box<dyn HeadingProvider>>) -> Self {
        Self {
            provider,
            latest: None,
            sampling: false,
        }
    }

    /// Starts heading updates. Returns `false` if there is no provider.
    pub fn start(&mut self, listener: HeadingListener) -> bool {
        let Some(provider) = self.provider.as_mut() else {
            return false;
        };
        provider.start_updates(listener);
        self.sampling = true;
        true
    }

    /// Stops heading updates.
    ///
    /// The provider is told to stop even if sampling was never started.
    pub fn stop(&mut self) {
        if let Some(provider) = self.provider.as_mut() {
            provider.stop_updates();
        }
        self.sampling = false;
    }

    /// Returns `true` while updates are running.
    pub fn is_sampling(&self) -> bool {
        self.sampling
    }

    /// Records an update. Returns `true` if it was accepted.
    pub fn record(&mut self, degrees: f64, accuracy: f64) -> bool {
        if accuracy >= 0.0 {
            self.latest = Some(HeadingSample::new(degrees));
            true
        } else {
            false
        }
    }

    /// Returns the latest valid sample, if any.
    pub fn latest(&self) -> Option<HeadingSample> {
        self.latest
    }
}

impl std::fmt::Debug for HeadingTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadingTracker")
            .field("has_provider", &self.provider.is_some())
            .field("latest", &self.latest)
            .field("sampling", &self.sampling)
            .finish()
    }
}
