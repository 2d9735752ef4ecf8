//! Captured artifacts handed out by a finished session.

use std::sync::Arc;

use crate::heading::HeadingSample;

/// Opaque geometry payload produced by the capture hardware.
///
/// The crate never interprets the bytes; storage and rendering belong to
/// the caller. The payload is `Arc`-wrapped so clones are cheap.
///
/// # Example
///
/// ```
/// use capture_route::CapturedGeometry;
///
/// let geometry = CapturedGeometry::new(vec![1, 2, 3]);
/// assert_eq!(geometry.len(), 3);
/// let shared = geometry.clone(); // shares the payload
/// assert_eq!(shared.as_bytes(), &[1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedGeometry {
    payload: Arc<Vec<u8>>,
}

impl CapturedGeometry {
    /// Wraps a raw payload.
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload: Arc::new(payload),
        }
    }

    /// Returns the raw payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Returns `true` if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl From<Vec<u8>> for CapturedGeometry {
    fn from(payload: Vec<u8>) -> Self {
        Self::new(payload)
    }
}

/// The result of a successfully finished capture session.
///
/// Carries the geometry and the latest valid heading observed before the
/// result became ready. The heading is `None` when the device never reported
/// a sample with valid accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedArtifact {
    geometry: CapturedGeometry,
    heading: Option<HeadingSample>,
}

impl CapturedArtifact {
    pub(crate) fn new(geometry: CapturedGeometry, heading: Option<HeadingSample>) -> Self {
        Self { geometry, heading }
    }

    /// Returns the captured geometry.
    pub fn geometry(&self) -> &CapturedGeometry {
        &self.geometry
    }

    /// Returns the heading at completion time, if one was sampled.
    pub fn heading(&self) -> Option<HeadingSample> {
        self.heading
    }

    /// Splits the artifact into geometry and heading.
    pub fn into_parts(self) -> (CapturedGeometry, Option<HeadingSample>) {
        (self.geometry, self.heading)
    }
}
