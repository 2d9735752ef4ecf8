//! Submitting validated drafts to the link creation service.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::request::{HitCreationRequest, LinkDraft};
use super::response::{CreatedLinks, HitCreationResponse};
use crate::DistributionError;

/// The remote service that creates task links.
///
/// Implementations own the transport. Map transport failures to
/// [`DistributionError::Network`] and error statuses to
/// [`DistributionError::Server`].
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use capture_route::{
///     DistributionError, HitCreationRequest, HitCreationResponse, HitCreationService,
/// };
///
/// struct FixedLink;
///
/// #[async_trait]
/// impl HitCreationService for FixedLink {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     async fn create(
///         &self,
///         _request: &HitCreationRequest,
///     ) -> Result<HitCreationResponse, DistributionError> {
///         Ok(HitCreationResponse {
///             hits: None,
///             url: Some("https://tasks.example/t/1".into()),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait HitCreationService: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Creates links for a validated request.
    async fn create(
        &self,
        request: &HitCreationRequest,
    ) -> Result<HitCreationResponse, DistributionError>;
}

/// Drives link creation with at most one request in flight.
///
/// # Example
///
/// ```ignore
/// let workflow = LinkDistributionWorkflow::new(service);
/// let draft = LinkDraft::new(DistributionMode::Open).description("Tag these photos");
///
/// match workflow.submit(&draft).await {
///     Ok(links) => println!("share {}", links.primary),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub struct LinkDistributionWorkflow<S> {
    service: S,
    busy: AtomicBool,
}

impl<S: HitCreationService> LinkDistributionWorkflow<S> {
    /// Creates an idle workflow over the given service.
    pub fn new(service: S) -> Self {
        Self {
            service,
            busy: AtomicBool::new(false),
        }
    }

    /// Returns the underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Returns `true` while a submission is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Returns `true` if the draft is valid and nothing is in flight.
    pub fn can_submit(&self, draft: &LinkDraft) -> bool {
        !self.is_busy() && draft.is_valid()
    }

    /// Validates the draft and asks the service for links.
    ///
    /// An invalid draft never reaches the service. The busy flag is cleared
    /// whether the request succeeds or fails.
    ///
    /// # Errors
    ///
    /// - [`DistributionError::Validation`] if the draft is invalid
    /// - [`DistributionError::InFlight`] if another submission is outstanding
    /// - [`DistributionError::NoLinkResolved`] if the response carries no link
    /// - any error reported by the service
    pub async fn submit(&self, draft: &LinkDraft) -> Result<CreatedLinks, DistributionError> {
        let request = draft.validate()?;
        let _busy = BusyGuard::acquire(&self.busy).ok_or(DistributionError::InFlight)?;

        tracing::debug!(
            service = self.service.name(),
            mode = %request.mode(),
            participants = request.participants().map_or(0, <[String]>::len),
            "requesting task links"
        );

        let response = self.service.create(&request).await.map_err(|e| {
            tracing::warn!(service = self.service.name(), error = %e, "link request failed");
            e
        })?;

        let links = CreatedLinks::from_response(response).ok_or(DistributionError::NoLinkResolved)?;
        tracing::info!(primary = %links.primary, hits = links.hits.len(), "task links created");
        Ok(links)
    }
}

impl<S> std::fmt::Debug for LinkDistributionWorkflow<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkDistributionWorkflow")
            .field("busy", &self.busy.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Holds the busy flag for the lifetime of one submission.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
