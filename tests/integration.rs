//! Integration tests for capture-route.
//!
//! Sessions run against the mock hardware in `capture_route::hardware::mock`;
//! results are observed through the completion callbacks and the event
//! stream, with `dismantle().await` as the final barrier.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use capture_route::hardware::mock::{MockCaptureBackend, MockHeadingProvider};
use capture_route::{
    suggest, AgentConnection, CaptureCoordinator, CaptureError, CaptureEvent, CaptureRouting,
    CaptureSession, CaptureSessionBuilder, CapturedArtifact, CapturedGeometry, DeviceCapabilities,
    DistributionError, DistributionMode, HitCreationRequest, HitCreationResponse,
    HitCreationService, HitLink, LinkDistributionWorkflow, LinkDraft, RoutingDecision,
    RoutingPresenter, SensorType, SessionPhase,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

/// Collects what a session reports.
struct Observed {
    events: mpsc::UnboundedReceiver<CaptureEvent>,
    completed: oneshot::Receiver<CapturedArtifact>,
    failed: oneshot::Receiver<CaptureError>,
    callbacks: Arc<AtomicUsize>,
}

impl Observed {
    async fn wait_for(&mut self, wanted: impl Fn(&CaptureEvent) -> bool) -> CaptureEvent {
        timeout(WAIT, async {
            loop {
                let event = self.events.recv().await.expect("event stream closed");
                if wanted(&event) {
                    return event;
                }
            }
        })
        .await
        .expect("timed out waiting for event")
    }

    fn drain(&mut self) -> Vec<CaptureEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    fn callbacks(&self) -> usize {
        self.callbacks.load(Ordering::SeqCst)
    }
}

/// Wires completion callbacks and events into an [`Observed`].
fn observe(builder: CaptureSessionBuilder) -> (CaptureSessionBuilder, Observed) {
    let (event_tx, events) = mpsc::unbounded_channel();
    let (complete_tx, completed) = oneshot::channel();
    let (error_tx, failed) = oneshot::channel();
    let callbacks = Arc::new(AtomicUsize::new(0));
    let on_complete = Arc::clone(&callbacks);
    let on_error = Arc::clone(&callbacks);

    let builder = builder
        .on_complete(move |artifact| {
            on_complete.fetch_add(1, Ordering::SeqCst);
            let _ = complete_tx.send(artifact);
        })
        .on_error(move |err| {
            on_error.fetch_add(1, Ordering::SeqCst);
            let _ = error_tx.send(err);
        })
        .on_event(move |event| {
            let _ = event_tx.send(event);
        });

    (
        builder,
        Observed {
            events,
            completed,
            failed,
            callbacks,
        },
    )
}

fn room_scan() -> CapturedGeometry {
    CapturedGeometry::new(vec![0x55; 64])
}

async fn started(session: &CaptureCoordinator, observed: &mut Observed) {
    session.start().unwrap();
    observed
        .wait_for(|e| matches!(e, CaptureEvent::SessionStarted { .. }))
        .await;
    assert_eq!(session.phase(), SessionPhase::Running);
}

#[tokio::test]
async fn test_artifact_carries_last_valid_heading() {
    let (backend, _capture) = MockCaptureBackend::completing_on_stop(room_scan());
    let (heading, compass) = MockHeadingProvider::new();
    let (builder, mut observed) =
        observe(CaptureSession::builder().backend(backend).heading_provider(heading));
    let mut session = builder.build().unwrap();

    started(&session, &mut observed).await;
    assert!(compass.emit(10.0, 5.0));
    assert!(compass.emit(30.0, 3.0));
    assert!(compass.emit(20.0, -1.0));

    session.request_stop().unwrap();
    let artifact = timeout(WAIT, &mut observed.completed)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(artifact.geometry(), &room_scan());
    assert_eq!(artifact.heading().map(|h| h.degrees()), Some(30.0));
    assert_eq!(session.phase(), SessionPhase::Stopped);

    session.dismantle().await;
    let events = observed.drain();
    assert!(events.contains(&CaptureEvent::HeadingRejected { accuracy: -1.0 }));
    assert!(events.contains(&CaptureEvent::Completed {
        heading: Some(30.0)
    }));
    assert!(!compass.is_sampling());
}

#[tokio::test]
async fn test_no_heading_without_valid_update() {
    let (backend, _capture) = MockCaptureBackend::completing_on_stop(room_scan());
    let (heading, compass) = MockHeadingProvider::new();
    let (builder, mut observed) =
        observe(CaptureSession::builder().backend(backend).heading_provider(heading));
    let mut session = builder.build().unwrap();

    started(&session, &mut observed).await;
    assert!(compass.emit(90.0, -1.0));
    session.request_stop().unwrap();

    let artifact = timeout(WAIT, &mut observed.completed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(artifact.heading(), None);
    session.dismantle().await;
}

#[tokio::test]
async fn test_stop_requested_before_running_still_applies() {
    let (backend, capture) = MockCaptureBackend::completing_on_stop(room_scan());
    let (builder, mut observed) = observe(CaptureSession::builder().backend(backend));
    let mut session = builder.build().unwrap();

    session.request_stop().unwrap();
    session.start().unwrap();

    let artifact = timeout(WAIT, &mut observed.completed)
        .await
        .unwrap()
        .unwrap();
    assert!(!artifact.geometry().is_empty());
    assert_eq!(capture.run_calls(), 1);
    assert!(!session.stop_pending());
    session.dismantle().await;
}

#[tokio::test]
async fn test_repeated_stop_requests_collapse() {
    let (backend, capture) = MockCaptureBackend::new();
    let (builder, mut observed) = observe(CaptureSession::builder().backend(backend));
    let mut session = builder.build().unwrap();

    started(&session, &mut observed).await;
    session.request_stop().unwrap();
    session.request_stop().unwrap();
    observed
        .wait_for(|e| matches!(e, CaptureEvent::StopObserved))
        .await;

    // Queued behind any remaining stop nudge
    assert!(capture.end_session(None));
    observed
        .wait_for(|e| matches!(e, CaptureEvent::SessionEnded { .. }))
        .await;

    assert_eq!(capture.stop_calls(), 1);
    assert!(!session.stop_pending());
    assert_eq!(session.phase(), SessionPhase::StopRequested);

    // Advisory end alone does not complete the session
    assert_eq!(observed.callbacks(), 0);
    assert!(capture.finish(room_scan()));
    timeout(WAIT, &mut observed.completed)
        .await
        .unwrap()
        .unwrap();

    // Stopping a stopped session is a no-op
    session.request_stop().unwrap();
    assert!(!session.stop_pending());

    session.dismantle().await;
    assert_eq!(observed.callbacks(), 1);
}

#[tokio::test]
async fn test_review_prompt_is_always_accepted() {
    let (backend, capture) = MockCaptureBackend::new();
    let (builder, mut observed) = observe(CaptureSession::builder().backend(backend));
    let mut session = builder.build().unwrap();

    assert_eq!(capture.prompt_review(), None);
    started(&session, &mut observed).await;
    assert_eq!(capture.prompt_review(), Some(true));
    observed
        .wait_for(|e| matches!(e, CaptureEvent::ReviewPresented))
        .await;
    session.dismantle().await;
}

#[tokio::test]
async fn test_dismantle_is_idempotent() {
    let (backend, capture) = MockCaptureBackend::completing_on_stop(room_scan());
    let (heading, compass) = MockHeadingProvider::new();
    let (builder, mut observed) =
        observe(CaptureSession::builder().backend(backend).heading_provider(heading));
    let mut session = builder.build().unwrap();

    started(&session, &mut observed).await;
    session.request_stop().unwrap();
    timeout(WAIT, &mut observed.completed)
        .await
        .unwrap()
        .unwrap();

    session.dismantle().await;
    session.dismantle().await;

    assert!(session.is_torn_down());
    assert_eq!(observed.callbacks(), 1);
    assert!(compass.stop_calls() >= 1);
    // One stop from the request, one from teardown
    assert_eq!(capture.stop_calls(), 2);

    let torn_down = observed
        .drain()
        .into_iter()
        .filter(|e| matches!(e, CaptureEvent::TornDown))
        .count();
    assert_eq!(torn_down, 1);
}

#[tokio::test]
async fn test_dismantle_before_completion_fires_no_callback() {
    let (backend, capture) = MockCaptureBackend::new();
    let (heading, compass) = MockHeadingProvider::new();
    let (builder, mut observed) =
        observe(CaptureSession::builder().backend(backend).heading_provider(heading));
    let mut session = builder.build().unwrap();

    started(&session, &mut observed).await;
    assert!(compass.is_sampling());

    session.dismantle().await;
    assert_eq!(capture.stop_calls(), 1);
    assert!(!compass.is_sampling());

    // The hardware reporting late changes nothing
    assert!(capture.finish(room_scan()));
    tokio::task::yield_now().await;
    assert_eq!(observed.callbacks(), 0);
}

#[tokio::test]
async fn test_operations_after_teardown_fail() {
    let (backend, capture) = MockCaptureBackend::new();
    let mut session = CaptureSession::builder().backend(backend).build().unwrap();

    session.dismantle().await;
    assert!(matches!(session.start(), Err(CaptureError::TornDown)));
    assert!(matches!(session.request_stop(), Err(CaptureError::TornDown)));
    assert_eq!(session.phase(), SessionPhase::TornDown);
    assert_eq!(capture.run_calls(), 0);
    assert_eq!(capture.stop_calls(), 1);
}

#[tokio::test]
async fn test_panicking_callback_still_releases_hardware() {
    let (backend, capture) = MockCaptureBackend::completing_on_stop(room_scan());
    let (heading, compass) = MockHeadingProvider::new();
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let mut session = CaptureSession::builder()
        .backend(backend)
        .heading_provider(heading)
        .on_complete(|_| panic!("consumer bug"))
        .on_event(move |event| {
            let _ = event_tx.send(event);
        })
        .build()
        .unwrap();

    session.start().unwrap();
    timeout(WAIT, async {
        while !matches!(events.recv().await, Some(CaptureEvent::SessionStarted { .. })) {}
    })
    .await
    .unwrap();
    assert!(compass.is_sampling());

    // Completed is emitted right before on_complete runs and panics
    session.request_stop().unwrap();
    timeout(WAIT, async {
        while !matches!(events.recv().await, Some(CaptureEvent::Completed { .. })) {}
    })
    .await
    .unwrap();
    session.dismantle().await;

    assert!(!compass.is_sampling());
    assert_eq!(compass.stop_calls(), 1);
    // One stop from the request, one when the worker unwound
    assert_eq!(capture.stop_calls(), 2);
    assert_eq!(session.phase(), SessionPhase::TornDown);
}

#[test]
fn test_runtime_shutdown_releases_hardware() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let (backend, capture) = MockCaptureBackend::new();
    let (heading, compass) = MockHeadingProvider::new();

    let session = runtime.block_on(async {
        let (builder, mut observed) =
            observe(CaptureSession::builder().backend(backend).heading_provider(heading));
        let session = builder.build().unwrap();
        started(&session, &mut observed).await;
        session
    });
    assert!(compass.is_sampling());

    drop(runtime);
    assert_eq!(capture.stop_calls(), 1);
    assert!(!compass.is_sampling());

    // The worker is gone; dropping the handle must not panic or stop again
    drop(session);
    assert_eq!(capture.stop_calls(), 1);
}

#[tokio::test]
async fn test_dropping_handle_tears_down() {
    let (backend, capture) = MockCaptureBackend::new();
    let (builder, mut observed) = observe(CaptureSession::builder().backend(backend));
    let session = builder.build().unwrap();

    started(&session, &mut observed).await;
    drop(session);

    observed
        .wait_for(|e| matches!(e, CaptureEvent::TornDown))
        .await;
    assert_eq!(capture.stop_calls(), 1);
}

#[tokio::test]
async fn test_run_failure_reaches_on_error() {
    let (backend, capture) = MockCaptureBackend::failing("world tracking unavailable");
    let (builder, mut observed) = observe(CaptureSession::builder().backend(backend));
    let mut session = builder.build().unwrap();

    session.start().unwrap();
    let err = timeout(WAIT, &mut observed.failed).await.unwrap().unwrap();
    assert!(matches!(err, CaptureError::BackendError(_)));
    assert_eq!(capture.run_calls(), 1);
    assert_eq!(session.phase(), SessionPhase::Stopped);

    session.dismantle().await;
    assert_eq!(observed.callbacks(), 1);
}

#[tokio::test]
async fn test_hardware_failure_completes_once() {
    let (backend, capture) = MockCaptureBackend::new();
    let (builder, mut observed) = observe(CaptureSession::builder().backend(backend));
    let mut session = builder.build().unwrap();

    started(&session, &mut observed).await;
    assert!(capture.end_session(Some(CaptureError::session_failed("tracking lost"))));
    assert!(capture.fail(CaptureError::session_failed("tracking lost")));
    assert!(capture.finish(room_scan()));

    let err = timeout(WAIT, &mut observed.failed).await.unwrap().unwrap();
    assert_eq!(err.to_string(), "capture session failed: tracking lost");

    session.dismantle().await;
    assert_eq!(observed.callbacks(), 1);
    assert!(observed.completed.try_recv().is_err());
}

#[tokio::test]
async fn test_heading_skipped_without_device_support() {
    let (backend, _capture) = MockCaptureBackend::completing_on_stop(room_scan());
    let (heading, compass) = MockHeadingProvider::new();
    let (builder, mut observed) = observe(
        CaptureSession::builder()
            .backend(backend)
            .heading_provider(heading)
            .capabilities(DeviceCapabilities {
                capture: true,
                heading: false,
            }),
    );
    let mut session = builder.build().unwrap();

    session.start().unwrap();
    let event = observed
        .wait_for(|e| matches!(e, CaptureEvent::SessionStarted { .. }))
        .await;
    assert_eq!(
        event,
        CaptureEvent::SessionStarted {
            backend: "MockCapture",
            heading_sampling: false,
        }
    );
    assert_eq!(compass.start_calls(), 0);

    session.request_stop().unwrap();
    let artifact = timeout(WAIT, &mut observed.completed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(artifact.heading(), None);
    session.dismantle().await;
}

#[tokio::test]
async fn test_scan_then_route_to_agent() {
    let (backend, _capture) = MockCaptureBackend::completing_on_stop(room_scan());
    let (builder, mut observed) = observe(CaptureSession::builder().backend(backend));
    let mut session = builder.build().unwrap();

    started(&session, &mut observed).await;
    session.request_stop().unwrap();
    timeout(WAIT, &mut observed.completed)
        .await
        .unwrap()
        .unwrap();
    session.dismantle().await;

    let agents = vec![
        AgentConnection::new("a1", "Travel Planner"),
        AgentConnection::new("a2", "Interior Designer"),
        AgentConnection::new("a3", "Home Inspector"),
    ];
    let routing = CaptureRouting::new(SensorType::Lidar);
    let routes = suggest(&routing, &agents);
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].agent_name, "Interior Designer");
    assert_eq!(routes[1].agent_name, "Home Inspector");

    let presenter = RoutingPresenter::new();
    let presentation = presenter.present(routes.clone(), &agents).unwrap();
    assert_eq!(
        presentation.choose(&routes[0]),
        RoutingDecision::RouteToAgent("a2".into())
    );
    assert!(!presenter.is_presenting());
}

#[test]
fn test_capture_without_matching_agents_saves_locally() {
    let agents = vec![AgentConnection::new("a1", "Travel Planner")];
    let routes = suggest(&CaptureRouting::photos(4), &agents);
    assert!(routes.is_empty());

    let presenter = RoutingPresenter::new();
    let presentation = presenter.present(routes, &agents).unwrap();
    assert_eq!(presentation.options().len(), 1);
    assert_eq!(presentation.save_locally(), RoutingDecision::SaveLocally);
}

/// Records the last request and answers with one link per participant.
#[derive(Default)]
struct EchoService {
    requests: parking_lot::Mutex<Vec<HitCreationRequest>>,
}

#[async_trait]
impl HitCreationService for EchoService {
    fn name(&self) -> &str {
        "echo"
    }

    async fn create(
        &self,
        request: &HitCreationRequest,
    ) -> Result<HitCreationResponse, DistributionError> {
        self.requests.lock().push(request.clone());
        let hits = request.participants().map(|names| {
            names
                .iter()
                .map(|name| HitLink {
                    name: name.clone(),
                    url: format!("https://tasks.example/{}", name.to_lowercase()),
                })
                .collect()
        });
        Ok(HitCreationResponse {
            hits,
            url: Some("https://tasks.example/open".into()),
        })
    }
}

#[tokio::test]
async fn test_distribute_links_for_each_mode() {
    let workflow = LinkDistributionWorkflow::new(EchoService::default());

    let individual = LinkDraft::new(DistributionMode::Individual)
        .description("Measure the living room windows")
        .participants("Alice, Bob, ");
    let links = workflow.submit(&individual).await.unwrap();
    assert_eq!(links.primary, "https://tasks.example/alice");
    assert_eq!(links.hits.len(), 2);

    let open = LinkDraft::new(DistributionMode::Open).description("Rate the floor plan");
    let links = workflow.submit(&open).await.unwrap();
    assert_eq!(links.primary, "https://tasks.example/open");
    assert!(links.hits.is_empty());

    let requests = workflow.service().requests.lock();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].participants(),
        Some(&["Alice".to_string(), "Bob".to_string()][..])
    );
    assert_eq!(requests[1].participants(), None);
}

#[tokio::test]
async fn test_invalid_group_draft_is_not_sent() {
    let workflow = LinkDistributionWorkflow::new(EchoService::default());
    let draft = LinkDraft::new(DistributionMode::Group)
        .description("Label photos")
        .participants(" , ");

    let err = workflow.submit(&draft).await.unwrap_err();
    assert_eq!(err.to_string(), "group links need at least one participant");
    assert!(workflow.service().requests.lock().is_empty());
}
