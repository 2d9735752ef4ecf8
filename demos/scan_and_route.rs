//! Runs a mock room scan end to end and routes the result.
//!
//! ```text
//! RUST_LOG=debug cargo run --example scan_and_route
//! ```

use capture_route::hardware::mock::{MockCaptureBackend, MockHeadingProvider};
use capture_route::{
    AgentConnection, CaptureEvent, CaptureRouting, CaptureSession, CapturedGeometry,
    RoutingDecision, RoutingEngine, RoutingPresenter, SensorType,
};
use parking_lot::Mutex;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (backend, _capture) =
        MockCaptureBackend::completing_on_stop(CapturedGeometry::new(vec![0u8; 4096]));
    let (heading, compass) = MockHeadingProvider::new();
    let (done_tx, done_rx) = oneshot::channel();
    let (ready_tx, ready_rx) = oneshot::channel();
    let ready_tx = Mutex::new(Some(ready_tx));

    let mut session = CaptureSession::builder()
        .backend(backend)
        .heading_provider(heading)
        .on_complete(move |artifact| {
            let _ = done_tx.send(artifact);
        })
        .on_error(|e| tracing::error!(error = %e, "room scan failed"))
        .on_event(move |event| {
            tracing::info!(?event, "capture event");
            if matches!(event, CaptureEvent::SessionStarted { .. }) {
                if let Some(tx) = ready_tx.lock().take() {
                    let _ = tx.send(());
                }
            }
        })
        .build()?;

    session.start()?;
    ready_rx.await?;

    // The user walks the room
    for (degrees, accuracy) in [(12.0, 8.0), (47.5, 4.0), (51.0, -1.0)] {
        compass.emit(degrees, accuracy);
    }
    session.request_stop()?;

    let artifact = done_rx.await?;
    session.dismantle().await;

    println!(
        "captured {} bytes, heading {:?}",
        artifact.geometry().len(),
        artifact.heading().map(|h| h.degrees())
    );

    let agents = vec![
        AgentConnection::new("agent-1", "Travel Planner"),
        AgentConnection::new("agent-2", "Interior Designer"),
        AgentConnection::new("agent-3", "Realtor Pro"),
    ];
    let routing = CaptureRouting::new(SensorType::Lidar);
    let engine = RoutingEngine::default();
    println!("{}", engine.title(&routing));

    let presenter = RoutingPresenter::new();
    let presentation = presenter.present(engine.suggest(&routing, &agents), &agents)?;
    for route in presentation.suggestions() {
        println!(
            "  -> {} [{} / {}]: {}",
            route.agent_name,
            route.icon,
            route.color_hint.as_str(),
            route.reason
        );
    }

    let decision = match presentation.suggestions().first().cloned() {
        Some(route) => presentation.choose(&route),
        None => presentation.save_locally(),
    };
    match decision {
        RoutingDecision::RouteToAgent(id) => println!("routed to {id}"),
        RoutingDecision::SaveLocally => println!("saved locally"),
    }

    Ok(())
}
