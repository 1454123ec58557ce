use std::sync::Arc;

use photoflow_infra::{ProcessingWorker, SimulatedPolicy, WorkerConfig};

#[tokio::main]
async fn main() {
    photoflow_observability::init();

    let services = Arc::new(photoflow_api::app::services::build_services());

    // Start the single background consumer once the system is wired.
    let worker = ProcessingWorker::spawn(
        services.queue.clone(),
        services.lifecycle.clone(),
        Arc::new(SimulatedPolicy::default()),
        WorkerConfig::default(),
    );

    let app = photoflow_api::app::build_app(services);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    tracing::info!("shutting down worker");
    worker.shutdown();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
