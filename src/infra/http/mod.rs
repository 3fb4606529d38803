pub mod api;
mod middleware;

pub use api::{ApiState, build_api_router};

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware as axum_middleware};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::infra::error::InfraError;
use middleware::set_request_context;

/// Full application router: the reporting API plus request-context tagging.
pub fn build_router(state: ApiState) -> Router {
    build_api_router(state).layer(axum_middleware::from_fn(set_request_context))
}

/// Serve until SIGINT/SIGTERM, then drain in-flight requests for at most `grace`.
pub async fn serve(listener: TcpListener, router: Router, grace: Duration) -> Result<(), InfraError> {
    serve_with_shutdown(listener, router, grace, shutdown_signal()).await
}

pub async fn serve_with_shutdown<S>(
    listener: TcpListener,
    router: Router,
    grace: Duration,
    signal: S,
) -> Result<(), InfraError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let trigger = draining.clone();

    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            signal.await;
            info!(target = "reporting::http", "shutdown requested, draining connections");
            trigger.notify_one();
        })
        .into_future();

    tokio::select! {
        result = server => result.map_err(InfraError::from),
        () = async {
            draining.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                target = "reporting::http",
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out, dropping open connections"
            );
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(target = "reporting::http", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(target = "reporting::http", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
