//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Decode the path, select deployment, resolve the servlet, invoke it
//!
//! # Design Decisions
//! - One catch-all route: all path mapping happens in the deployment tables
//! - Undecodable path → 400, NoMatch → 404, mapping inconsistency → 500 (never retried)

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ContainerConfig;
use crate::deployment::Container;
use crate::http::request::{decode_path, request_id_middleware, RequestIdExt};
use crate::http::response;
use crate::lifecycle::Shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub container: Arc<Container>,
}

/// HTTP front end for the container.
pub struct HttpServer {
    router: Router,
    config: ContainerConfig,
}

impl HttpServer {
    /// Create a new HTTP server over already-built deployments.
    pub fn new(config: ContainerConfig, container: Arc<Container>) -> Self {
        let router = build_router(container, Duration::from_secs(config.timeouts.request_secs));
        Self { router, config }
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut stop = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(container: Arc<Container>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", any(dispatch_handler))
        .route("/{*path}", any(dispatch_handler))
        .with_state(AppState { container })
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

/// Main dispatch handler.
/// Selects the deployment, resolves the servlet and invokes it.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request.request_id().to_string();
    let path = match decode_path(request.uri().path()) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                raw_path = %request.uri().path(),
                error = %e,
                "Request path is not valid UTF-8 once decoded"
            );
            return response::bad_request();
        }
    };

    let Some((deployment, relative)) = state.container.select(&path) else {
        tracing::warn!(request_id = %request_id, path = %path, "No deployment for path");
        return response::not_found();
    };

    match deployment.resolve(relative) {
        Ok(Some(m)) => {
            tracing::debug!(
                request_id = %request_id,
                deployment = %deployment.name(),
                path = %path,
                servlet = %m.servlet,
                pattern = %m.pattern,
                kind = %m.kind,
                "Dispatching to servlet"
            );
            response::servlet_response(&m)
        }
        Ok(None) => {
            tracing::warn!(
                request_id = %request_id,
                deployment = %deployment.name(),
                path = %path,
                "No servlet mapped"
            );
            response::not_found()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                deployment = %deployment.name(),
                path = %path,
                error = %e,
                "Aborting request"
            );
            response::internal_error()
        }
    }
}
