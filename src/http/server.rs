//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum Router for the dispatch surface
//! - Wire up middleware (tracing, timeout)
//! - Dispatch every request against the current `Application` snapshot
//! - Swap in rebuilt applications from the config watcher
//! - Shut down gracefully on the broadcast signal

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::dispatch::Application;
use crate::metadata::HttpMethod;
use crate::routing::{strip_context_path, RequestRouter, RoutedRequest};

/// State shared by the dispatch and admin handlers.
#[derive(Clone)]
pub struct AppState {
    /// Current application; replaced whole on reload.
    pub app: Arc<ArcSwap<Application>>,
    pub context_path: Arc<str>,
    pub admin_api_key: Arc<str>,
}

impl AppState {
    pub fn new(config: &AppConfig, app: Application) -> Self {
        Self {
            app: Arc::new(ArcSwap::from_pointee(app)),
            context_path: Arc::from(config.server.context_path.as_str()),
            admin_api_key: Arc::from(config.admin.api_key.as_str()),
        }
    }

    /// Replace the live application.
    pub fn swap(&self, app: Application) {
        let routes = app.routes().len();
        self.app.store(Arc::new(app));
        tracing::info!(routes, "Application reloaded");
    }
}

/// HTTP server for the dispatch surface.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: &AppConfig, app: Application) -> Self {
        let state = AppState::new(config, app);
        let router = Self::build_router(config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until `shutdown` fires, swapping in every application received on `updates`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut updates: mpsc::UnboundedReceiver<Application>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(app) = updates.recv().await {
                state.swap(app);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request and answer with its dispatch plan.
async fn dispatch_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let raw = uri.path();

    let Some(path) = strip_context_path(&state.context_path, raw) else {
        tracing::debug!(path = raw, "Outside application context");
        return not_found(raw);
    };

    let Ok(verb) = method.as_str().parse::<HttpMethod>() else {
        tracing::debug!(method = %method, "Unsupported HTTP method");
        return not_found(raw);
    };

    let app = state.app.load_full();
    // The plan borrows `app`; render it before `app` goes out of scope.
    #[allow(clippy::let_and_return)]
    let response = match app.dispatch(verb, path) {
        Some(plan) => (StatusCode::OK, Json(&plan)).into_response(),
        None => unrouted(raw, RequestRouter::route(path)),
    };
    response
}

fn not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found", "path": path })),
    )
        .into_response()
}

/// 404 for a path inside the context that no route matched. Echoes the
/// controller and action tokens the path was read as.
fn unrouted(path: &str, routed: RoutedRequest<'_>) -> Response {
    tracing::debug!(
        controller = ?routed.controller,
        action = ?routed.action,
        remainder = ?routed.remainder,
        "No route for request"
    );
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found", "path": path, "request": routed })),
    )
        .into_response()
}
