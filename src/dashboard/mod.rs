//! # Dashboard — HTTP API
//!
//! Axum server exposing the search engine:
//!
//! | Endpoint | Purpose |
//! |----------|---------|
//! | `POST /start?threads=N` | Start a session with N workers |
//! | `POST /stop` | Stop the running session (drains in the background) |
//! | `GET /list?min=&max=` | Primes in `[min, max]`, once provably complete |
//! | `GET /status` | Phase and per-session progress |
//! | `GET /healthz`, `GET /readyz` | Liveness / readiness probes |
//! | `GET /metrics` | Prometheus exposition |
//!
//! Domain errors become `400 {"status":400,"message":…}`; store failures 500.

mod routes_health;
mod routes_primes;
mod routes_searches;

use crate::error::FinderError;
use crate::prom_metrics;
use crate::search_manager::SearchManager;
use anyhow::Result;
use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Instrument};

pub struct AppState {
    pub manager: SearchManager,
}

impl AppState {
    pub fn new(manager: SearchManager) -> Arc<Self> {
        Arc::new(AppState { manager })
    }
}

/// Error body returned for every rejected request.
#[derive(Serialize)]
struct ErrorMessage {
    status: u16,
    message: String,
}

impl IntoResponse for FinderError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let message = self.to_string();
        if status == StatusCode::BAD_REQUEST {
            info!(message = %message, "request rejected");
        } else {
            error!(message = %message, "request failed");
        }
        (
            status,
            Json(ErrorMessage {
                status: status.as_u16(),
                message,
            }),
        )
            .into_response()
    }
}

/// Records request duration into the Prometheus histogram, generates (or
/// propagates) a request ID, and runs the request inside a tracing span.
async fn metrics_middleware(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = std::time::Instant::now();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %req.uri().path(),
    );
    let mut response = next.run(req).instrument(span).await;

    state
        .manager
        .metrics()
        .http_request_duration
        .get_or_create(&prom_metrics::HttpLabel { method, path })
        .observe(start.elapsed().as_secs_f64());

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(routes_searches::handler_start))
        .route("/stop", post(routes_searches::handler_stop))
        .route("/status", get(routes_searches::handler_status))
        .route("/list", get(routes_primes::handler_list))
        .route("/healthz", get(routes_health::handler_healthz))
        .route("/readyz", get(routes_health::handler_readyz))
        .route("/metrics", get(routes_health::handler_metrics))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CatchPanicLayer::new())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .with_state(state)
}

/// Serve the API on `port` until SIGINT/SIGTERM, then cancel and join every
/// live worker.
pub async fn run(port: u16, state: Arc<AppState>) -> Result<()> {
    let app = build_router(Arc::clone(&state));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "primefinder API running");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.manager.shutdown().await;
    info!("primefinder shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT, shutting down"),
                    _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                ctrl_c.await.ok();
                info!("received SIGINT, shutting down");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("received SIGINT, shutting down");
    }
}
