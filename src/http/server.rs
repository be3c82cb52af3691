//! HTTP server setup and the query handler.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Dispatch `POST /query` through the upstream client and normalizer
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::http::request::{RequestIdExt, RequestIdLayer};
use crate::http::response::AnswerBody;
use crate::observability::metrics;
use crate::upstream::{build_payload, normalize, ClientBuildError, GenerationRequest, UpstreamClient};

/// Application state injected into handlers.
///
/// Configuration is immutable for the process lifetime; handlers never read
/// ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub client: UpstreamClient,
    pub config: Arc<RelayConfig>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given (already validated) configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ClientBuildError> {
        let client = UpstreamClient::new(&config.upstream, &config.timeouts)?;
        let state = AppState {
            client,
            config: Arc::new(config),
        };
        let router = Self::build_router(state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();
        Router::new()
            .route("/query", post(query_handler))
            .route("/", get(liveness_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener, until
    /// the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Liveness confirmation for `GET /`.
async fn liveness_handler() -> &'static str {
    "gemini-relay is running\n"
}

/// Main query handler: parse, validate, forward, normalize.
async fn query_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = headers.request_id().to_string();

    let request: GenerationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Request body is not valid JSON");
            return reject(RelayError::MalformedBody, &request_id, start);
        }
    };

    // Input rejection happens here, before any upstream traffic.
    let payload = match build_payload(&request) {
        Ok(payload) => payload,
        Err(e) => return reject(e, &request_id, start),
    };

    tracing::debug!(
        request_id = %request_id,
        prompt_chars = request.prompt.len(),
        use_search = request.use_search,
        "Forwarding query upstream"
    );

    let outcome = state.client.generate(&payload).await;
    let result = normalize(&outcome);
    let label = result.label();

    match result.into_reply() {
        Ok(answer) => {
            tracing::debug!(
                request_id = %request_id,
                answer_chars = answer.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Query answered"
            );
            metrics::record_query(label, StatusCode::OK.as_u16(), start);
            (StatusCode::OK, Json(AnswerBody { answer })).into_response()
        }
        Err(err) => {
            // Operator diagnostic: the raw upstream document or transport
            // detail, correlated by request ID. Never forwarded to the caller.
            tracing::warn!(
                request_id = %request_id,
                outcome = label,
                status = err.status().as_u16(),
                upstream_detail = %outcome.diagnostic(),
                "Query failed"
            );
            metrics::record_query(label, err.status().as_u16(), start);
            err.into_response()
        }
    }
}

/// Reject a request before it reaches the upstream.
fn reject(err: RelayError, request_id: &str, start: Instant) -> Response {
    tracing::debug!(request_id = %request_id, error = %err, "Request rejected");
    metrics::record_query("client_error", err.status().as_u16(), start);
    err.into_response()
}
