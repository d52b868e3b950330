//! HTTP boundary.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /poem?id=<identifier>` | Cached or freshly generated poem for an artwork |
//! | `GET /health` | Store backend name and pipeline counters |
//!
//! Errors are rendered as [`ErrorResponse`] with the status of their
//! [`ErrorKind`](crate::error_code::ErrorKind). A client disconnect drops the
//! handler future, which abandons any in-flight collaborator call.

mod response;

pub use response::{status_for, ErrorResponse, HealthResponse, PoemResponse};

use crate::pipeline::{GenerationPipeline, RequestContext};
use crate::Error;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<GenerationPipeline>,
    request_timeout: Option<Duration>,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(pipeline: Arc<GenerationPipeline>) -> Self {
        Self {
            pipeline,
            request_timeout: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// In-flight requests are cancelled when `token` fires.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    fn request_context(&self) -> RequestContext {
        let ctx = RequestContext::new().with_cancellation(self.shutdown.child_token());
        match self.request_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PoemQuery {
    pub id: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/poem", get(get_poem))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_poem(
    State(state): State<AppState>,
    query: Result<Query<PoemQuery>, QueryRejection>,
) -> Result<Json<PoemResponse>, Error> {
    let Query(query) = query.map_err(|e| Error::invalid_request(e.body_text()))?;
    let id = query
        .id
        .ok_or_else(|| Error::invalid_request("missing id query parameter"))?;
    let outcome = state.pipeline.run(&id, &state.request_context()).await?;
    Ok(Json(PoemResponse::from(outcome.poem)))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        store: state.pipeline.store_name(),
        stats: state.pipeline.stats(),
    })
}
