//! # bh-runner
//!
//! Remote execution agent. Runs load tests with the local engine on behalf
//! of an orchestrator and answers synchronously once each run has ended.
//!
//! - `POST /run` runs one execution and returns its outcome and reports
//! - `POST /stop` stops a running execution
//! - `GET /health` liveness probe

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::state::AppState;

/// Build the application router with its middleware.
pub fn build_app(state: AppState) -> Router {
    routes::router()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
