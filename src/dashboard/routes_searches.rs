//! # Search Control Endpoints
//!
//! | Endpoint | Success |
//! |----------|---------|
//! | `POST /start?threads=N` | `200 Started` |
//! | `POST /stop` | `200 Stopped` |
//! | `GET /status` | `200` JSON [`SearchStatus`](crate::search_manager::SearchStatus) |

use super::AppState;
use crate::error::FinderError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub(super) struct StartQuery {
    threads: i64,
}

pub(super) async fn handler_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StartQuery>,
) -> Result<impl IntoResponse, FinderError> {
    state.manager.start(params.threads).await?;
    Ok((StatusCode::OK, "Started"))
}

/// Returns as soon as cancellation is issued; workers drain afterwards.
pub(super) async fn handler_stop(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, FinderError> {
    state.manager.stop().await?;
    Ok((StatusCode::OK, "Stopped"))
}

pub(super) async fn handler_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.manager.status().await)
}
