//! # Prime Listing Endpoint
//!
//! `GET /list?min=&max=` returns the stored primes in `[min, max]` as an
//! ascending JSON array, or 400 while the search has not covered `max` yet.

use super::AppState;
use crate::error::FinderError;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub(super) struct ListQuery {
    min: i64,
    max: i64,
}

pub(super) async fn handler_list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, FinderError> {
    let primes = state.manager.list_primes(params.min, params.max).await?;
    Ok(Json(primes))
}
